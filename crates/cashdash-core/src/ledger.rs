//! Dashboard state
//!
//! [`LedgerData`] is the whole session state. It only changes through
//! [`apply_transaction_change`] and the override setters, so every mutation
//! can be tested without a store. [`Ledger`] wraps it with the store calls
//! and their fallbacks: a failed fetch becomes an empty collection, a failed
//! insert gets a local `txn_` id, and a failed delete is removed locally
//! anyway.
//!
//! Writes come in two halves so a shared ledger is never locked across a
//! store round-trip: await the store through [`Ledger::store`], then hand the
//! outcome to [`Ledger::commit_add`] or [`Ledger::commit_delete`].

use crate::balance::{self, apply_delta, DashboardKpis};
use crate::charts::{self, BalancePoint, ChartData, ChartKind, MethodTotal, MonthlyBucket};
use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::filter::TransactionFilter;
use cashdash_config::Locale;
use cashdash_store::{
    parse_timestamp, Account, Category, NewTransaction, PaymentMethod, StoreRef, StoreResult,
    Transaction, TransactionType,
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const REQUIRED_FIELDS_MESSAGE: &str = "Por favor, preencha todos os campos obrigatórios.";

// ==================== Input ====================

/// Transaction as submitted by a client; missing fields take the form's
/// defaults (debit, today, cash).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionForm {
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    pub amount: Option<Decimal>,
    pub date: Option<String>,
    pub purpose: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub reconciled: bool,
    pub company_id: Option<String>,
    pub user_id: Option<String>,
    pub reference: Option<String>,
    pub document_url: Option<String>,
}

impl TransactionForm {
    pub fn into_new(self, now: DateTime<Utc>) -> CoreResult<NewTransaction> {
        let amount = self.amount.ok_or_else(|| CoreError::validation(REQUIRED_FIELDS_MESSAGE))?;
        let purpose = self.purpose.unwrap_or_default();
        let date = match self.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => parse_timestamp(raw).ok_or_else(|| CoreError::InvalidFormat {
                message: format!("Invalid date: {}", raw),
            })?,
            None => now,
        };

        let new = NewTransaction {
            kind: self.kind.unwrap_or(TransactionType::Debit),
            amount,
            date,
            purpose: purpose.trim().to_string(),
            payment_method: self.payment_method.unwrap_or_default(),
            reconciled: self.reconciled,
            company_id: self.company_id,
            user_id: self.user_id,
            reference: self.reference,
            document_url: self.document_url,
        };
        validate_new(&new)?;
        Ok(new)
    }
}

/// Amount must be positive and purpose non-blank
pub fn validate_new(new: &NewTransaction) -> CoreResult<()> {
    if new.purpose.trim().is_empty() {
        return Err(CoreError::validation(REQUIRED_FIELDS_MESSAGE));
    }
    if new.amount <= Decimal::ZERO {
        return Err(CoreError::validation("amount must be greater than zero"));
    }
    Ok(())
}

// ==================== State ====================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerData {
    /// Newest first, as the store returns them
    pub transactions: Vec<Transaction>,
    pub accounts: Vec<Account>,
    pub categories: Vec<Category>,
    /// Balance entered by the user; replaces the computed one while set
    pub manual_balance: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOp {
    Add,
    Remove,
}

/// Apply an add or remove to the state. Adds are prepended. A remove that
/// finds nothing leaves the state, override included, untouched.
pub fn apply_transaction_change(mut data: LedgerData, tx: &Transaction, op: ChangeOp) -> LedgerData {
    match op {
        ChangeOp::Add => {
            data.transactions.insert(0, tx.clone());
            data.manual_balance = apply_delta(data.manual_balance, tx, true);
        }
        ChangeOp::Remove => {
            let before = data.transactions.len();
            data.transactions.retain(|t| t.id != tx.id);
            if data.transactions.len() != before {
                data.manual_balance = apply_delta(data.manual_balance, tx, false);
            }
        }
    }
    data
}

// ==================== Ledger ====================

pub struct Ledger {
    store: StoreRef,
    data: LedgerData,
    locale: Locale,
    logger: Box<dyn ErrorLogger>,
}

impl Ledger {
    pub fn new(store: StoreRef, locale: Locale) -> Self {
        Self {
            store,
            data: LedgerData::default(),
            locale,
            logger: Box::new(DefaultErrorLogger),
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn ErrorLogger>) -> Self {
        self.logger = logger;
        self
    }

    fn report<T: Default>(&self, operation: &str, result: Result<T, cashdash_store::StoreError>) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                let context = ErrorContext::new(operation)
                    .with_data("store", serde_json::json!(self.store.name()));
                self.logger.log_error(&CoreError::from(e), &context);
                T::default()
            }
        }
    }

    /// Fetch everything from the store. Each collection falls back to empty
    /// on its own; the manual balance survives a reload.
    pub async fn load(&mut self) {
        let (transactions, accounts, categories) = tokio::join!(
            self.store.fetch_transactions(),
            self.store.fetch_accounts(),
            self.store.fetch_categories(),
        );

        self.data.transactions = self.report("fetch_transactions", transactions);
        self.data.accounts = self.report("fetch_accounts", accounts);
        self.data.categories = self.report("fetch_categories", categories);

        log::info!(
            "Loaded {} transactions, {} accounts, {} categories from {} store",
            self.data.transactions.len(),
            self.data.accounts.len(),
            self.data.categories.len(),
            self.store.name()
        );
    }

    /// `txn_<millis>`, bumped until it does not clash with a known id
    fn local_id(&self) -> String {
        let mut millis = cashdash_utils::now_millis();
        loop {
            let id = cashdash_utils::generate_id_at(millis);
            if !self.data.transactions.iter().any(|t| t.id == id) {
                return id;
            }
            millis += 1;
        }
    }

    /// Handle for the store half of a write
    pub fn store(&self) -> StoreRef {
        self.store.clone()
    }

    /// Record the outcome of a store insert. When the insert failed the
    /// transaction is kept locally under a generated id.
    pub fn commit_add(&mut self, new: NewTransaction, stored: StoreResult<Transaction>) -> Transaction {
        let tx = match stored {
            Ok(tx) => tx,
            Err(e) => {
                let tx = Transaction::from_new(self.local_id(), new);
                let context = ErrorContext::new("add_transaction")
                    .with_data("local_id", serde_json::json!(tx.id));
                self.logger.log_error(&CoreError::from(e), &context);
                tx
            }
        };

        log::debug!("Added transaction {} ({} {})", tx.id, tx.kind, tx.amount);
        self.data = apply_transaction_change(std::mem::take(&mut self.data), &tx, ChangeOp::Add);
        tx
    }

    /// Record the outcome of a store delete; the local copy goes either way.
    /// Returns the removed transaction, or `None` for an unknown id.
    pub fn commit_delete(&mut self, id: &str, deleted: StoreResult<()>) -> Option<Transaction> {
        if let Err(e) = deleted {
            let context = ErrorContext::new("delete_transaction")
                .with_data("id", serde_json::json!(id));
            self.logger.log_error(&CoreError::from(e), &context);
        }

        let tx = self.transaction(id)?;
        self.data = apply_transaction_change(std::mem::take(&mut self.data), &tx, ChangeOp::Remove);
        log::debug!("Deleted transaction {}", id);
        Some(tx)
    }

    /// Validate, insert through the store and commit
    pub async fn add_transaction(&mut self, new: NewTransaction) -> CoreResult<Transaction> {
        validate_new(&new)?;
        let stored = self.store.add_transaction(new.clone()).await;
        Ok(self.commit_add(new, stored))
    }

    /// Delete through the store and commit
    pub async fn delete_transaction(&mut self, id: &str) -> Option<Transaction> {
        let deleted = self.store.delete_transaction(id).await;
        self.commit_delete(id, deleted)
    }

    pub fn set_manual_balance(&mut self, value: Decimal) {
        log::info!("Manual balance set to {}", value);
        self.data.manual_balance = Some(value);
    }

    pub fn clear_manual_balance(&mut self) {
        if self.data.manual_balance.take().is_some() {
            log::info!("Manual balance cleared");
        }
    }

    // ==================== Accessors ====================

    pub fn data(&self) -> &LedgerData {
        &self.data
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.data.transactions
    }

    pub fn transaction(&self, id: &str) -> Option<Transaction> {
        self.data.transactions.iter().find(|t| t.id == id).cloned()
    }

    pub fn accounts(&self) -> &[Account] {
        &self.data.accounts
    }

    pub fn categories(&self) -> &[Category] {
        &self.data.categories
    }

    pub fn manual_balance(&self) -> Option<Decimal> {
        self.data.manual_balance
    }

    pub fn computed_balance(&self) -> Decimal {
        balance::compute_balance(&self.data.transactions)
    }

    pub fn balance(&self) -> Decimal {
        balance::effective_balance(self.computed_balance(), self.data.manual_balance)
    }

    pub fn kpis(&self, today: NaiveDate) -> DashboardKpis {
        balance::dashboard_kpis(&self.data.transactions, today, self.data.manual_balance)
    }

    pub fn balance_series(&self) -> Vec<BalancePoint> {
        charts::cumulative_balance_series(&self.data.transactions, self.locale)
    }

    pub fn monthly(&self) -> Vec<MonthlyBucket> {
        charts::monthly_revenue_expense(&self.data.transactions, self.locale)
    }

    pub fn payment_methods(&self) -> Vec<MethodTotal> {
        charts::payment_method_distribution(&self.data.transactions)
    }

    pub fn chart(&self, kind: ChartKind) -> ChartData {
        charts::chart(kind, &self.data.transactions, self.locale)
    }

    pub fn filtered(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        filter.apply(&self.data.transactions)
    }

    /// Years with at least one transaction, newest first
    pub fn available_years(&self) -> Vec<i32> {
        self.data
            .transactions
            .iter()
            .map(|t| t.date.year())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .rev()
            .collect()
    }
}
