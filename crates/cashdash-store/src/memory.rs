//! In-process store
//!
//! Holds everything in memory behind a lock. Used when no remote store is
//! configured and as the fake in tests.

use crate::error::{StoreError, StoreResult};
use crate::models::{Account, Category, NewTransaction, Transaction};
use crate::TransactionStoreTrait;
use async_trait::async_trait;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    transactions: RwLock<Vec<Transaction>>,
    accounts: RwLock<Vec<Account>>,
    categories: RwLock<Vec<Category>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store. Accounts and categories are listed newest first,
    /// so the last element of each seed vector is returned first.
    pub fn with_data(
        transactions: Vec<Transaction>,
        accounts: Vec<Account>,
        categories: Vec<Category>,
    ) -> Self {
        Self {
            transactions: RwLock::new(transactions),
            accounts: RwLock::new(accounts),
            categories: RwLock::new(categories),
        }
    }

    fn poisoned() -> StoreError {
        StoreError::Http { message: "memory store lock poisoned".to_string() }
    }
}

#[async_trait]
impl TransactionStoreTrait for MemoryStore {
    async fn fetch_transactions(&self) -> StoreResult<Vec<Transaction>> {
        let mut rows = self.transactions.read().map_err(|_| Self::poisoned())?.clone();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn fetch_accounts(&self) -> StoreResult<Vec<Account>> {
        let rows = self.accounts.read().map_err(|_| Self::poisoned())?;
        Ok(rows.iter().rev().cloned().collect())
    }

    async fn fetch_categories(&self) -> StoreResult<Vec<Category>> {
        let rows = self.categories.read().map_err(|_| Self::poisoned())?;
        Ok(rows.iter().rev().cloned().collect())
    }

    async fn add_transaction(&self, new: NewTransaction) -> StoreResult<Transaction> {
        let tx = Transaction::from_new(uuid::Uuid::new_v4().to_string(), new);
        self.transactions
            .write()
            .map_err(|_| Self::poisoned())?
            .push(tx.clone());
        log::debug!("memory store: added transaction {}", tx.id);
        Ok(tx)
    }

    async fn delete_transaction(&self, id: &str) -> StoreResult<()> {
        let mut rows = self.transactions.write().map_err(|_| Self::poisoned())?;
        let before = rows.len();
        rows.retain(|t| t.id != id);
        if rows.len() == before {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountType, PaymentMethod, TransactionType};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn new_tx(day: u32, amount: i64) -> NewTransaction {
        NewTransaction {
            kind: TransactionType::Credit,
            amount: Decimal::from(amount),
            date: Utc.with_ymd_and_hms(2025, 3, day, 0, 0, 0).unwrap(),
            purpose: format!("day {}", day),
            payment_method: PaymentMethod::Cash,
            reconciled: false,
            company_id: None,
            user_id: None,
            reference: None,
            document_url: None,
        }
    }

    #[tokio::test]
    async fn test_add_assigns_id_and_lists_newest_first() {
        let store = MemoryStore::new();
        let first = store.add_transaction(new_tx(1, 10)).await.unwrap();
        let second = store.add_transaction(new_tx(5, 20)).await.unwrap();
        assert_ne!(first.id, second.id);

        let rows = store.fetch_transactions().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, second.id);
    }

    #[tokio::test]
    async fn test_delete_unknown_id() {
        let store = MemoryStore::new();
        let tx = store.add_transaction(new_tx(1, 10)).await.unwrap();
        assert!(matches!(
            store.delete_transaction("nope").await,
            Err(StoreError::NotFound { .. })
        ));
        store.delete_transaction(&tx.id).await.unwrap();
        assert!(store.fetch_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_accounts_newest_first() {
        let accounts = vec![
            Account { id: "1".into(), name: "Caixa".into(), kind: AccountType::Cash, balance: Decimal::ZERO },
            Account { id: "2".into(), name: "Banco".into(), kind: AccountType::Bank, balance: Decimal::ZERO },
        ];
        let store = MemoryStore::with_data(vec![], accounts, vec![]);
        let rows = store.fetch_accounts().await.unwrap();
        assert_eq!(rows[0].id, "2");
    }
}
