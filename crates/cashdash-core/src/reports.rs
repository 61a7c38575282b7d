//! Report structures for API responses

use crate::balance::DashboardKpis;
use crate::charts::{MethodTotal, MonthlyBucket};
use crate::receipts::{ReceiptGroup, ReceiptTab};
use cashdash_store::Transaction;
use cashdash_utils::format_brl;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// KPI values pre-formatted as BRL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattedKpis {
    pub balance: String,
    pub revenue: String,
    pub expense: String,
}

/// Dashboard response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub kpis: DashboardKpis,
    pub formatted: FormattedKpis,
    pub transaction_count: usize,
}

impl DashboardResponse {
    pub fn new(kpis: DashboardKpis, transaction_count: usize) -> Self {
        let formatted = FormattedKpis {
            balance: format_brl(kpis.balance),
            revenue: format_brl(kpis.revenue),
            expense: format_brl(kpis.expense),
        };
        Self {
            kpis,
            formatted,
            transaction_count,
        }
    }
}

/// Transactions list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
    pub total_count: usize,
    /// Signed sum of the listed transactions
    pub net: Decimal,
}

impl TransactionsResponse {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        let net = crate::balance::compute_balance(&transactions);
        Self {
            total_count: transactions.len(),
            transactions,
            net,
        }
    }
}

/// Revenue vs expense per month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub months: Vec<MonthlyBucket>,
    pub total_revenue: Decimal,
    pub total_expense: Decimal,
}

impl MonthlyReport {
    pub fn new(months: Vec<MonthlyBucket>) -> Self {
        let total_revenue = months.iter().map(|m| m.revenue).sum();
        let total_expense = months.iter().map(|m| m.expense).sum();
        Self {
            months,
            total_revenue,
            total_expense,
        }
    }
}

/// Debits by payment method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethodReport {
    pub methods: Vec<MethodTotal>,
    pub total: Decimal,
}

impl PaymentMethodReport {
    pub fn new(methods: Vec<MethodTotal>) -> Self {
        let total = methods.iter().map(|m| m.total).sum();
        Self { methods, total }
    }
}

/// Grouped receipts of a tab
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptsResponse {
    pub tab: ReceiptTab,
    pub groups: Vec<ReceiptGroup>,
    pub total_count: usize,
}

impl ReceiptsResponse {
    pub fn new(tab: ReceiptTab, groups: Vec<ReceiptGroup>) -> Self {
        let total_count = groups.iter().map(|g| g.files.len()).sum();
        Self {
            tab,
            groups,
            total_count,
        }
    }
}
