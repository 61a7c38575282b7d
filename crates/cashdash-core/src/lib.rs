//! Core dashboard logic
//!
//! Aggregates, chart shaping and filtering over the transaction log, the
//! in-memory receipt registry and the [`Ledger`] state container.

pub mod balance;
pub mod charts;
pub mod error;
pub mod filter;
pub mod ledger;
pub mod receipts;
pub mod reports;
pub mod time;

pub use balance::{
    apply_delta, compute_balance, compute_monthly_total, compute_percent_change, dashboard_kpis,
    effective_balance, DashboardKpis,
};
pub use charts::{
    cumulative_balance_series, monthly_revenue_expense, payment_method_distribution, BalancePoint,
    ChartData, ChartDataPoint, ChartDataset, ChartKind, MethodTotal, MonthlyBucket,
};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity};
pub use filter::TransactionFilter;
pub use ledger::{apply_transaction_change, ChangeOp, Ledger, LedgerData, TransactionForm};
pub use receipts::{
    GroupFilter, ReceiptError, ReceiptFile, ReceiptGroup, ReceiptRegistry, ReceiptTab,
    ReceiptUpload, ReceiptView,
};
pub use time::MonthRef;

pub use cashdash_store::{
    Account, AccountType, Category, CategoryType, NewTransaction, PaymentMethod, Transaction,
    TransactionType,
};
