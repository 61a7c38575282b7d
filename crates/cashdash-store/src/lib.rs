//! Transaction store adapters
//!
//! The dashboard reads and writes through [`TransactionStoreTrait`]. Two
//! implementations ship: [`RemoteStore`] talks to a PostgREST-compatible
//! endpoint, [`MemoryStore`] keeps everything in process.

use async_trait::async_trait;
use std::sync::Arc;

pub mod error;
pub mod memory;
pub mod models;
pub mod remote;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use models::{
    parse_timestamp, Account, AccountType, Category, CategoryType, NewTransaction, PaymentMethod,
    Transaction, TransactionType,
};
pub use remote::RemoteStore;

// ==================== Store Trait ====================

/// Store reference type
pub type StoreRef = Arc<dyn TransactionStoreTrait>;

/// Backing store for transactions and lookup tables
#[async_trait]
pub trait TransactionStoreTrait: Send + Sync {
    /// All transactions, newest date first
    async fn fetch_transactions(&self) -> StoreResult<Vec<Transaction>>;

    /// All accounts, most recently created first
    async fn fetch_accounts(&self) -> StoreResult<Vec<Account>>;

    /// All categories, most recently created first
    async fn fetch_categories(&self) -> StoreResult<Vec<Category>>;

    /// Insert a transaction and return it as stored, id included
    async fn add_transaction(&self, new: NewTransaction) -> StoreResult<Transaction>;

    /// Delete a transaction by id
    async fn delete_transaction(&self, id: &str) -> StoreResult<()>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}
