//! PostgREST-compatible remote store
//!
//! Tables are addressed as `<base>/rest/v1/<table>`. Every request carries
//! the API key both as the `apikey` header and as a bearer token.

use crate::error::{StoreError, StoreResult};
use crate::models::{Account, Category, NewTransaction, Transaction};
use crate::TransactionStoreTrait;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

const UA: &str = concat!("cashdash/", env!("CARGO_PKG_VERSION"));

const TRANSACTIONS_TABLE: &str = "transactions";
const ACCOUNTS_TABLE: &str = "accounts";
const CATEGORIES_TABLE: &str = "categories";

pub struct RemoteStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RemoteStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(UA)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Send the request and return the body of a successful response
    async fn send(&self, request: RequestBuilder) -> StoreResult<String> {
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    async fn select_all<T: DeserializeOwned>(&self, table: &str, order: &str) -> StoreResult<Vec<T>> {
        debug!("GET {} order={}", table, order);
        let request = self
            .request(Method::GET, table)
            .query(&[("select", "*"), ("order", order)]);
        let body = self.send(request).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl TransactionStoreTrait for RemoteStore {
    async fn fetch_transactions(&self) -> StoreResult<Vec<Transaction>> {
        self.select_all(TRANSACTIONS_TABLE, "date.desc").await
    }

    async fn fetch_accounts(&self) -> StoreResult<Vec<Account>> {
        self.select_all(ACCOUNTS_TABLE, "created_at.desc").await
    }

    async fn fetch_categories(&self) -> StoreResult<Vec<Category>> {
        self.select_all(CATEGORIES_TABLE, "created_at.desc").await
    }

    async fn add_transaction(&self, new: NewTransaction) -> StoreResult<Transaction> {
        debug!("POST {}", TRANSACTIONS_TABLE);
        let request = self
            .request(Method::POST, TRANSACTIONS_TABLE)
            .header("Prefer", "return=representation")
            .json(&[&new]);
        let body = self.send(request).await?;
        let mut rows: Vec<Transaction> = serde_json::from_str(&body)?;
        if rows.is_empty() {
            return Err(StoreError::EmptyResponse);
        }
        Ok(rows.swap_remove(0))
    }

    async fn delete_transaction(&self, id: &str) -> StoreResult<()> {
        debug!("DELETE {} id={}", TRANSACTIONS_TABLE, id);
        let filter = format!("eq.{}", id);
        let request = self
            .request(Method::DELETE, TRANSACTIONS_TABLE)
            .query(&[("id", filter.as_str())]);
        self.send(request).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
