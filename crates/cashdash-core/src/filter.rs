//! Transaction list filtering

use crate::error::{CoreError, CoreResult};
use crate::time::month_name;
use cashdash_config::Locale;
use cashdash_store::{Transaction, TransactionType};
use chrono::Datelike;

/// Values that mean "match everything" in a select filter
const MATCH_ALL: [&str; 3] = ["todos", "all", "*"];

pub(crate) fn is_match_all(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || MATCH_ALL.contains(&value.to_lowercase().as_str())
}

/// Predicates for the transaction list. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Free text matched against purpose and amount
    pub query: String,
    /// Full month name in `locale`, e.g. `março`
    pub month: Option<String>,
    pub year: Option<i32>,
    pub kind: Option<TransactionType>,
    pub locale: Locale,
}

impl TransactionFilter {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }

    /// Build a filter from raw request parameters
    pub fn from_params(
        query: Option<&str>,
        month: Option<&str>,
        year: Option<&str>,
        kind: Option<&str>,
        locale: Locale,
    ) -> CoreResult<Self> {
        let month = month.filter(|m| !is_match_all(m)).map(|m| m.trim().to_string());

        let year = match year.filter(|y| !is_match_all(y)) {
            Some(raw) => Some(raw.trim().parse::<i32>().map_err(|_| CoreError::InvalidFormat {
                message: format!("Invalid year: {}", raw),
            })?),
            None => None,
        };

        let kind = match kind.filter(|k| !is_match_all(k)) {
            Some(raw) => Some(
                raw.parse::<TransactionType>()
                    .map_err(|message| CoreError::InvalidFormat { message })?,
            ),
            None => None,
        };

        Ok(Self {
            query: query.unwrap_or_default().to_string(),
            month,
            year,
            kind,
            locale,
        })
    }

    fn matches_text(&self, tx: &Transaction) -> bool {
        if self.query.is_empty() {
            return true;
        }
        tx.purpose.to_lowercase().contains(&self.query.to_lowercase())
            || tx.amount.normalize().to_string().contains(&self.query)
    }

    fn matches_month(&self, tx: &Transaction) -> bool {
        match self.month {
            Some(ref month) => month_name(tx.date.month(), self.locale).to_lowercase() == month.to_lowercase(),
            None => true,
        }
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.matches_text(tx)
            && self.matches_month(tx)
            && self.year.map_or(true, |y| tx.date.year() == y)
            && self.kind.map_or(true, |k| tx.kind == k)
    }

    /// Matching transactions, in their original relative order
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions.iter().filter(|t| self.matches(t)).cloned().collect()
    }
}
