//! Records exchanged with the backing store

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Inflow, increases the balance
    Credit,
    /// Outflow, decreases the balance
    Debit,
}

impl std::str::FromStr for TransactionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit" | "entrada" => Ok(TransactionType::Credit),
            "debit" | "saida" | "saída" => Ok(TransactionType::Debit),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Credit => write!(f, "credit"),
            TransactionType::Debit => write!(f, "debit"),
        }
    }
}

/// How a transaction was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "cash", alias = "dinheiro")]
    Cash,
    #[serde(rename = "card", alias = "cartao")]
    Card,
    #[serde(rename = "transfer", alias = "transferencia")]
    Transfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Transfer];
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "dinheiro" => Ok(PaymentMethod::Cash),
            "card" | "cartao" | "cartão" => Ok(PaymentMethod::Card),
            "transfer" | "transferencia" | "transferência" => Ok(PaymentMethod::Transfer),
            _ => Err(format!("Invalid payment method: {}", s)),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Transfer => write!(f, "transfer"),
        }
    }
}

/// A recorded financial event. `amount` is always a positive magnitude;
/// the direction lives in `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,
    pub purpose: String,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub reconciled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
}

impl Transaction {
    /// Attach an identifier to a new transaction
    pub fn from_new(id: String, new: NewTransaction) -> Self {
        Self {
            id,
            kind: new.kind,
            amount: new.amount,
            date: new.date,
            purpose: new.purpose,
            payment_method: new.payment_method,
            reconciled: new.reconciled,
            company_id: new.company_id,
            user_id: new.user_id,
            reference: new.reference,
            document_url: new.document_url,
        }
    }

    /// Contribution to the balance: `+amount` for credits, `-amount` for debits
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Credit => self.amount,
            TransactionType::Debit => -self.amount,
        }
    }

    pub fn date_naive(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

/// A transaction that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,
    pub purpose: String,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub reconciled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
}

/// Account type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Cash,
    Bank,
    Credit,
}

/// Account lookup record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountType,
    #[serde(default)]
    pub balance: Decimal,
}

/// Category type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Revenue,
    Expense,
}

/// Category lookup record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Parse the timestamp shapes a store may hand back: RFC 3339, Postgres
/// `timestamptz` text, naive date-times (read as UTC) and bare dates
/// (read as midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// ISO 8601 (de)serialisation for transaction dates
pub mod timestamp {
    use super::parse_timestamp;
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_timestamp_shapes() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        for raw in [
            "2025-03-01",
            "2025-03-01T10:30:00.000Z",
            "2025-03-01T10:30:00+00:00",
            "2025-03-01 10:30:00+00",
            "2025-03-01T10:30:00",
        ] {
            let parsed = parse_timestamp(raw).unwrap_or_else(|| panic!("failed on {}", raw));
            assert_eq!(parsed.date_naive(), expected, "{}", raw);
        }
        assert!(parse_timestamp("01/03/2025").is_none());
    }

    #[test]
    fn test_transaction_wire_format() {
        let json = serde_json::json!({
            "id": 42,
            "type": "debit",
            "amount": 12.5,
            "date": "2025-03-01",
            "purpose": "Lunch",
            "paymentMethod": "cartao",
            "reconciled": false,
            "companyId": "c1"
        });
        let tx: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(tx.id, "42");
        assert_eq!(tx.kind, TransactionType::Debit);
        assert_eq!(tx.amount, Decimal::from_str("12.5").unwrap());
        assert_eq!(tx.payment_method, PaymentMethod::Card);
        assert_eq!(tx.signed_amount(), Decimal::from_str("-12.5").unwrap());

        let out = serde_json::to_value(&tx).unwrap();
        assert_eq!(out["date"], "2025-03-01T00:00:00.000Z");
        assert_eq!(out["paymentMethod"], "card");
        assert_eq!(out["companyId"], "c1");
        assert!(out.get("userId").is_none());
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("Entrada".parse::<TransactionType>().unwrap(), TransactionType::Credit);
        assert_eq!("transferência".parse::<PaymentMethod>().unwrap(), PaymentMethod::Transfer);
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }
}
