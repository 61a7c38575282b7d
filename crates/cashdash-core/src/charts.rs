//! Chart data shaping
//!
//! The shapers turn the transaction log into series and aggregates; the
//! `*_chart` functions wrap those into [`ChartData`] payloads for the UI.

use crate::time::{day_label, month_label, MonthRef};
use cashdash_config::Locale;
use cashdash_store::{PaymentMethod, Transaction, TransactionType};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const BALANCE_COLOR: &str = "#D69E2E";
const REVENUE_COLOR: &str = "#2ECC71";
const EXPENSE_COLOR: &str = "#e53e3e";
const PIE_COLORS: [&str; 6] = ["#D69E2E", "#63B3ED", "#A0AEC0", "#F6E05E", "#B794F4", "#F56565"];

// ==================== Shapers ====================

/// Balance at the end of a day with activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancePoint {
    pub date: NaiveDate,
    pub label: String,
    pub balance: Decimal,
}

/// Revenue and expense of one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub month: MonthRef,
    pub label: String,
    pub revenue: Decimal,
    pub expense: Decimal,
}

/// Debit total for one payment method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodTotal {
    pub method: PaymentMethod,
    pub total: Decimal,
}

/// Running balance, one point per day, oldest first.
///
/// Transactions are stably sorted by timestamp and folded in that order, so
/// a day's point holds the balance after all of that day's transactions.
pub fn cumulative_balance_series(transactions: &[Transaction], locale: Locale) -> Vec<BalancePoint> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by_key(|t| t.date);

    let mut points: Vec<BalancePoint> = Vec::new();
    let mut running = Decimal::ZERO;
    for tx in sorted {
        running += tx.signed_amount();
        let day = tx.date_naive();
        match points.last_mut() {
            Some(last) if last.date == day => last.balance = running,
            _ => points.push(BalancePoint {
                date: day,
                label: day_label(day, locale),
                balance: running,
            }),
        }
    }
    points
}

/// Credits and debits summed per calendar month, in chronological order
pub fn monthly_revenue_expense(transactions: &[Transaction], locale: Locale) -> Vec<MonthlyBucket> {
    let mut months: BTreeMap<MonthRef, (Decimal, Decimal)> = BTreeMap::new();
    for tx in transactions {
        let entry = months
            .entry(MonthRef::of_datetime(&tx.date))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match tx.kind {
            TransactionType::Credit => entry.0 += tx.amount,
            TransactionType::Debit => entry.1 += tx.amount,
        }
    }

    months
        .into_iter()
        .map(|(month, (revenue, expense))| MonthlyBucket {
            month,
            label: month_label(month, locale),
            revenue,
            expense,
        })
        .collect()
}

/// Debit totals per payment method. Methods without debits are left out;
/// the rest follow [`PaymentMethod::ALL`].
pub fn payment_method_distribution(transactions: &[Transaction]) -> Vec<MethodTotal> {
    let mut totals: BTreeMap<PaymentMethod, Decimal> = BTreeMap::new();
    for tx in transactions.iter().filter(|t| t.kind == TransactionType::Debit) {
        *totals.entry(tx.payment_method).or_insert(Decimal::ZERO) += tx.amount;
    }

    PaymentMethod::ALL
        .iter()
        .filter_map(|method| {
            totals.get(method).map(|total| MethodTotal {
                method: *method,
                total: *total,
            })
        })
        .collect()
}

pub fn payment_method_label(method: PaymentMethod, locale: Locale) -> &'static str {
    match (locale, method) {
        (Locale::PtBr, PaymentMethod::Cash) => "Dinheiro",
        (Locale::PtBr, PaymentMethod::Card) => "Cartão",
        (Locale::PtBr, PaymentMethod::Transfer) => "Transferência",
        (Locale::EnUs, PaymentMethod::Cash) => "Cash",
        (Locale::EnUs, PaymentMethod::Card) => "Card",
        (Locale::EnUs, PaymentMethod::Transfer) => "Transfer",
    }
}

// ==================== Chart Payloads ====================

/// Chart data point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartDataPoint {
    pub label: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Share of the whole, for pie slices
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

/// Chart dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: Option<String>,
    pub border_color: Option<String>,
}

/// Chart data for visualization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartData {
    pub chart_type: String,
    pub title: String,
    pub data_points: Vec<ChartDataPoint>,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// Charts served by the reports endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Balance,
    Monthly,
    PaymentMethods,
}

impl std::str::FromStr for ChartKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balance" => Ok(ChartKind::Balance),
            "monthly" => Ok(ChartKind::Monthly),
            "payment-methods" => Ok(ChartKind::PaymentMethods),
            _ => Err(format!("Unknown chart: {}", s)),
        }
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn titles(locale: Locale) -> (&'static str, &'static str, &'static str) {
    match locale {
        Locale::PtBr => ("Evolução do Saldo", "Receitas vs Despesas", "Despesas por Forma de Pagamento"),
        Locale::EnUs => ("Balance History", "Revenue vs Expenses", "Expenses by Payment Method"),
    }
}

pub fn chart(kind: ChartKind, transactions: &[Transaction], locale: Locale) -> ChartData {
    match kind {
        ChartKind::Balance => balance_chart(transactions, locale),
        ChartKind::Monthly => monthly_chart(transactions, locale),
        ChartKind::PaymentMethods => payment_method_chart(transactions, locale),
    }
}

/// Line chart of the running balance
pub fn balance_chart(transactions: &[Transaction], locale: Locale) -> ChartData {
    let series = cumulative_balance_series(transactions, locale);
    let data_points: Vec<ChartDataPoint> = series
        .iter()
        .map(|p| ChartDataPoint {
            label: p.label.clone(),
            value: to_f64(p.balance),
            color: None,
            percentage: None,
        })
        .collect();

    let dataset_label = match locale {
        Locale::PtBr => "Saldo",
        Locale::EnUs => "Balance",
    };

    ChartData {
        chart_type: "line".to_string(),
        title: titles(locale).0.to_string(),
        labels: data_points.iter().map(|dp| dp.label.clone()).collect(),
        datasets: vec![ChartDataset {
            label: dataset_label.to_string(),
            data: data_points.iter().map(|dp| dp.value).collect(),
            background_color: None,
            border_color: Some(BALANCE_COLOR.to_string()),
        }],
        data_points,
    }
}

/// Bar chart with a revenue and an expense dataset per month
pub fn monthly_chart(transactions: &[Transaction], locale: Locale) -> ChartData {
    let buckets = monthly_revenue_expense(transactions, locale);
    let (revenue_label, expense_label) = match locale {
        Locale::PtBr => ("Receitas", "Despesas"),
        Locale::EnUs => ("Revenue", "Expenses"),
    };

    let revenue = ChartDataset {
        label: revenue_label.to_string(),
        data: buckets.iter().map(|b| to_f64(b.revenue)).collect(),
        background_color: Some(REVENUE_COLOR.to_string()),
        border_color: Some(REVENUE_COLOR.to_string()),
    };
    let expense = ChartDataset {
        label: expense_label.to_string(),
        data: buckets.iter().map(|b| to_f64(b.expense)).collect(),
        background_color: Some(EXPENSE_COLOR.to_string()),
        border_color: Some(EXPENSE_COLOR.to_string()),
    };

    ChartData {
        chart_type: "bar".to_string(),
        title: titles(locale).1.to_string(),
        data_points: buckets
            .iter()
            .map(|b| ChartDataPoint {
                label: b.label.clone(),
                value: to_f64(b.revenue - b.expense),
                color: None,
                percentage: None,
            })
            .collect(),
        labels: buckets.iter().map(|b| b.label.clone()).collect(),
        datasets: vec![revenue, expense],
    }
}

/// Pie chart of debits by payment method
pub fn payment_method_chart(transactions: &[Transaction], locale: Locale) -> ChartData {
    let totals = payment_method_distribution(transactions);
    let sum: Decimal = totals.iter().map(|t| t.total).sum();

    let data_points: Vec<ChartDataPoint> = totals
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let percentage = if sum > Decimal::ZERO {
                to_f64(t.total / sum * Decimal::ONE_HUNDRED)
            } else {
                0.0
            };
            ChartDataPoint {
                label: payment_method_label(t.method, locale).to_string(),
                value: to_f64(t.total),
                color: Some(PIE_COLORS[i % PIE_COLORS.len()].to_string()),
                percentage: Some(percentage),
            }
        })
        .collect();

    ChartData {
        chart_type: "pie".to_string(),
        title: titles(locale).2.to_string(),
        labels: data_points.iter().map(|dp| dp.label.clone()).collect(),
        datasets: vec![ChartDataset {
            label: titles(locale).2.to_string(),
            data: data_points.iter().map(|dp| dp.value).collect(),
            background_color: Some(PIE_COLORS[0].to_string()),
            border_color: None,
        }],
        data_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dec, tx, tx_with_method};

    #[test]
    fn test_same_day_collapses_to_last_balance() {
        let txs = vec![
            tx("1", TransactionType::Credit, "50", "2025-03-01T09:00:00Z"),
            tx("2", TransactionType::Debit, "20", "2025-03-01T18:00:00Z"),
        ];
        let series = cumulative_balance_series(&txs, Locale::PtBr);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].balance, dec("30"));
        assert_eq!(series[0].label, "01/03/2025");
    }

    #[test]
    fn test_series_sorts_store_order() {
        // Store order is newest first
        let txs = vec![
            tx("3", TransactionType::Debit, "5", "2025-03-04"),
            tx("2", TransactionType::Credit, "10", "2025-03-02"),
            tx("1", TransactionType::Credit, "100", "2025-02-27"),
        ];
        let series = cumulative_balance_series(&txs, Locale::EnUs);
        let balances: Vec<Decimal> = series.iter().map(|p| p.balance).collect();
        assert_eq!(balances, vec![dec("100"), dec("110"), dec("105")]);
        assert_eq!(series[0].label, "2/27/2025");
    }

    #[test]
    fn test_monthly_buckets() {
        let txs = vec![
            tx("1", TransactionType::Credit, "100", "2025-03-10"),
            tx("2", TransactionType::Debit, "40", "2025-03-12"),
            tx("3", TransactionType::Debit, "7", "2024-12-01"),
        ];
        let buckets = monthly_revenue_expense(&txs, Locale::PtBr);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label, "dez. de 24");
        assert_eq!(buckets[0].expense, dec("7"));
        assert_eq!(buckets[1].month, MonthRef::new(2025, 3));
        assert_eq!(buckets[1].revenue, dec("100"));
        assert_eq!(buckets[1].expense, dec("40"));
    }

    #[test]
    fn test_payment_distribution_counts_debits_only() {
        let txs = vec![
            tx_with_method("1", TransactionType::Debit, "30", PaymentMethod::Transfer),
            tx_with_method("2", TransactionType::Debit, "20", PaymentMethod::Cash),
            tx_with_method("3", TransactionType::Credit, "500", PaymentMethod::Card),
            tx_with_method("4", TransactionType::Debit, "10", PaymentMethod::Transfer),
        ];
        let totals = payment_method_distribution(&txs);
        assert_eq!(
            totals,
            vec![
                MethodTotal { method: PaymentMethod::Cash, total: dec("20") },
                MethodTotal { method: PaymentMethod::Transfer, total: dec("40") },
            ]
        );

        let pie = payment_method_chart(&txs, Locale::PtBr);
        assert_eq!(pie.labels, vec!["Dinheiro", "Transferência"]);
        assert_eq!(pie.data_points[0].color.as_deref(), Some("#D69E2E"));
        let shares: Vec<f64> = pie.data_points.iter().filter_map(|dp| dp.percentage).collect();
        assert!((shares[0] - 33.333).abs() < 0.01);
        assert!((shares.iter().sum::<f64>() - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_chart_kind_and_payloads() {
        assert_eq!("payment-methods".parse::<ChartKind>().unwrap(), ChartKind::PaymentMethods);
        assert!("pie".parse::<ChartKind>().is_err());

        let txs = vec![
            tx("1", TransactionType::Credit, "100", "2025-03-10"),
            tx("2", TransactionType::Debit, "40", "2025-03-12"),
        ];
        let bar = chart(ChartKind::Monthly, &txs, Locale::EnUs);
        assert_eq!(bar.chart_type, "bar");
        assert_eq!(bar.datasets.len(), 2);
        assert_eq!(bar.datasets[0].data, vec![100.0]);
        assert_eq!(bar.datasets[1].data, vec![40.0]);

        let line = chart(ChartKind::Balance, &txs, Locale::EnUs);
        assert_eq!(line.datasets[0].data, vec![100.0, 60.0]);
    }
}
