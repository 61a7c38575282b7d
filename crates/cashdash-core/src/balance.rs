//! Balance and KPI aggregation
//!
//! Every aggregate is recomputed from the full transaction collection on each
//! call. The only carried state is the optional manual balance override,
//! which is moved by [`apply_delta`] whenever a transaction is added or
//! removed.

use crate::time::MonthRef;
use cashdash_store::{Transaction, TransactionType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Signed sum of all transactions: credits add, debits subtract
pub fn compute_balance(transactions: &[Transaction]) -> Decimal {
    transactions.iter().map(Transaction::signed_amount).sum()
}

/// Sum of amounts of `kind` dated within `month`
pub fn compute_monthly_total(
    transactions: &[Transaction],
    kind: TransactionType,
    month: MonthRef,
) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.kind == kind && month.contains(&t.date))
        .map(|t| t.amount)
        .sum()
}

/// Percentage change from `previous` to `current`.
///
/// Returns exactly zero when `previous` is not positive. That is a
/// zero-fallback, not a "no change" signal.
pub fn compute_percent_change(current: Decimal, previous: Decimal) -> Decimal {
    if previous <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (current - previous) / previous * Decimal::ONE_HUNDRED
}

pub fn effective_balance(computed: Decimal, manual: Option<Decimal>) -> Decimal {
    manual.unwrap_or(computed)
}

/// Move an active override by the signed contribution of `tx`; adding applies
/// it, removing reverses it. Without an override this is a no-op.
pub fn apply_delta(manual: Option<Decimal>, tx: &Transaction, is_addition: bool) -> Option<Decimal> {
    manual.map(|value| {
        let delta = tx.signed_amount();
        if is_addition {
            value + delta
        } else {
            value - delta
        }
    })
}

/// Dashboard headline figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardKpis {
    pub month: MonthRef,
    pub revenue: Decimal,
    pub expense: Decimal,
    pub previous_revenue: Decimal,
    pub previous_expense: Decimal,
    pub revenue_change: Decimal,
    pub expense_change: Decimal,
    pub computed_balance: Decimal,
    /// Override when set, otherwise the computed balance
    pub balance: Decimal,
    pub manual_balance: bool,
}

/// KPIs for the month containing `today` against the month before it
pub fn dashboard_kpis(transactions: &[Transaction], today: NaiveDate, manual: Option<Decimal>) -> DashboardKpis {
    let current = MonthRef::of(today);
    let previous = current.previous();

    let revenue = compute_monthly_total(transactions, TransactionType::Credit, current);
    let expense = compute_monthly_total(transactions, TransactionType::Debit, current);
    let previous_revenue = compute_monthly_total(transactions, TransactionType::Credit, previous);
    let previous_expense = compute_monthly_total(transactions, TransactionType::Debit, previous);
    let computed_balance = compute_balance(transactions);

    DashboardKpis {
        month: current,
        revenue,
        expense,
        previous_revenue,
        previous_expense,
        revenue_change: compute_percent_change(revenue, previous_revenue),
        expense_change: compute_percent_change(expense, previous_expense),
        computed_balance,
        balance: effective_balance(computed_balance, manual),
        manual_balance: manual.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dec, tx};

    fn sample() -> Vec<Transaction> {
        vec![
            tx("1", TransactionType::Credit, "100", "2025-03-02"),
            tx("2", TransactionType::Debit, "40", "2025-03-10"),
            tx("3", TransactionType::Debit, "12.50", "2025-02-20"),
            tx("4", TransactionType::Credit, "80", "2025-02-01"),
        ]
    }

    #[test]
    fn test_balance_is_order_independent() {
        let mut txs = sample();
        let expected = dec("127.50");
        assert_eq!(compute_balance(&txs), expected);
        for _ in 0..txs.len() {
            txs.rotate_left(1);
            assert_eq!(compute_balance(&txs), expected);
        }
        txs.reverse();
        assert_eq!(compute_balance(&txs), expected);
        txs.swap(0, 2);
        assert_eq!(compute_balance(&txs), expected);
    }

    #[test]
    fn test_empty_balance() {
        assert_eq!(compute_balance(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_monthly_total_matches_month_and_type() {
        let txs = sample();
        let march = MonthRef::new(2025, 3);
        assert_eq!(compute_monthly_total(&txs, TransactionType::Credit, march), dec("100"));
        assert_eq!(compute_monthly_total(&txs, TransactionType::Debit, march), dec("40"));
        // Same month number, other year
        assert_eq!(
            compute_monthly_total(&txs, TransactionType::Credit, MonthRef::new(2024, 3)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_percent_change_zero_fallback() {
        for x in ["0", "15", "-3", "1000000"] {
            assert_eq!(compute_percent_change(dec(x), Decimal::ZERO), Decimal::ZERO);
        }
        assert_eq!(compute_percent_change(dec("5"), dec("-10")), Decimal::ZERO);
        assert_eq!(compute_percent_change(dec("150"), dec("100")), dec("50"));
        assert_eq!(compute_percent_change(dec("40"), dec("80")), dec("-50"));
    }

    #[test]
    fn test_apply_delta() {
        let credit = tx("a", TransactionType::Credit, "25", "2025-03-01");
        let debit = tx("b", TransactionType::Debit, "25", "2025-03-01");
        let b0 = Some(dec("1000"));

        assert_eq!(apply_delta(b0, &credit, true), Some(dec("1025")));
        assert_eq!(apply_delta(b0, &debit, true), Some(dec("975")));
        assert_eq!(apply_delta(apply_delta(b0, &debit, true), &debit, false), b0);
        assert_eq!(apply_delta(None, &credit, true), None);
    }

    #[test]
    fn test_effective_balance() {
        assert_eq!(effective_balance(dec("10"), None), dec("10"));
        assert_eq!(effective_balance(dec("10"), Some(dec("-2"))), dec("-2"));
    }

    #[test]
    fn test_dashboard_kpis() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let kpis = dashboard_kpis(&sample(), today, None);
        assert_eq!(kpis.revenue, dec("100"));
        assert_eq!(kpis.expense, dec("40"));
        assert_eq!(kpis.previous_revenue, dec("80"));
        assert_eq!(kpis.previous_expense, dec("12.50"));
        assert_eq!(kpis.revenue_change, dec("25"));
        assert_eq!(kpis.expense_change, dec("220"));
        assert_eq!(kpis.balance, kpis.computed_balance);
        assert!(!kpis.manual_balance);
    }

    #[test]
    fn test_dashboard_kpis_january_looks_at_december() {
        let txs = vec![
            tx("1", TransactionType::Credit, "50", "2024-12-31"),
            tx("2", TransactionType::Credit, "75", "2025-01-03"),
        ];
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let kpis = dashboard_kpis(&txs, today, Some(dec("9")));
        assert_eq!(kpis.previous_revenue, dec("50"));
        assert_eq!(kpis.revenue_change, dec("50"));
        assert_eq!(kpis.balance, dec("9"));
        assert_eq!(kpis.computed_balance, dec("125"));
        assert!(kpis.manual_balance);
    }
}
