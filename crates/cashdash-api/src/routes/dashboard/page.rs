//! Dashboard page - server-rendered HTML

use crate::routes::today;
use crate::{base_html, AppState};
use axum::response::Html;
use cashdash_config::{Locale, Theme};
use cashdash_core::{DashboardKpis, Transaction, TransactionType};
use cashdash_utils::{escape_html, format_brl};
use chrono::Datelike;
use rust_decimal::Decimal;

const RECENT_LIMIT: usize = 10;

/// Dashboard page
pub async fn page_dashboard(state: axum::extract::State<AppState>) -> Html<String> {
    let theme = state.theme.read().await.current();
    let ledger = state.ledger.read().await;
    let kpis = ledger.kpis(today());
    let locale = ledger.locale();

    let content = format!(
        r#"<div class="max-w-6xl mx-auto p-6 space-y-6">
    {}
    {}
    <div class="grid grid-cols-1 lg:grid-cols-3 gap-4">
        <div class="bg-white dark:bg-gray-800 rounded-lg shadow p-4 lg:col-span-2"><canvas id="chart-balance"></canvas></div>
        <div class="bg-white dark:bg-gray-800 rounded-lg shadow p-4"><canvas id="chart-payment-methods"></canvas></div>
        <div class="bg-white dark:bg-gray-800 rounded-lg shadow p-4 lg:col-span-3"><canvas id="chart-monthly"></canvas></div>
    </div>
    {}
</div>
{}"#,
        header(theme, locale),
        kpi_cards(&kpis, locale),
        recent_table(ledger.transactions(), locale),
        CHART_SCRIPT
    );

    Html(base_html("Dashboard", theme_class(theme), &content))
}

fn theme_class(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => "dark",
        Theme::Light => "",
    }
}

fn header(theme: Theme, locale: Locale) -> String {
    let toggle_label = match (theme, locale) {
        (Theme::Light, Locale::PtBr) => "Modo escuro",
        (Theme::Dark, Locale::PtBr) => "Modo claro",
        (Theme::Light, Locale::EnUs) => "Dark mode",
        (Theme::Dark, Locale::EnUs) => "Light mode",
    };
    format!(
        r#"<header class="flex items-center justify-between">
        <h1 class="text-2xl font-bold">CashDash</h1>
        <button class="px-3 py-1 rounded border border-gray-300 dark:border-gray-600"
            onclick="fetch('/api/theme/toggle', {{ method: 'POST' }}).then(() => location.reload())">{}</button>
    </header>"#,
        toggle_label
    )
}

fn change_badge(change: Decimal) -> String {
    let class = if change >= Decimal::ZERO { "text-green-600" } else { "text-red-600" };
    format!(r#"<span class="text-sm {}">{}%</span>"#, class, change.round_dp(1))
}

fn kpi_cards(kpis: &DashboardKpis, locale: Locale) -> String {
    let (balance_label, revenue_label, expense_label) = match locale {
        Locale::PtBr => ("Saldo", "Receitas do mês", "Despesas do mês"),
        Locale::EnUs => ("Balance", "Revenue this month", "Expenses this month"),
    };
    let manual_note = if kpis.manual_balance {
        r#"<span class="text-xs text-gray-500">(manual)</span>"#
    } else {
        ""
    };

    format!(
        r#"<div class="grid grid-cols-1 md:grid-cols-3 gap-4">
        <div class="bg-white dark:bg-gray-800 rounded-lg shadow p-4">
            <div class="text-sm text-gray-500">{} {}</div>
            <div class="text-2xl font-semibold">{}</div>
        </div>
        <div class="bg-white dark:bg-gray-800 rounded-lg shadow p-4">
            <div class="text-sm text-gray-500">{}</div>
            <div class="text-2xl font-semibold text-green-600">{}</div>
            {}
        </div>
        <div class="bg-white dark:bg-gray-800 rounded-lg shadow p-4">
            <div class="text-sm text-gray-500">{}</div>
            <div class="text-2xl font-semibold text-red-600">{}</div>
            {}
        </div>
    </div>"#,
        balance_label,
        manual_note,
        format_brl(kpis.balance),
        revenue_label,
        format_brl(kpis.revenue),
        change_badge(kpis.revenue_change),
        expense_label,
        format_brl(kpis.expense),
        change_badge(kpis.expense_change),
    )
}

fn recent_table(transactions: &[Transaction], locale: Locale) -> String {
    let title = match locale {
        Locale::PtBr => "Transações recentes",
        Locale::EnUs => "Recent transactions",
    };

    let rows: String = transactions
        .iter()
        .take(RECENT_LIMIT)
        .map(|tx| {
            let (sign, class) = match tx.kind {
                TransactionType::Credit => ("+", "text-green-600"),
                TransactionType::Debit => ("-", "text-red-600"),
            };
            let date = tx.date.date_naive();
            format!(
                r#"<tr class="border-t border-gray-200 dark:border-gray-700">
                <td class="py-2">{:02}/{:02}/{}</td>
                <td class="py-2">{}</td>
                <td class="py-2 text-right {}">{} {}</td>
            </tr>"#,
                date.day(),
                date.month(),
                date.year(),
                escape_html(&tx.purpose),
                class,
                sign,
                format_brl(tx.amount)
            )
        })
        .collect();

    format!(
        r#"<div class="bg-white dark:bg-gray-800 rounded-lg shadow p-4">
        <h2 class="text-lg font-semibold mb-2">{}</h2>
        <table class="w-full text-sm">{}</table>
    </div>"#,
        title, rows
    )
}

const CHART_SCRIPT: &str = r#"<script>
function renderChart(kind) {
    fetch('/api/reports/charts/' + kind)
        .then(r => r.json())
        .then(chart => {
            const datasets = chart.chart_type === 'pie'
                ? [{ label: chart.title, data: chart.data_points.map(p => p.value), backgroundColor: chart.data_points.map(p => p.color) }]
                : chart.datasets.map(d => ({ label: d.label, data: d.data, backgroundColor: d.background_color, borderColor: d.border_color }));
            new Chart(document.getElementById('chart-' + kind), {
                type: chart.chart_type,
                data: { labels: chart.labels, datasets: datasets },
                options: { plugins: { title: { display: true, text: chart.title } } }
            });
        });
}
['balance', 'monthly', 'payment-methods'].forEach(renderChart);
</script>"#;

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use cashdash_store::{PaymentMethod, TransactionType};

    #[tokio::test]
    async fn test_dashboard_page_escapes_purpose() {
        let mut lunch = tx("1", TransactionType::Debit, "12.5", "2025-03-01", PaymentMethod::Cash);
        lunch.purpose = "<b>Lunch</b>".to_string();
        let (state, _dir) = state_with(vec![lunch]).await;

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (status, body) = send(&state, request).await;
        let html = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("CashDash"));
        assert!(html.contains("&lt;b&gt;Lunch&lt;/b&gt;"));
        assert!(html.contains("R$ 12,50"));
        assert!(html.contains("01/03/2025"));
    }

    #[tokio::test]
    async fn test_dashboard_page_follows_theme() {
        let (state, _dir) = state_with(vec![]).await;
        state.theme.write().await.set(cashdash_config::Theme::Dark).unwrap();

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (_, body) = send(&state, request).await;
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains(r#"<html lang="pt-BR" class="dark">"#));
        assert!(html.contains("Modo claro"));
    }
}
