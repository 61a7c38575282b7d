//! Utility functions and helpers

use rust_decimal::{Decimal, RoundingStrategy};

/// Format a non-negative integer with a thousands separator
pub fn format_number<T: ToString>(n: T, separator: char) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let mut count = 0;
    for c in s.chars().rev() {
        if count == 3 {
            result.push(separator);
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    result.chars().rev().collect()
}

/// Format an amount as Brazilian reais, e.g. `R$ 1.234,56` / `-R$ 20,00`
pub fn format_brl(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let abs = rounded.abs();
    let integer = abs.trunc();
    let cents = ((abs - integer) * Decimal::ONE_HUNDRED).trunc();
    format!(
        "{}R$ {},{:0>2}",
        sign,
        format_number(integer, '.'),
        cents.to_string()
    )
}

/// Human-readable byte size (`0 Bytes`, `1.5 KB`, `2 MB`)
pub fn format_bytes(bytes: u64) -> String {
    const SIZES: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZES.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZES[unit])
}

/// Time-based local transaction ID (`txn_<millis>`)
pub fn generate_id_at(millis: u128) -> String {
    format!("txn_{}", millis)
}

/// Milliseconds since the Unix epoch
pub fn now_millis() -> u128 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Escape text for inclusion in HTML
pub fn escape_html(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
