//! Calendar months and locale labels

use cashdash_config::Locale;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

const MONTHS_PT_BR: [&str; 12] = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho",
    "julho", "agosto", "setembro", "outubro", "novembro", "dezembro",
];

const MONTHS_SHORT_PT_BR: [&str; 12] = [
    "jan.", "fev.", "mar.", "abr.", "mai.", "jun.",
    "jul.", "ago.", "set.", "out.", "nov.", "dez.",
];

const MONTHS_EN_US: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

const MONTHS_SHORT_EN_US: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun",
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month of a given year. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

impl MonthRef {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn of_datetime(date: &DateTime<Utc>) -> Self {
        Self::new(date.year(), date.month())
    }

    /// The month before this one; January wraps to December of the previous year
    pub fn previous(self) -> Self {
        if self.month <= 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    pub fn contains(&self, date: &DateTime<Utc>) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

fn month_index(month: u32) -> usize {
    (month.clamp(1, 12) - 1) as usize
}

/// Full month name, e.g. `março` for pt-BR
pub fn month_name(month: u32, locale: Locale) -> &'static str {
    match locale {
        Locale::PtBr => MONTHS_PT_BR[month_index(month)],
        Locale::EnUs => MONTHS_EN_US[month_index(month)],
    }
}

/// All full month names in calendar order
pub fn month_names(locale: Locale) -> &'static [&'static str; 12] {
    match locale {
        Locale::PtBr => &MONTHS_PT_BR,
        Locale::EnUs => &MONTHS_EN_US,
    }
}

/// Month number (1-12) for a full month name, ignoring case
pub fn parse_month_name(name: &str, locale: Locale) -> Option<u32> {
    let name = name.trim().to_lowercase();
    month_names(locale)
        .iter()
        .position(|m| m.to_lowercase() == name)
        .map(|i| i as u32 + 1)
}

/// Short month plus two-digit year: `mar. de 25` (pt-BR), `Mar 25` (en-US)
pub fn month_label(month: MonthRef, locale: Locale) -> String {
    let yy = month.year.rem_euclid(100);
    match locale {
        Locale::PtBr => format!("{} de {:02}", MONTHS_SHORT_PT_BR[month_index(month.month)], yy),
        Locale::EnUs => format!("{} {:02}", MONTHS_SHORT_EN_US[month_index(month.month)], yy),
    }
}

/// Day label: `01/03/2025` (pt-BR), `3/1/2025` (en-US)
pub fn day_label(date: NaiveDate, locale: Locale) -> String {
    match locale {
        Locale::PtBr => date.format("%d/%m/%Y").to_string(),
        Locale::EnUs => format!("{}/{}/{}", date.month(), date.day(), date.year()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_previous_wraps_year() {
        assert_eq!(MonthRef::new(2025, 1).previous(), MonthRef::new(2024, 12));
        assert_eq!(MonthRef::new(2025, 3).previous(), MonthRef::new(2025, 2));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(3, Locale::PtBr), "março");
        assert_eq!(month_name(12, Locale::EnUs), "December");
        assert_eq!(parse_month_name("Março", Locale::PtBr), Some(3));
        assert_eq!(parse_month_name("march", Locale::EnUs), Some(3));
        assert_eq!(parse_month_name("marzo", Locale::PtBr), None);
    }

    #[test]
    fn test_labels() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(day_label(date, Locale::PtBr), "01/03/2025");
        assert_eq!(day_label(date, Locale::EnUs), "3/1/2025");
        assert_eq!(month_label(MonthRef::of(date), Locale::PtBr), "mar. de 25");
        assert_eq!(month_label(MonthRef::new(2009, 12), Locale::EnUs), "Dec 09");
    }
}
