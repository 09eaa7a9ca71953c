use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

static MONTH_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+)\s+([0-9]{4})$").expect("valid month_year regex"));

static YEAR_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{1,2})$").expect("valid year-month regex"));

/// A pay period such as `"March 2025"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayPeriod {
    /// Canonical label, e.g. `March 2025`
    pub label: String,
    /// First day of the month
    pub start: NaiveDate,
}

/// 1-based month number for a full English month name, any case.
pub fn month_from_name(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .map(|i| i as u32 + 1)
}

/// Earliest year a MySQL `DATE` column stores.
const MIN_YEAR: i32 = 1000;

fn period_from_parts(month: u32, year: i32) -> Option<PayPeriod> {
    if year < MIN_YEAR {
        return None;
    }
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let label = format!("{} {:04}", MONTH_NAMES[(month - 1) as usize], year);
    Some(PayPeriod { label, start })
}

/// Parses `"<Month> <YYYY>"`.
pub fn parse_month_year(value: &str) -> Option<PayPeriod> {
    let caps = MONTH_YEAR_RE.captures(value.trim())?;
    let month = month_from_name(&caps[1])?;
    let year: i32 = caps[2].parse().ok()?;
    period_from_parts(month, year)
}

/// Parses a range bound given either as `YYYY-MM` or as `"<Month> <YYYY>"`.
pub fn parse_period_bound(value: &str) -> Option<PayPeriod> {
    let value = value.trim();
    if let Some(caps) = YEAR_MONTH_RE.captures(value) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        return period_from_parts(month, year);
    }
    parse_month_year(value)
}

/// Month filter value: `1`..`12` or a month name.
pub fn parse_month_filter(value: &str) -> Option<u32> {
    let value = value.trim();
    match value.parse::<u32>() {
        Ok(m) if (1..=12).contains(&m) => Some(m),
        Ok(_) => None,
        Err(_) => month_from_name(value),
    }
}

/// Compact period used inside payslip identifiers: whitespace removed, upper-cased.
pub fn compact(period: &str) -> String {
    period
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}
