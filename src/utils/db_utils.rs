use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Arguments, mysql::MySqlArguments};

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    I64(i64),
    U8(u8),
    Decimal(Decimal),
    Date(NaiveDate),
}

impl SqlValue {
    fn add_to(self, args: &mut MySqlArguments) {
        match self {
            SqlValue::String(v) => args.add(v),
            SqlValue::I64(v) => args.add(v),
            SqlValue::U8(v) => args.add(v),
            SqlValue::Decimal(v) => args.add(v),
            SqlValue::Date(v) => args.add(v),
        }
    }
}

/// ===============================
/// WHERE clause with its bindings
/// ===============================
///
/// Every fragment carries its own `?` placeholders and the values are kept in
/// the same order, so user input only ever reaches the database as a bound
/// parameter.
#[derive(Debug, Default, Clone)]
pub struct Conditions {
    fragments: Vec<&'static str>,
    values: Vec<SqlValue>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `fragment`, which must contain exactly `values.len()` placeholders.
    pub fn push(&mut self, fragment: &'static str, values: impl IntoIterator<Item = SqlValue>) {
        let start = self.values.len();
        self.values.extend(values);
        debug_assert_eq!(
            fragment.matches('?').count(),
            self.values.len() - start,
            "placeholder count mismatch in `{fragment}`"
        );
        self.fragments.push(fragment);
    }

    /// `WHERE a AND b ...`, or an empty string when there are no conditions.
    pub fn where_clause(&self) -> String {
        if self.fragments.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.fragments.join(" AND "))
        }
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Bindings for the WHERE clause followed by `extra` (e.g. LIMIT/OFFSET).
    pub fn arguments(&self, extra: impl IntoIterator<Item = SqlValue>) -> MySqlArguments {
        to_arguments(self.values.iter().cloned().chain(extra))
    }
}

pub fn to_arguments(values: impl IntoIterator<Item = SqlValue>) -> MySqlArguments {
    let mut args = MySqlArguments::default();
    for value in values {
        value.add_to(&mut args);
    }
    args
}

/// `%term%` for a LIKE comparison, with LIKE wildcards in `term` escaped.
pub fn like_contains(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
