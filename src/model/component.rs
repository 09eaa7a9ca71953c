#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ComponentKind {
    Earning,
    Deduction,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AmountRule {
    /// Must be present and strictly greater than zero
    RequiredPositive,
    /// May be omitted (treated as zero), otherwise zero or more
    OptionalNonNegative,
}

/// One named earning or deduction on a payslip.
///
/// `key` is used both as the JSON field name and as the column name.
#[derive(Debug, Copy, Clone)]
pub struct PayComponent {
    pub key: &'static str,
    pub kind: ComponentKind,
    pub rule: AmountRule,
}

const fn earning(key: &'static str, rule: AmountRule) -> PayComponent {
    PayComponent {
        key,
        kind: ComponentKind::Earning,
        rule,
    }
}

const fn deduction(key: &'static str) -> PayComponent {
    PayComponent {
        key,
        kind: ComponentKind::Deduction,
        rule: AmountRule::OptionalNonNegative,
    }
}

/// Every earning and deduction a payslip carries, in column order.
///
/// Validation, net salary calculation, the table DDL, the insert statement and
/// row decoding all walk this list. Adding a component here is the only change
/// needed to support it end to end (plus a column on an existing table).
pub const PAY_COMPONENTS: &[PayComponent] = &[
    earning("basic_salary", AmountRule::RequiredPositive),
    earning("hra", AmountRule::OptionalNonNegative),
    earning("da", AmountRule::OptionalNonNegative),
    earning("other_allowance", AmountRule::OptionalNonNegative),
    earning("wage_allowance", AmountRule::OptionalNonNegative),
    earning("medical_allowance", AmountRule::OptionalNonNegative),
    deduction("professional_tax"),
    deduction("tds"),
    deduction("provident_fund"),
    deduction("lwp"),
    deduction("other_deduction"),
];

pub fn earnings() -> impl Iterator<Item = &'static PayComponent> {
    PAY_COMPONENTS
        .iter()
        .filter(|c| c.kind == ComponentKind::Earning)
}

pub fn deductions() -> impl Iterator<Item = &'static PayComponent> {
    PAY_COMPONENTS
        .iter()
        .filter(|c| c.kind == ComponentKind::Deduction)
}
