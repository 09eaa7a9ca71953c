use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::component::{deductions, earnings};

/// Storage precision of every money column.
pub const MONEY_SCALE: u32 = 2;

/// Net salary from component amounts keyed by component key.
///
/// Components missing from `amounts` count as zero. No rounding happens here;
/// see [`round_money`].
pub fn net_salary(amounts: &BTreeMap<String, Decimal>) -> Decimal {
    let total_earnings: Decimal = earnings().filter_map(|c| amounts.get(c.key)).sum();
    let total_deductions: Decimal = deductions().filter_map(|c| amounts.get(c.key)).sum();

    total_earnings - total_deductions
}

/// Rounds a money value to storage precision. Called once, when persisting.
///
/// The result always carries two decimal places, so `50000` becomes `50000.00`.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}
