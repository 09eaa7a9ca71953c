use rand::Rng;

use crate::utils::period;

pub const PREFIX: &str = "PSL";

/// Builds `PSL-<MONTHYEAR>-<NNN>` with a random suffix in `100..=999`.
///
/// Not collision free: two calls for the same period can return the same id.
/// Callers treat a primary key clash on insert as retryable.
pub fn generate<R: Rng + ?Sized>(month_year: &str, rng: &mut R) -> String {
    let suffix: u16 = rng.gen_range(100..=999);
    format!("{}-{}-{}", PREFIX, period::compact(month_year), suffix)
}
