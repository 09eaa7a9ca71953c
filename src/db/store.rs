use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::DbResult;
use crate::model::payslip::{NewPayslip, Payslip};

/// History listing filters. All optional, combined with AND.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HistoryFilter {
    /// Case-insensitive substring of employee id or name
    pub search: Option<String>,
    /// 1..=12
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    /// 1-based
    pub page: u32,
    pub limit: u32,
}

impl Page {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Inclusive bounds on the first day of the pay period.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PeriodRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Persistence for payslips.
///
/// Each call acquires what it needs from the pool and gives it back before
/// returning, on success and on error alike.
#[async_trait]
pub trait PayslipStore: Send + Sync {
    /// Round trip to the store, used by the health probe.
    async fn ping(&self) -> DbResult<()>;

    /// Inserts a payslip unless one exists for the same employee and period.
    ///
    /// The existence check and the insert share one transaction; the unique
    /// key on (employee_id, month_year) is what finally rejects a duplicate.
    /// Fails with `DbError::DuplicatePayslip` or, when the generated id is
    /// taken, `DbError::IdCollision`.
    async fn create(&self, payslip: &NewPayslip) -> DbResult<Payslip>;

    async fn find_by_id(&self, id: &str) -> DbResult<Option<Payslip>>;

    /// One page of payslips ordered by period (newest first) then employee id,
    /// plus the total number of matches.
    async fn list(&self, filter: &HistoryFilter, page: Page) -> DbResult<(Vec<Payslip>, i64)>;

    /// Payslips of one employee within `range`, newest first.
    ///
    /// Returns `None` when no stored payslip has this employee id and email
    /// pair.
    async fn find_for_employee(
        &self,
        employee_id: &str,
        employee_email: &str,
        range: &PeriodRange,
    ) -> DbResult<Option<Vec<Payslip>>>;
}
