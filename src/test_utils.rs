//! Fixtures shared by unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use serde_json::{Value, json};

use crate::config::Config;
use crate::db::{HistoryFilter, Page, PayslipStore, PeriodRange};
use crate::errors::{DbError, DbResult};
use crate::model::payslip::{DEFAULT_STATUS, NewPayslip, Payslip};
use crate::utils::salary::{net_salary, round_money};
use crate::utils::validator::{ValidationRules, validate_payslip};
use crate::utils::period;

/// A payload that passes every validation rule.
///
/// Net salary: 76500.50 - 5250.25 = 71250.25
pub fn valid_payload() -> Value {
    json!({
        "employee_id": "ATS0123",
        "employee_name": "Ravi Kumar",
        "employee_email": "ravi.kumar@example.com",
        "month_year": "March 2025",
        "designation": "Software Engineer",
        "office_location": "Hyderabad",
        "employment_type": "Full-Time",
        "date_of_joining": "2022-04-11",
        "working_days": 22,
        "bank_name": "HDFC Bank",
        "pan_no": "ABCDE1234F",
        "bank_account_no": "123456789012",
        "pf_no": "APHYD00123450000012345",
        "uan_no": "100123456789",
        "esic_no": "31001234560001",
        "basic_salary": 50000,
        "hra": 20000,
        "da": 5000,
        "other_allowance": "1500.50",
        "professional_tax": 200,
        "tds": 3000,
        "provident_fund": 1800,
        "lwp": 250.25
    })
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "SERVER_ADDR" => Some("127.0.0.1:0".into()),
        "DATABASE_URL" => Some("mysql://root@localhost/payroll_test".into()),
        _ => None,
    })
    .expect("test config")
}

/// A validated payslip for `employee_id` in `month_year`.
pub fn new_payslip(employee_id: &str, month_year: &str) -> NewPayslip {
    let mut payload = valid_payload();
    payload["employee_id"] = json!(employee_id);
    payload["month_year"] = json!(month_year);

    let rules = ValidationRules {
        strict_email_domains: false,
        today: NaiveDate::from_ymd_opt(2100, 1, 1).expect("valid date"),
    };
    let input = validate_payslip(&payload, &rules).expect("fixture payload is valid");

    NewPayslip {
        id: format!("PSL-{}-100", period::compact(&input.month_year)),
        net_salary: net_salary(&input.components),
        input,
    }
}

/// `PayslipStore` over a `Vec`, with the same uniqueness and ordering rules
/// as the MySQL table.
#[derive(Default)]
pub struct InMemoryPayslipStore {
    rows: Mutex<Vec<Payslip>>,
    unavailable: AtomicBool,
    pending_id_collisions: AtomicUsize,
}

impl InMemoryPayslipStore {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Every call fails like a lost connection while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// The next `n` creates fail as if the generated id were taken.
    pub fn fail_next_with_id_collision(&self, n: usize) {
        self.pending_id_collisions.store(n, Ordering::SeqCst);
    }

    fn check_available(&self) -> DbResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DbError::Other(anyhow!("connection refused")));
        }
        Ok(())
    }
}

fn stored_row(new: &NewPayslip) -> Payslip {
    let p = &new.input;
    let now = Utc::now();
    Payslip {
        id: new.id.clone(),
        employee_id: p.employee_id.clone(),
        employee_name: p.employee_name.clone(),
        employee_email: p.employee_email.clone(),
        month_year: p.month_year.clone(),
        period_start: p.period_start,
        designation: p.designation.to_string(),
        office_location: p.office_location.to_string(),
        employment_type: p.employment_type.to_string(),
        date_of_joining: p.date_of_joining,
        working_days: p.working_days,
        bank_name: p.bank_name.clone(),
        pan_no: p.pan_no.clone(),
        bank_account_no: p.bank_account_no.clone(),
        pf_no: p.pf_no.clone(),
        uan_no: p.uan_no.clone(),
        esic_no: p.esic_no.clone(),
        components: p
            .components
            .iter()
            .map(|(k, v)| (k.clone(), round_money(*v)))
            .collect(),
        net_salary: round_money(new.net_salary),
        status: DEFAULT_STATUS.to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn newest_first(rows: &mut [Payslip]) {
    rows.sort_by(|a, b| {
        b.period_start
            .cmp(&a.period_start)
            .then_with(|| a.employee_id.cmp(&b.employee_id))
    });
}

#[async_trait]
impl PayslipStore for InMemoryPayslipStore {
    async fn ping(&self) -> DbResult<()> {
        self.check_available()
    }

    async fn create(&self, new: &NewPayslip) -> DbResult<Payslip> {
        self.check_available()?;

        let pending = self.pending_id_collisions.load(Ordering::SeqCst);
        if pending > 0 {
            self.pending_id_collisions.store(pending - 1, Ordering::SeqCst);
            return Err(DbError::IdCollision);
        }

        // Natural key first, like the exists check in MySqlPayslipStore::create.
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| {
            r.employee_id == new.input.employee_id && r.month_year == new.input.month_year
        }) {
            return Err(DbError::DuplicatePayslip);
        }
        if rows.iter().any(|r| r.id == new.id) {
            return Err(DbError::IdCollision);
        }

        let row = stored_row(new);
        rows.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: &str) -> DbResult<Option<Payslip>> {
        self.check_available()?;
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self, filter: &HistoryFilter, page: Page) -> DbResult<(Vec<Payslip>, i64)> {
        self.check_available()?;

        let search = filter.search.as_ref().map(|s| s.to_lowercase());
        let mut matched: Vec<Payslip> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                search.as_ref().is_none_or(|s| {
                    r.employee_id.to_lowercase().contains(s)
                        || r.employee_name.to_lowercase().contains(s)
                })
            })
            .filter(|r| filter.month.is_none_or(|m| r.period_start.month() == m))
            .filter(|r| filter.year.is_none_or(|y| r.period_start.year() == y))
            .cloned()
            .collect();
        newest_first(&mut matched);

        let total = matched.len() as i64;
        let data = matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((data, total))
    }

    async fn find_for_employee(
        &self,
        employee_id: &str,
        employee_email: &str,
        range: &PeriodRange,
    ) -> DbResult<Option<Vec<Payslip>>> {
        self.check_available()?;

        let email = employee_email.to_lowercase();
        let rows = self.rows.lock().unwrap();
        if !rows
            .iter()
            .any(|r| r.employee_id == employee_id && r.employee_email == email)
        {
            return Ok(None);
        }

        let mut matched: Vec<Payslip> = rows
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .filter(|r| range.start.is_none_or(|s| r.period_start >= s))
            .filter(|r| range.end.is_none_or(|e| r.period_start <= e))
            .cloned()
            .collect();
        newest_first(&mut matched);
        Ok(Some(matched))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn natural_key_clash_wins_over_id_clash() {
        let store = InMemoryPayslipStore::default();
        store.create(&new_payslip("ATS0123", "March 2025")).await.unwrap();

        // Same id and same employee/period
        let again = new_payslip("ATS0123", "March 2025");
        assert!(matches!(store.create(&again).await, Err(DbError::DuplicatePayslip)));

        // Same id, different employee
        let other = new_payslip("ATS0124", "March 2025");
        assert!(matches!(store.create(&other).await, Err(DbError::IdCollision)));
        assert_eq!(store.len(), 1);
    }
}
