use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, Row, mysql::MySqlRow};

use crate::model::component::PAY_COMPONENTS;
use crate::model::employee::{Designation, EmploymentType, OfficeLocation};

pub const DEFAULT_STATUS: &str = "Generated";

/// Payslip data that passed validation. Amounts are not rounded yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PayslipInput {
    pub employee_id: String,
    pub employee_name: String,
    pub employee_email: String,
    pub month_year: String,
    pub period_start: NaiveDate,
    pub designation: Designation,
    pub office_location: OfficeLocation,
    pub employment_type: EmploymentType,
    pub date_of_joining: NaiveDate,
    pub working_days: u8,
    pub bank_name: String,
    pub pan_no: String,
    pub bank_account_no: String,
    pub pf_no: String,
    pub uan_no: String,
    pub esic_no: String,
    /// Every declared component, zero when omitted
    pub components: BTreeMap<String, Decimal>,
}

/// A payslip ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewPayslip {
    pub id: String,
    pub net_salary: Decimal,
    pub input: PayslipInput,
}

/// A stored payslip row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Payslip {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub employee_email: String,
    pub month_year: String,
    #[serde(skip_serializing)]
    pub period_start: NaiveDate,
    pub designation: String,
    pub office_location: String,
    pub employment_type: String,
    pub date_of_joining: NaiveDate,
    pub working_days: u8,
    pub bank_name: String,
    pub pan_no: String,
    pub bank_account_no: String,
    pub pf_no: String,
    pub uan_no: String,
    pub esic_no: String,
    #[serde(flatten)]
    pub components: BTreeMap<String, Decimal>,
    pub net_salary: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, MySqlRow> for Payslip {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        let mut components = BTreeMap::new();
        for component in PAY_COMPONENTS {
            components.insert(
                component.key.to_string(),
                row.try_get::<Decimal, _>(component.key)?,
            );
        }

        Ok(Self {
            id: row.try_get("id")?,
            employee_id: row.try_get("employee_id")?,
            employee_name: row.try_get("employee_name")?,
            employee_email: row.try_get("employee_email")?,
            month_year: row.try_get("month_year")?,
            period_start: row.try_get("period_start")?,
            designation: row.try_get("designation")?,
            office_location: row.try_get("office_location")?,
            employment_type: row.try_get("employment_type")?,
            date_of_joining: row.try_get("date_of_joining")?,
            working_days: row.try_get("working_days")?,
            bank_name: row.try_get("bank_name")?,
            pan_no: row.try_get("pan_no")?,
            bank_account_no: row.try_get("bank_account_no")?,
            pf_no: row.try_get("pf_no")?,
            uan_no: row.try_get("uan_no")?,
            esic_no: row.try_get("esic_no")?,
            components,
            net_salary: row.try_get("net_salary")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
