use std::iter;

use anyhow::anyhow;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use sqlx::{Executor, MySql, MySqlPool};
use tracing::debug;

use crate::db::schema::TABLE;
use crate::db::store::{HistoryFilter, Page, PayslipStore, PeriodRange};
use crate::errors::{DbError, DbResult};
use crate::model::component::PAY_COMPONENTS;
use crate::model::payslip::{DEFAULT_STATUS, NewPayslip, Payslip};
use crate::utils::db_utils::{Conditions, SqlValue, like_contains, to_arguments};
use crate::utils::salary::round_money;

const FIXED_COLUMNS: [&str; 17] = [
    "id",
    "employee_id",
    "employee_name",
    "employee_email",
    "month_year",
    "period_start",
    "designation",
    "office_location",
    "employment_type",
    "date_of_joining",
    "working_days",
    "bank_name",
    "pan_no",
    "bank_account_no",
    "pf_no",
    "uan_no",
    "esic_no",
];

static INSERT_SQL: Lazy<String> = Lazy::new(|| {
    let columns: Vec<&str> = FIXED_COLUMNS
        .iter()
        .copied()
        .chain(PAY_COMPONENTS.iter().map(|c| c.key))
        .chain(["net_salary", "status"])
        .collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {TABLE} ({}) VALUES ({})",
        columns.join(", "),
        placeholders
    )
});

/// Values for [`INSERT_SQL`], in column order. Money is rounded here.
fn insert_values(new: &NewPayslip) -> Vec<SqlValue> {
    let p = &new.input;
    let mut values = vec![
        SqlValue::String(new.id.clone()),
        SqlValue::String(p.employee_id.clone()),
        SqlValue::String(p.employee_name.clone()),
        SqlValue::String(p.employee_email.clone()),
        SqlValue::String(p.month_year.clone()),
        SqlValue::Date(p.period_start),
        SqlValue::String(p.designation.to_string()),
        SqlValue::String(p.office_location.to_string()),
        SqlValue::String(p.employment_type.to_string()),
        SqlValue::Date(p.date_of_joining),
        SqlValue::U8(p.working_days),
        SqlValue::String(p.bank_name.clone()),
        SqlValue::String(p.pan_no.clone()),
        SqlValue::String(p.bank_account_no.clone()),
        SqlValue::String(p.pf_no.clone()),
        SqlValue::String(p.uan_no.clone()),
        SqlValue::String(p.esic_no.clone()),
    ];
    for component in PAY_COMPONENTS {
        let amount = p.components.get(component.key).copied().unwrap_or_default();
        values.push(SqlValue::Decimal(round_money(amount)));
    }
    values.push(SqlValue::Decimal(round_money(new.net_salary)));
    values.push(SqlValue::String(DEFAULT_STATUS.to_string()));
    values
}

fn history_conditions(filter: &HistoryFilter) -> Conditions {
    let mut c = Conditions::new();
    if let Some(search) = &filter.search {
        let like = like_contains(&search.to_lowercase());
        c.push(
            "(LOWER(employee_id) LIKE ? OR LOWER(employee_name) LIKE ?)",
            [SqlValue::String(like.clone()), SqlValue::String(like)],
        );
    }
    if let Some(month) = filter.month {
        c.push("MONTH(period_start) = ?", [SqlValue::I64(i64::from(month))]);
    }
    if let Some(year) = filter.year {
        c.push("YEAR(period_start) = ?", [SqlValue::I64(i64::from(year))]);
    }
    c
}

fn employee_conditions(employee_id: &str, range: &PeriodRange) -> Conditions {
    let mut c = Conditions::new();
    c.push("employee_id = ?", [SqlValue::String(employee_id.to_string())]);
    if let Some(start) = range.start {
        c.push("period_start >= ?", [SqlValue::Date(start)]);
    }
    if let Some(end) = range.end {
        c.push("period_start <= ?", [SqlValue::Date(end)]);
    }
    c
}

pub struct MySqlPayslipStore {
    pool: MySqlPool,
}

impl MySqlPayslipStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// True when a payslip for this employee and period is already stored.
    pub async fn exists<'e, E>(executor: E, employee_id: &str, month_year: &str) -> DbResult<bool>
    where
        E: Executor<'e, Database = MySql>,
    {
        let found: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM payslips WHERE employee_id = ? AND month_year = ?)",
        )
        .bind(employee_id)
        .bind(month_year)
        .fetch_one(executor)
        .await?;

        Ok(found != 0)
    }

    /// Plain insert; a unique key violation surfaces as a [`DbError`] variant.
    pub async fn insert<'e, E>(executor: E, new: &NewPayslip) -> DbResult<()>
    where
        E: Executor<'e, Database = MySql>,
    {
        sqlx::query_with(INSERT_SQL.as_str(), to_arguments(insert_values(new)))
            .execute(executor)
            .await?;
        Ok(())
    }

    async fn fetch_by_id<'e, E>(executor: E, id: &str) -> DbResult<Option<Payslip>>
    where
        E: Executor<'e, Database = MySql>,
    {
        let payslip = sqlx::query_as::<_, Payslip>("SELECT * FROM payslips WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(payslip)
    }
}

#[async_trait]
impl PayslipStore for MySqlPayslipStore {
    async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create(&self, new: &NewPayslip) -> DbResult<Payslip> {
        // Rolled back on drop if anything below returns early.
        let mut tx = self.pool.begin().await?;

        if Self::exists(&mut *tx, &new.input.employee_id, &new.input.month_year).await? {
            return Err(DbError::DuplicatePayslip);
        }

        Self::insert(&mut *tx, new).await?;

        let stored = Self::fetch_by_id(&mut *tx, &new.id)
            .await?
            .ok_or_else(|| DbError::Other(anyhow!("payslip {} missing after insert", new.id)))?;

        tx.commit().await?;
        Ok(stored)
    }

    async fn find_by_id(&self, id: &str) -> DbResult<Option<Payslip>> {
        Self::fetch_by_id(&self.pool, id).await
    }

    async fn list(&self, filter: &HistoryFilter, page: Page) -> DbResult<(Vec<Payslip>, i64)> {
        let conditions = history_conditions(filter);
        let where_clause = conditions.where_clause();

        let mut conn = self.pool.acquire().await?;

        let count_sql = format!("SELECT COUNT(*) FROM {TABLE} {where_clause}");
        debug!(sql = %count_sql, bindings = ?conditions.values(), "Counting payslips");

        let total: i64 =
            sqlx::query_scalar_with::<MySql, i64, _>(&count_sql, conditions.arguments(iter::empty()))
                .fetch_one(&mut *conn)
                .await?;

        let data_sql = format!(
            "SELECT * FROM {TABLE} {where_clause} \
             ORDER BY period_start DESC, employee_id ASC LIMIT ? OFFSET ?"
        );
        debug!(sql = %data_sql, page = page.page, limit = page.limit, "Fetching payslips");

        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
        let rows = sqlx::query_as_with::<MySql, Payslip, _>(
            &data_sql,
            conditions.arguments([SqlValue::I64(i64::from(page.limit)), SqlValue::I64(offset)]),
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok((rows, total))
    }

    async fn find_for_employee(
        &self,
        employee_id: &str,
        employee_email: &str,
        range: &PeriodRange,
    ) -> DbResult<Option<Vec<Payslip>>> {
        let mut conn = self.pool.acquire().await?;

        let matched: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM payslips WHERE employee_id = ? AND employee_email = ?)",
        )
        .bind(employee_id)
        .bind(employee_email.to_lowercase())
        .fetch_one(&mut *conn)
        .await?;

        if matched == 0 {
            return Ok(None);
        }

        let conditions = employee_conditions(employee_id, range);
        let sql = format!(
            "SELECT * FROM {TABLE} {} ORDER BY period_start DESC",
            conditions.where_clause()
        );
        debug!(sql = %sql, bindings = ?conditions.values(), "Fetching employee payslips");

        let rows = sqlx::query_as_with::<MySql, Payslip, _>(&sql, conditions.arguments(iter::empty()))
            .fetch_all(&mut *conn)
            .await?;

        Ok(Some(rows))
    }
}
