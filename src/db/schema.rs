use anyhow::Context;
use sqlx::MySqlPool;
use tracing::{info, warn};

use crate::model::component::PAY_COMPONENTS;
use crate::model::payslip::DEFAULT_STATUS;

pub const TABLE: &str = "payslips";
pub const UNIQUE_EMPLOYEE_PERIOD: &str = "uq_payslips_employee_period";

/// `CREATE TABLE IF NOT EXISTS` for the payslip table.
///
/// `updated_at` is maintained by MySQL on every UPDATE.
pub fn create_table_sql() -> String {
    let component_columns: String = PAY_COMPONENTS
        .iter()
        .map(|c| format!("    {} DECIMAL(12,2) NOT NULL DEFAULT 0.00,\n", c.key))
        .collect();

    format!(
        r#"CREATE TABLE IF NOT EXISTS {TABLE} (
    id VARCHAR(32) NOT NULL,
    employee_id VARCHAR(7) NOT NULL,
    employee_name VARCHAR(100) NOT NULL,
    employee_email VARCHAR(255) NOT NULL,
    month_year VARCHAR(20) NOT NULL,
    period_start DATE NOT NULL,
    designation VARCHAR(64) NOT NULL,
    office_location VARCHAR(64) NOT NULL,
    employment_type VARCHAR(32) NOT NULL,
    date_of_joining DATE NOT NULL,
    working_days TINYINT UNSIGNED NOT NULL,
    bank_name VARCHAR(100) NOT NULL,
    pan_no CHAR(10) NOT NULL,
    bank_account_no VARCHAR(18) NOT NULL,
    pf_no VARCHAR(22) NOT NULL,
    uan_no CHAR(12) NOT NULL,
    esic_no VARCHAR(17) NOT NULL,
{component_columns}    net_salary DECIMAL(15,2) NOT NULL,
    status VARCHAR(20) NOT NULL DEFAULT '{DEFAULT_STATUS}',
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
    PRIMARY KEY (id),
    UNIQUE KEY {UNIQUE_EMPLOYEE_PERIOD} (employee_id, month_year),
    KEY idx_payslips_period_start (period_start)
)"#
    )
}

/// Makes sure the payslip table exists. With `reset`, drops it first.
pub async fn ensure_schema(pool: &MySqlPool, reset: bool) -> anyhow::Result<()> {
    if reset {
        warn!(table = TABLE, "Dropping table before recreating it");
        sqlx::query(&format!("DROP TABLE IF EXISTS {TABLE}"))
            .execute(pool)
            .await
            .context("Failed to drop payslip table")?;
    }

    sqlx::query(&create_table_sql())
        .execute(pool)
        .await
        .context("Failed to create payslip table")?;

    info!(table = TABLE, "Schema ready");
    Ok(())
}
