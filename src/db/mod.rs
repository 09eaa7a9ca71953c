use std::time::Duration;

use anyhow::Context;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

use crate::config::Config;

pub mod payslips;
pub mod schema;
pub mod store;

pub use payslips::MySqlPayslipStore;
pub use store::{HistoryFilter, Page, PayslipStore, PeriodRange};

pub async fn init_db(config: &Config) -> anyhow::Result<MySqlPool> {
    MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}
