use std::time::Instant;

use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::db::PayslipStore;

/// Process start time, registered as app data.
#[derive(Debug, Clone, Copy)]
pub struct StartedAt(pub Instant);

impl StartedAt {
    pub fn now() -> Self {
        Self(Instant::now())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` or `degraded`
    #[schema(example = "ok")]
    pub status: &'static str,
    /// Seconds since startup
    #[schema(example = 3600)]
    pub uptime: u64,
    /// Whether the database answered a ping
    #[schema(example = true)]
    pub database: bool,
}

/// Liveness and database reachability
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database are up", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health(
    store: web::Data<dyn PayslipStore>,
    started: web::Data<StartedAt>,
) -> HttpResponse {
    let uptime = started.0.elapsed().as_secs();

    match store.ping().await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            status: "ok",
            uptime,
            database: true,
        }),
        Err(e) => {
            warn!(error = %e, "Health check could not reach the database");
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "degraded",
                uptime,
                database: false,
            })
        }
    }
}
