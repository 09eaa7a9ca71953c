use crate::{
    api::{health, payslip},
    config::Config,
    errors::ApiError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use tracing::{debug, warn};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build the API limiter
    fn build_limiter(requests_per_min: u32) -> Option<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            (60_000 / u64::from(requests_per_min)).max(1)
        };
        match GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min.max(1))
            .key_extractor(PeerIpKeyExtractor)
            .finish()
        {
            Some(cfg) => Some(Governor::new(&cfg)),
            None => {
                warn!(requests_per_min, "Invalid rate limit, API runs without a limiter");
                None
            }
        }
    }

    // Public, unthrottled
    cfg.route("/health", web::get().to(health::health));

    let api = web::scope(&config.api_prefix).configure(payslip_routes);
    match build_limiter(config.rate_api_per_min) {
        Some(limiter) => {
            debug!(per_min = config.rate_api_per_min, "API rate limiter enabled");
            cfg.service(api.wrap(limiter));
        }
        None => {
            cfg.service(api);
        }
    }
}

/// `/payslips` routes, mounted under the API prefix.
pub fn payslip_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payslips")
            .app_data(json_config())
            .app_data(query_config())
            // /payslips
            .service(
                web::resource("")
                    .route(web::post().to(payslip::create_payslip))
                    .route(web::get().to(payslip::employee_payslips)),
            )
            // /payslips/history (before /{id})
            .service(web::resource("/history").route(web::get().to(payslip::payslip_history)))
            // /payslips/{id}
            .service(web::resource("/{id}").route(web::get().to(payslip::get_payslip))),
    );
}

// Extractor failures get the same JSON error body as handler errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(format!("Invalid JSON body: {err}")).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::BadRequest(format!("Invalid query parameters: {err}")).into()
    })
}
