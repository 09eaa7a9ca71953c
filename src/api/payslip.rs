use actix_web::{HttpResponse, web};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};

use crate::config::Config;
use crate::db::{HistoryFilter, Page, PayslipStore, PeriodRange};
use crate::errors::{ApiError, DbError};
use crate::model::payslip::{NewPayslip, Payslip};
use crate::utils::validator::{ValidationRules, validate_payslip};
use crate::utils::{payslip_id, period, salary};

/// Attempts at finding a free payslip id before giving up.
const MAX_ID_ATTEMPTS: u32 = 5;

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 100;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}$").expect("valid year regex"));

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Case-insensitive match on employee id or name
    #[schema(example = "ravi")]
    pub search: Option<String>,

    /// Month number (1-12) or month name
    #[schema(example = "3")]
    pub month: Option<String>,

    #[schema(example = "2025")]
    pub year: Option<String>,

    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 10)]
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct EmployeePayslipQuery {
    #[schema(example = "ATS0123")]
    pub employee_id: Option<String>,

    #[schema(example = "ravi.kumar@example.com")]
    pub employee_email: Option<String>,

    /// `YYYY-MM` or `Month YYYY`, inclusive
    #[schema(example = "2025-01")]
    pub start_month: Option<String>,

    /// `YYYY-MM` or `Month YYYY`, inclusive
    #[schema(example = "March 2025")]
    pub end_month: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub total_pages: i64,
    pub current_page: u32,
    pub limit: u32,
}

impl Pagination {
    fn new(total: i64, page: Page) -> Self {
        let limit = i64::from(page.limit);
        Self {
            total,
            total_pages: (total + limit - 1) / limit,
            current_page: page.page,
            limit: page.limit,
        }
    }
}

#[derive(Serialize)]
pub struct PayslipHistoryResponse {
    pub data: Vec<Payslip>,
    pub pagination: Pagination,
}

#[derive(Serialize)]
pub struct EmployeePayslipsResponse {
    pub count: usize,
    pub data: Vec<Payslip>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Generate a payslip
#[utoipa::path(
    post,
    path = "/api/payslips",
    request_body(
        content = Object,
        description = "Payslip payload",
        content_type = "application/json",
        example = json!({
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
            "professional_tax": 200,
            "tds": 3000,
            "provident_fund": 1800
        })
    ),
    responses(
        (status = 201, description = "Payslip created", body = Object),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "message": "Validation failed",
            "errors": ["uan_no must be exactly 12 digits"]
        })),
        (status = 409, description = "Payslip already exists", body = Object, example = json!({
            "message": "Payslip already exists for ATS0123 in March 2025"
        })),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "message": "Internal server error"
        }))
    ),
    tag = "Payslip"
)]
#[instrument(name = "create_payslip", skip(store, config, payload))]
pub async fn create_payslip(
    store: web::Data<dyn PayslipStore>,
    config: web::Data<Config>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let rules = ValidationRules {
        strict_email_domains: config.strict_email_domains,
        today: Utc::now().date_naive(),
    };

    let input = validate_payslip(&payload, &rules).map_err(|errors| {
        info!(errors = errors.len(), "Payslip validation failed");
        ApiError::Validation(errors)
    })?;

    let net_salary = salary::net_salary(&input.components);
    let mut new = NewPayslip {
        id: payslip_id::generate(&input.month_year, &mut rand::thread_rng()),
        net_salary,
        input,
    };

    let mut attempt = 1;
    loop {
        match store.create(&new).await {
            Ok(stored) => {
                info!(
                    payslip_id = %stored.id,
                    employee_id = %stored.employee_id,
                    month_year = %stored.month_year,
                    "Payslip created"
                );
                return Ok(HttpResponse::Created().json(stored));
            }
            Err(DbError::IdCollision) if attempt < MAX_ID_ATTEMPTS => {
                warn!(payslip_id = %new.id, attempt, "Payslip id taken, regenerating");
                new.id = payslip_id::generate(&new.input.month_year, &mut rand::thread_rng());
                attempt += 1;
            }
            Err(DbError::DuplicatePayslip) => {
                info!(
                    employee_id = %new.input.employee_id,
                    month_year = %new.input.month_year,
                    "Duplicate payslip rejected"
                );
                return Err(ApiError::Duplicate(format!(
                    "Payslip already exists for {} in {}",
                    new.input.employee_id, new.input.month_year
                )));
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Get a payslip by id
#[utoipa::path(
    get,
    path = "/api/payslips/{payslip_id}",
    params(
        ("payslip_id" = String, Path, description = "Payslip id, e.g. PSL-MARCH2025-482")
    ),
    responses(
        (status = 200, description = "Payslip found", body = Object),
        (status = 404, description = "Payslip not found", body = Object, example = json!({
            "message": "Payslip not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payslip"
)]
#[instrument(name = "get_payslip", skip(store))]
pub async fn get_payslip(
    store: web::Data<dyn PayslipStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let payslip_id = path.into_inner();

    match store.find_by_id(&payslip_id).await? {
        Some(payslip) => Ok(HttpResponse::Ok().json(payslip)),
        None => {
            debug!("Payslip not found");
            Err(ApiError::NotFound("Payslip not found".into()))
        }
    }
}

/// Payslip history with search, month/year filters and pagination
#[utoipa::path(
    get,
    path = "/api/payslips/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Paginated payslips", body = Object, example = json!({
            "data": [],
            "pagination": { "total": 0, "totalPages": 0, "currentPage": 1, "limit": 10 }
        })),
        (status = 400, description = "Invalid filter"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payslip"
)]
#[instrument(name = "payslip_history", skip(store))]
pub async fn payslip_history(
    store: web::Data<dyn PayslipStore>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, ApiError> {
    let mut errors = Vec::new();

    let month = non_blank(&query.month).and_then(|m| {
        let parsed = period::parse_month_filter(m);
        if parsed.is_none() {
            errors.push("month must be a number from 1 to 12 or a month name".to_string());
        }
        parsed
    });

    let year = non_blank(&query.year).and_then(|y| {
        let parsed = YEAR_RE.is_match(y).then(|| y.parse::<i32>().ok()).flatten();
        if parsed.is_none() {
            errors.push("year must be a 4-digit year".to_string());
        }
        parsed
    });

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let filter = HistoryFilter {
        search: non_blank(&query.search).map(str::to_string),
        month,
        year,
    };
    let page = Page {
        page: query.page.unwrap_or(1).max(1),
        limit: query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
    };

    let (data, total) = store.list(&filter, page).await?;

    Ok(HttpResponse::Ok().json(PayslipHistoryResponse {
        data,
        pagination: Pagination::new(total, page),
    }))
}

/// Employee self-service: own payslips, optionally within a period range
#[utoipa::path(
    get,
    path = "/api/payslips",
    params(EmployeePayslipQuery),
    responses(
        (status = 200, description = "Employee payslips", body = Object, example = json!({
            "count": 0,
            "data": []
        })),
        (status = 400, description = "Missing or invalid parameters"),
        (status = 403, description = "Employee id and email do not match", body = Object, example = json!({
            "message": "No payslips found for the supplied employee credentials"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payslip"
)]
#[instrument(name = "employee_payslips", skip(store, query), fields(employee_id = ?query.employee_id))]
pub async fn employee_payslips(
    store: web::Data<dyn PayslipStore>,
    query: web::Query<EmployeePayslipQuery>,
) -> Result<HttpResponse, ApiError> {
    let mut errors = Vec::new();

    let employee_id = non_blank(&query.employee_id);
    if employee_id.is_none() {
        errors.push("employee_id is required".to_string());
    }
    let employee_email = non_blank(&query.employee_email);
    if employee_email.is_none() {
        errors.push("employee_email is required".to_string());
    }

    let mut bound = |field: &str, value: &Option<String>| {
        non_blank(value).and_then(|raw| {
            let parsed = period::parse_period_bound(raw);
            if parsed.is_none() {
                errors.push(format!("{field} must be YYYY-MM or a month and year like \"March 2025\""));
            }
            parsed.map(|p| p.start)
        })
    };
    let start = bound("start_month", &query.start_month);
    let end = bound("end_month", &query.end_month);

    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            errors.push("start_month cannot be after end_month".to_string());
        }
    }

    let (Some(employee_id), Some(employee_email)) = (employee_id, employee_email) else {
        return Err(ApiError::Validation(errors));
    };
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let range = PeriodRange { start, end };
    match store
        .find_for_employee(employee_id, employee_email, &range)
        .await?
    {
        Some(data) => Ok(HttpResponse::Ok().json(EmployeePayslipsResponse {
            count: data.len(),
            data,
        })),
        None => {
            info!("Employee id and email matched no payslip");
            Err(ApiError::Forbidden(
                "No payslips found for the supplied employee credentials".into(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes;
    use crate::test_utils::{InMemoryPayslipStore, test_config, valid_payload};
    use actix_web::{App, http::StatusCode, test as actix_test};
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;
    use std::sync::Arc;

    macro_rules! app {
        ($store:expr) => {
            actix_test::init_service(
                App::new()
                    .app_data(web::Data::from($store.clone() as Arc<dyn PayslipStore>))
                    .app_data(web::Data::new(test_config()))
                    .service(web::scope("/api").configure(routes::payslip_routes)),
            )
            .await
        };
    }

    fn payload_for(employee_id: &str, month_year: &str) -> Value {
        let mut payload = valid_payload();
        payload["employee_id"] = json!(employee_id);
        payload["month_year"] = json!(month_year);
        payload
    }

    #[actix_web::test]
    async fn creates_payslip_with_server_computed_net_salary() {
        let store = Arc::new(InMemoryPayslipStore::default());
        let app = app!(store);

        let mut payload = valid_payload();
        // Caller supplied net salary is ignored.
        payload["net_salary"] = json!(1);

        let req = actix_test::TestRequest::post()
            .uri("/api/payslips")
            .set_json(&payload)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = actix_test::read_body_json(resp).await;
        // 50000 + 20000 + 5000 + 1500.50 - (200 + 3000 + 1800 + 250.25)
        assert_eq!(body["net_salary"], "71250.25");
        assert_eq!(body["status"], "Generated");
        assert_eq!(body["month_year"], "March 2025");
        assert!(body["id"].as_str().unwrap().starts_with("PSL-MARCH2025-"));
        assert!(body.get("period_start").is_none());
        assert_eq!(store.len(), 1);
    }

    #[actix_web::test]
    async fn rejects_invalid_payload_without_persisting() {
        let store = Arc::new(InMemoryPayslipStore::default());
        let app = app!(store);

        let mut payload = valid_payload();
        payload["uan_no"] = json!("123");
        payload["working_days"] = json!(40);

        let req = actix_test::TestRequest::post()
            .uri("/api/payslips")
            .set_json(&payload)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["message"], "Validation failed");
        let errors: Vec<String> = serde_json::from_value(body["errors"].clone()).unwrap();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("working_days"));
        assert!(errors[1].starts_with("uan_no"));
        assert_eq!(store.len(), 0);
    }

    #[actix_web::test]
    async fn malformed_json_is_a_bad_request() {
        let store = Arc::new(InMemoryPayslipStore::default());
        let app = app!(store);

        let req = actix_test::TestRequest::post()
            .uri("/api/payslips")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(resp).await;
        assert!(body["message"].is_string());
    }

    #[actix_web::test]
    async fn second_create_for_same_employee_and_period_conflicts() {
        let store = Arc::new(InMemoryPayslipStore::default());
        let app = app!(store);

        let first = actix_test::TestRequest::post()
            .uri("/api/payslips")
            .set_json(payload_for("ATS0042", "March 2025"))
            .to_request();
        assert_eq!(actix_test::call_service(&app, first).await.status(), StatusCode::CREATED);

        // Same natural key, different spelling of the period.
        let second = actix_test::TestRequest::post()
            .uri("/api/payslips")
            .set_json(payload_for("ATS0042", "MARCH 2025"))
            .to_request();
        let resp = actix_test::call_service(&app, second).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["message"], "Payslip already exists for ATS0042 in March 2025");
        assert_eq!(store.len(), 1);
    }

    #[actix_web::test]
    async fn retries_when_generated_id_collides() {
        let store = Arc::new(InMemoryPayslipStore::default());
        store.fail_next_with_id_collision(2);
        let app = app!(store);

        let req = actix_test::TestRequest::post()
            .uri("/api/payslips")
            .set_json(valid_payload())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(store.len(), 1);
    }

    #[actix_web::test]
    async fn gives_up_after_repeated_id_collisions() {
        let store = Arc::new(InMemoryPayslipStore::default());
        store.fail_next_with_id_collision(MAX_ID_ATTEMPTS as usize);
        let app = app!(store);

        let req = actix_test::TestRequest::post()
            .uri("/api/payslips")
            .set_json(valid_payload())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.len(), 0);
    }

    #[actix_web::test]
    async fn store_failure_is_a_generic_500() {
        let store = Arc::new(InMemoryPayslipStore::default());
        store.set_unavailable(true);
        let app = app!(store);

        let req = actix_test::TestRequest::post()
            .uri("/api/payslips")
            .set_json(valid_payload())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body, json!({ "message": "Internal server error" }));
    }

    #[actix_web::test]
    async fn get_by_id_returns_stored_record_or_404() {
        let store = Arc::new(InMemoryPayslipStore::default());
        let app = app!(store);

        let req = actix_test::TestRequest::post()
            .uri("/api/payslips")
            .set_json(valid_payload())
            .to_request();
        let created: Value = actix_test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap();

        let req = actix_test::TestRequest::get()
            .uri(&format!("/api/payslips/{id}"))
            .to_request();
        let fetched: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched, created);

        let req = actix_test::TestRequest::get()
            .uri("/api/payslips/PSL-JANUARY1999-100")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["message"], "Payslip not found");
    }

    #[actix_web::test]
    async fn history_pages_in_period_then_employee_order() {
        let store = Arc::new(InMemoryPayslipStore::default());
        let app = app!(store);

        // 25 payslips: employees ATS0101..ATS0105 over January..May 2025
        for month in ["January", "February", "March", "April", "May"] {
            for n in 101..=105 {
                let req = actix_test::TestRequest::post()
                    .uri("/api/payslips")
                    .set_json(payload_for(&format!("ATS0{n}"), &format!("{month} 2025")))
                    .to_request();
                assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::CREATED);
            }
        }

        let req = actix_test::TestRequest::get()
            .uri("/api/payslips/history?page=2&limit=10")
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(
            body["pagination"],
            json!({ "total": 25, "totalPages": 3, "currentPage": 2, "limit": 10 })
        );
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 10);
        // Records 11-20: March (all 5) then February (all 5)
        assert_eq!(rows[0]["month_year"], "March 2025");
        assert_eq!(rows[0]["employee_id"], "ATS0101");
        assert_eq!(rows[4]["employee_id"], "ATS0105");
        assert_eq!(rows[5]["month_year"], "February 2025");
        assert_eq!(rows[9]["month_year"], "February 2025");
    }

    #[actix_web::test]
    async fn history_filters_by_search_month_and_year() {
        let store = Arc::new(InMemoryPayslipStore::default());
        let app = app!(store);

        for (id, name, period) in [
            ("ATS0201", "Ravi Kumar", "March 2025"),
            ("ATS0202", "Anita Rao", "March 2025"),
            ("ATS0201", "Ravi Kumar", "April 2025"),
            ("ATS0201", "Ravi Kumar", "March 2024"),
        ] {
            let mut payload = payload_for(id, period);
            payload["employee_name"] = json!(name);
            let req = actix_test::TestRequest::post()
                .uri("/api/payslips")
                .set_json(payload)
                .to_request();
            assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }

        let req = actix_test::TestRequest::get()
            .uri("/api/payslips/history?search=RAVI&month=march&year=2025")
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["pagination"]["total"], 1);
        assert_eq!(body["data"][0]["employee_id"], "ATS0201");
        assert_eq!(body["data"][0]["month_year"], "March 2025");

        let req = actix_test::TestRequest::get()
            .uri("/api/payslips/history?search=ats020&month=3")
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["pagination"]["total"], 3);
    }

    #[actix_web::test]
    async fn history_rejects_bad_filters() {
        let store = Arc::new(InMemoryPayslipStore::default());
        let app = app!(store);

        let req = actix_test::TestRequest::get()
            .uri("/api/payslips/history?month=13&year=25")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);

        // year=٢٠٢٥ (Arabic-Indic digits)
        let req = actix_test::TestRequest::get()
            .uri("/api/payslips/history?year=%D9%A2%D9%A0%D9%A2%D9%A5")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["errors"], json!(["year must be a 4-digit year"]));

        let req = actix_test::TestRequest::get()
            .uri("/api/payslips/history?page=abc")
            .to_request();
        assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn empty_history_has_zero_pages() {
        let store = Arc::new(InMemoryPayslipStore::default());
        let app = app!(store);

        let req = actix_test::TestRequest::get()
            .uri("/api/payslips/history")
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body["pagination"],
            json!({ "total": 0, "totalPages": 0, "currentPage": 1, "limit": 10 })
        );
    }

    #[actix_web::test]
    async fn self_service_requires_matching_id_and_email() {
        let store = Arc::new(InMemoryPayslipStore::default());
        let app = app!(store);

        for period in ["January 2025", "February 2025", "March 2025"] {
            let req = actix_test::TestRequest::post()
                .uri("/api/payslips")
                .set_json(payload_for("ATS0301", period))
                .to_request();
            assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }

        let req = actix_test::TestRequest::get()
            .uri("/api/payslips?employee_id=ATS0301&employee_email=someone.else@example.com")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = actix_test::read_body_json(resp).await;
        assert!(body.get("data").is_none());

        let req = actix_test::TestRequest::get()
            .uri("/api/payslips?employee_id=ATS0301&employee_email=RAVI.KUMAR@example.com&start_month=2025-02&end_month=March%202025")
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["data"][0]["month_year"], "March 2025");
        assert_eq!(body["data"][1]["month_year"], "February 2025");
    }

    #[actix_web::test]
    async fn self_service_validates_parameters() {
        let store = Arc::new(InMemoryPayslipStore::default());
        let app = app!(store);

        let req = actix_test::TestRequest::get().uri("/api/payslips").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(
            body["errors"],
            json!(["employee_id is required", "employee_email is required"])
        );

        let req = actix_test::TestRequest::get()
            .uri("/api/payslips?employee_id=ATS0301&employee_email=a@b.com&start_month=2025-05&end_month=2025-01")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["errors"], json!(["start_month cannot be after end_month"]));
    }

    #[test]
    fn pagination_rounds_pages_up() {
        let p = Pagination::new(21, Page { page: 3, limit: 10 });
        assert_eq!(p.total_pages, 3);
        let p = Pagination::new(20, Page { page: 1, limit: 10 });
        assert_eq!(p.total_pages, 2);
    }

    #[test]
    fn net_salary_in_fixture_matches_calculator() {
        let input = validate_payslip(
            &valid_payload(),
            &ValidationRules {
                strict_email_domains: false,
                today: Utc::now().date_naive(),
            },
        )
        .unwrap();
        assert_eq!(
            salary::net_salary(&input.components),
            Decimal::from_str("71250.25").unwrap()
        );
    }
}
