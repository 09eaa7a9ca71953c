use crate::api::health::HealthResponse;
use crate::api::payslip::{EmployeePayslipQuery, HistoryQuery};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payslip Service API",
        version = "1.0.0",
        description = r#"
## Payslip Service

Generates, stores and serves monthly employee payslips.

### Features
- **Payslip generation**
  - Full payload validation with every failure reported at once
  - Net salary computed on the server from the declared pay components
- **Lookup**
  - Single payslip by id
  - Paginated history with search and month/year filters
- **Employee self-service**
  - An employee's own payslips, gated on employee id and email

### Response Format
- JSON throughout; money values are decimal strings with two places
- Errors carry a `message` and, for validation failures, an `errors` list
"#,
    ),
    paths(
        crate::api::payslip::create_payslip,
        crate::api::payslip::get_payslip,
        crate::api::payslip::payslip_history,
        crate::api::payslip::employee_payslips,

        crate::api::health::health
    ),
    components(
        schemas(
            HistoryQuery,
            EmployeePayslipQuery,
            HealthResponse
        )
    ),
    tags(
        (name = "Payslip", description = "Payslip generation and lookup APIs"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;
