use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Key name MySQL reports for primary key clashes in `Duplicate entry ... for key ...`.
const PRIMARY_KEY_NAME: &str = "PRIMARY";

/// Store-level failures the handlers can act on.
#[derive(Debug, Error)]
pub enum DbError {
    /// (employee_id, month_year) already has a payslip
    #[error("payslip already exists for this employee and period")]
    DuplicatePayslip,

    /// Generated payslip id is already taken
    #[error("payslip id already in use")]
    IdCollision,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return if duplicate_key_name(db_err.message()) == Some(PRIMARY_KEY_NAME) {
                    DbError::IdCollision
                } else {
                    DbError::DuplicatePayslip
                };
            }
        }
        DbError::Other(anyhow::Error::from(err))
    }
}

/// Key named in a MySQL duplicate entry message, without the table prefix.
///
/// MySQL gives no constraint name, only the message:
/// `Duplicate entry 'PSL-MARCH2025-123' for key 'payslips.PRIMARY'`
/// (5.7 omits the `payslips.` prefix). The entry value may itself contain
/// quotes, so the key is read from the end.
fn duplicate_key_name(message: &str) -> Option<&str> {
    const MARKER: &str = " for key '";
    let start = message.rfind(MARKER)? + MARKER.len();
    let key = message[start..].strip_suffix('\'')?;
    Some(key.rsplit_once('.').map_or(key, |(_, name)| name))
}

pub type DbResult<T> = std::result::Result<T, DbError>;

/// Errors returned from HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("internal error: {0:#}")]
    Internal(anyhow::Error),
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::DuplicatePayslip => {
                ApiError::Duplicate("Payslip already exists for this employee and period".into())
            }
            DbError::IdCollision => ApiError::Internal(anyhow::anyhow!("payslip id already in use")),
            DbError::Other(e) => ApiError::Internal(e),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Duplicate(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Validation(errors) => json!({
                "message": self.to_string(),
                "errors": errors,
            }),
            ApiError::Internal(e) => {
                // Store text stays in the logs only.
                tracing::error!(error = %format!("{e:#}"), "Internal server error");
                json!({ "message": "Internal server error" })
            }
            _ => json!({ "message": self.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
