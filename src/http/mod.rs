// ============================================================================
// HTTP Layer - Request Handlers
// ============================================================================
//
// Thin by design: bind and validate payloads, call the coordinator, map its
// tagged errors onto status codes. The one rule that matters here is that
// "nothing happened" failures (404/409/503) stay distinguishable from
// "partial, uncertain state" (500 with the inconsistent marker).
//
// ============================================================================

mod handlers;

pub use handlers::configure;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::domain::company::CompanyError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    InvalidId(String),

    #[error(transparent)]
    Domain(#[from] CompanyError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidId(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Domain(err) => match err {
                CompanyError::NotFound(_) => StatusCode::NOT_FOUND,
                CompanyError::AlreadyExists(_) => StatusCode::CONFLICT,
                // Clean failures: no partial effect remains, retry is safe.
                CompanyError::Store(_) | CompanyError::Publish(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                // Partial state; operators must prioritize these.
                CompanyError::Inconsistent { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = json!({ "error": self.to_string() });
        if let ApiError::Domain(CompanyError::Inconsistent { .. }) = self {
            body["inconsistent"] = json!(true);
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}
