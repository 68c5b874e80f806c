use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Model call failed: {0}")]
    ModelCallFailed(String),

    #[error("No structured data found in model output")]
    NoStructuredDataFound,

    #[error("Malformed structured data: {0}")]
    MalformedStructuredData(String),

    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Record not found")]
    RecordNotFound,

    #[error("Payment link failed: {0}")]
    PaymentLinkFailed(String),

    #[error("Invalid URL")]
    InvalidUrl,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Stable machine-readable kind, used as the `error` field of responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::FetchFailed(_) => "fetch_failed",
            ApiError::ModelCallFailed(_) => "model_call_failed",
            ApiError::NoStructuredDataFound => "no_structured_data_found",
            ApiError::MalformedStructuredData(_) => "malformed_structured_data",
            ApiError::MissingRequiredField(_) => "missing_required_field",
            ApiError::RecordNotFound => "record_not_found",
            ApiError::PaymentLinkFailed(_) => "payment_link_failed",
            ApiError::InvalidUrl => "invalid_url",
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::Internal(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::FetchFailed(_)
            | ApiError::ModelCallFailed(_)
            | ApiError::PaymentLinkFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::NoStructuredDataFound
            | ApiError::MalformedStructuredData(_)
            | ApiError::MissingRequiredField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::RecordNotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidUrl | ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // store errors carry connection details, keep them in the logs only
        let details = match &self {
            ApiError::Internal(detail) => {
                tracing::error!("internal error: {}", detail);
                "Internal error".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": self.kind(), "details": details }))).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
