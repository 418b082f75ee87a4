pub mod codes;
pub mod handlers;

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tonic::Code;

/// Metadata key carrying the API version a status was produced under
pub const API_VERSION_METADATA_KEY: &str = "x-api-version";

/// JSON body of every gateway error.
///
/// ```json
/// {
///   "api": "v1",
///   "code": 5,
///   "error": "NOT_FOUND",
///   "message": "ToDo with ID='42' is not found"
/// }
/// ```
///
/// `code` is the numeric gRPC code so clients can branch on the same value
/// regardless of transport. `api` is absent when the request never reached
/// a versioned route (e.g. an unknown path).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,
    pub code: i32,
    pub error: String,
    pub message: String,
}

/// Gateway error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    /// A status returned by the RPC service, forwarded as-is
    #[error("{}", .0.message())]
    Rpc(#[from] tonic::Status),

    #[error("Not Found: {0}")]
    NotFound(String),
}

impl AppError {
    /// gRPC code this error is reported under
    pub fn code(&self) -> Code {
        match self {
            AppError::Rpc(status) => status.code(),
            AppError::NotFound(_) => Code::NotFound,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Rpc(status) => status.message().to_string(),
            AppError::NotFound(msg) => msg.clone(),
        }
    }

    fn api_version(&self) -> Option<String> {
        match self {
            AppError::Rpc(status) => status
                .metadata()
                .get(API_VERSION_METADATA_KEY)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            AppError::NotFound(_) => None,
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        let code = self.code();
        ErrorResponse {
            api: self.api_version(),
            code: code as i32,
            error: codes::code_name(code).to_string(),
            message: self.message(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = self.to_error_response();
        let status = codes::http_status(self.code());

        if status.is_server_error() {
            tracing::error!(
                grpc_code = body.code,
                http_status = status.as_u16(),
                "Request failed: {}",
                body.message
            );
        } else {
            tracing::info!(
                grpc_code = body.code,
                http_status = status.as_u16(),
                "Request rejected: {}",
                body.message
            );
        }

        (status, Json(body)).into_response()
    }
}
