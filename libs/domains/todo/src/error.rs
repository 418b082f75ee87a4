use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use axum_helpers::{API_VERSION_METADATA_KEY, AppError};
use thiserror::Error;
use tonic::metadata::MetadataValue;
use tonic::{Code, Status};

use crate::API_VERSION;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error(
        "unsupported API version: service implements API version '{supported}', but asked for '{requested}'"
    )]
    UnsupportedApiVersion {
        supported: &'static str,
        requested: String,
    },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("ToDo with ID='{0}' is not found")]
    NotFound(i64),

    #[error("{0}")]
    Unknown(String),

    #[error("failed to connect to database: {0}")]
    Unavailable(String),
}

pub type TodoResult<T> = Result<T, TodoError>;

impl TodoError {
    pub fn unsupported_api_version(requested: &str) -> Self {
        TodoError::UnsupportedApiVersion {
            supported: API_VERSION,
            requested: requested.to_string(),
        }
    }

    /// Read by id matched more than one row
    pub fn duplicate_rows(id: i64) -> Self {
        TodoError::Unknown(format!("found multiple rows in ToDo with ID='{id}'"))
    }

    /// A driver count that does not fit a signed 64-bit integer
    pub fn count_overflow(what: &str, count: u64) -> Self {
        TodoError::Unknown(format!("{what} count {count} does not fit int64"))
    }

    pub fn code(&self) -> Code {
        match self {
            TodoError::UnsupportedApiVersion { .. } => Code::Unimplemented,
            TodoError::InvalidArgument(_) => Code::InvalidArgument,
            TodoError::NotFound(_) => Code::NotFound,
            TodoError::Unknown(_) => Code::Unknown,
            TodoError::Unavailable(_) => Code::Unavailable,
        }
    }
}

/// Every status leaves the service tagged with the API version it speaks
impl From<TodoError> for Status {
    fn from(err: TodoError) -> Self {
        let mut status = Status::new(err.code(), err.to_string());
        status
            .metadata_mut()
            .insert(API_VERSION_METADATA_KEY, MetadataValue::from_static(API_VERSION));
        status
    }
}

impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        AppError::Rpc(err.into())
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

// Gateway decode failures are answered like any other invalid argument
impl From<JsonRejection> for TodoError {
    fn from(rejection: JsonRejection) -> Self {
        TodoError::InvalidArgument(rejection.body_text())
    }
}

impl From<PathRejection> for TodoError {
    fn from(rejection: PathRejection) -> Self {
        TodoError::InvalidArgument(rejection.body_text())
    }
}

impl From<QueryRejection> for TodoError {
    fn from(rejection: QueryRejection) -> Self {
        TodoError::InvalidArgument(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_version_message() {
        let err = TodoError::unsupported_api_version("v2");
        assert_eq!(
            err.to_string(),
            "unsupported API version: service implements API version 'v1', but asked for 'v2'"
        );
        assert_eq!(err.code(), Code::Unimplemented);
    }

    #[test]
    fn test_status_carries_api_version() {
        let status: Status = TodoError::NotFound(42).into();
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "ToDo with ID='42' is not found");
        assert_eq!(
            status.metadata().get(API_VERSION_METADATA_KEY).unwrap(),
            "v1"
        );
    }

    #[tokio::test]
    async fn test_rejection_response_carries_api_version() {
        let response = TodoError::InvalidArgument("Invalid URL".into()).into_response();
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["api"], "v1");
        assert_eq!(body["code"], 3);
        assert_eq!(body["error"], "INVALID_ARGUMENT");
        assert_eq!(body["message"], "Invalid URL");
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            TodoError::InvalidArgument("bad".into()).code(),
            Code::InvalidArgument
        );
        assert_eq!(TodoError::duplicate_rows(3).code(), Code::Unknown);
        assert_eq!(
            TodoError::duplicate_rows(3).to_string(),
            "found multiple rows in ToDo with ID='3'"
        );
        assert_eq!(
            TodoError::Unavailable("refused".into()).to_string(),
            "failed to connect to database: refused"
        );
    }
}
