//! # Error handling
//!
//! Two layers:
//!
//! - [`PaginationError`] and [`ConfigError`] are what the library returns.
//!   Each variant names the stage that failed (binding, count, fetch,
//!   include loading, configuration).
//! - [`ApiError`] is the HTTP-facing type. It maps to a status code, logs
//!   internal details with `tracing`, and sends a sanitized
//!   `{ "code": ..., "message": ... }` body.
//!
//! Binding errors become `400 Bad Request` with their message. Everything
//! that happens against the database becomes `500` with a generic message;
//! the underlying `DbErr` is logged, never sent.
//!
//! ```rust,ignore
//! async fn list(
//!     State(db): State<DatabaseConnection>,
//!     request: PageRequest<AthleteFilter>,
//! ) -> Result<PaginatedResponse<Athlete>, ApiError> {
//!     let page = paginator.paginate(&db, &request).await?;
//!     Ok(page.into_response("athletes retrieved successfully"))
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failure while binding or executing a paginated query.
#[derive(Debug, Error)]
pub enum PaginationError {
    /// A request parameter does not fit the declared shape.
    #[error("invalid value for '{key}': {message}")]
    Bind { key: String, message: String },

    /// The link base built from the request (or configured origin) is not a URL.
    #[error("invalid base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("count query failed: {0}")]
    Count(#[source] DbErr),

    #[error("page query failed: {0}")]
    Fetch(#[source] DbErr),

    #[error("loading includes failed: {0}")]
    Include(#[source] DbErr),
}

impl PaginationError {
    pub fn bind(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Bind {
            key: key.into(),
            message: message.into(),
        }
    }

    /// True for errors caused by the client's input.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Bind { .. })
    }
}

/// Misconfiguration detected when a [`Paginator`](crate::Paginator) is built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("table name '{0}' is not a valid identifier")]
    InvalidTableName(String),

    #[error("search field '{0}' is not a valid identifier")]
    InvalidSearchField(String),

    #[error("sortable field '{0}' is not a valid identifier")]
    InvalidSortableField(String),

    #[error("include '{0}' is not a valid relation path")]
    InvalidInclude(String),

    #[error("default page size must be at least 1")]
    ZeroPageSize,

    #[error("default page number must be at least 1")]
    ZeroPageNumber,

    #[error("max page size {max} is below the default page size {default}")]
    MaxBelowDefault { max: u64, default: u64 },

    #[error("page size and page number keys must be non-empty and distinct")]
    InvalidPageKeys,
}

/// HTTP error returned by list handlers.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - malformed query parameters
    BadRequest {
        /// User-facing error message
        message: String,
    },

    /// 500 Internal Server Error - database failure (details logged, not exposed)
    Database {
        /// User-facing generic message
        message: String,
        /// Which stage failed
        stage: &'static str,
        /// Internal error (logged, not sent to user)
        internal: DbErr,
    },

    /// 500 Internal Server Error - anything else
    Internal {
        /// User-facing generic message
        message: String,
        /// Internal error details (logged, not sent to user)
        internal: Option<String>,
    },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn database(stage: &'static str, err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            stage,
            internal: err,
        }
    }

    pub fn internal(message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Internal {
            message: message.into(),
            internal,
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The sanitized message sent to the client.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::BadRequest { message }
            | Self::Database { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database {
                stage, internal, ..
            } => {
                tracing::error!(stage, error = ?internal, "Database error occurred");
            }
            Self::Internal {
                internal: Some(details),
                ..
            } => {
                tracing::error!(details = %details, "Internal error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Error body, same outer shape as a successful list response minus `data`/`pagination`.
#[derive(Serialize)]
struct ErrorResponse<'a> {
    code: u16,
    message: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let body = ErrorResponse {
            code: status.as_u16(),
            message: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        match err {
            PaginationError::Bind { .. } => Self::bad_request(err.to_string()),
            PaginationError::InvalidBaseUrl { .. } => Self::bad_request("Invalid request URL"),
            PaginationError::Count(db) => Self::database("count", db),
            PaginationError::Fetch(db) => Self::database("fetch", db),
            PaginationError::Include(db) => Self::database("includes", db),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        Self::internal("Internal server error", Some(err.to_string()))
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self::database("query", err)
    }
}
