//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while giving every
//! failure, typed or not, the same JSON envelope. [`ResponseError`] for
//! [`Error`] only chooses a status; the body is rendered exclusively by
//! [`render_failure`], which the error translator middleware calls for every
//! response that carries an error.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode};
use crate::middleware::trace::TraceId;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Challenge advertised on every `401` response.
pub const BASIC_CHALLENGE: &str = r#"Basic realm="anime-api""#;

/// Developer message attached to typed record failures.
pub const STATUS_EXCEPTION: &str = "A ResponseStatusException Happened";

const UNAUTHORIZED_DEVELOPER_MESSAGE: &str = "Authentication is required to access this resource";
const FORBIDDEN_DEVELOPER_MESSAGE: &str = "Access to this resource is denied";
const INTERNAL_DEVELOPER_MESSAGE: &str = "An unexpected error occurred";
const FRAMEWORK_DEVELOPER_MESSAGE: &str = "A framework error occurred while handling the request";
const REDACTED_MESSAGE: &str = "Internal server error";
const RESOURCE_NOT_FOUND: &str = "Resource not found";

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn developer_message_for(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::NotFound => STATUS_EXCEPTION,
        ErrorCode::Unauthorized => UNAUTHORIZED_DEVELOPER_MESSAGE,
        ErrorCode::Forbidden => FORBIDDEN_DEVELOPER_MESSAGE,
        ErrorCode::InternalError => INTERNAL_DEVELOPER_MESSAGE,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        // Body is written by the error translator.
        HttpResponse::new(self.status_code())
    }
}

/// Uniform JSON error envelope.
///
/// ```json
/// {"timestamp":"2024-05-01T12:00:00Z","status":404,"error":"Not Found",
///  "message":"Anime not found",
///  "developerMessage":"A ResponseStatusException Happened",
///  "path":"/records/42","requestId":"…"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Moment the failure was rendered.
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
    /// Numeric HTTP status.
    #[schema(example = 404)]
    pub status: u16,
    /// Canonical reason phrase for `status`.
    #[schema(example = "Not Found")]
    pub error: String,
    /// Human-readable failure message.
    #[schema(example = "Anime not found")]
    pub message: String,
    /// Category-specific hint for API consumers.
    #[schema(example = "A ResponseStatusException Happened")]
    pub developer_message: String,
    /// Request path that failed.
    #[schema(example = "/records/42")]
    pub path: String,
    /// Trace identifier of the failed request, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Diagnostic trace lines, outermost first, present only when
    /// `trace=true` was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<Vec<String>>,
}

/// Normalised view of a failure, independent of where it was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    status: StatusCode,
    message: String,
    developer_message: &'static str,
    trace: Vec<String>,
}

impl Failure {
    /// Describe a typed domain failure.
    pub fn from_domain(error: &Error) -> Self {
        let status = status_for(error.code());
        let message = match error.code() {
            ErrorCode::InternalError => REDACTED_MESSAGE.to_owned(),
            _ => error.message().to_owned(),
        };
        let trace = std::iter::once(format!("{}: {}", error.code(), error.message()))
            .chain(error.causes().iter().map(|cause| format!("caused by: {cause}")))
            .collect();
        Self {
            status,
            message,
            developer_message: developer_message_for(error.code()),
            trace,
        }
    }

    /// Describe an untyped failure raised by the framework or a middleware.
    ///
    /// Client errors keep their status and message; anything else becomes a
    /// redacted `500`.
    pub fn from_untyped(status: StatusCode, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let trace = vec![format!("{}: {detail}", status.as_u16())];
        if status.is_client_error() {
            Self {
                status,
                message: detail,
                developer_message: FRAMEWORK_DEVELOPER_MESSAGE,
                trace,
            }
        } else {
            Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: REDACTED_MESSAGE.to_owned(),
                developer_message: INTERNAL_DEVELOPER_MESSAGE,
                trace,
            }
        }
    }

    /// Describe any `actix_web::Error`, recovering the domain error when the
    /// failure originated from one.
    pub fn from_actix(error: &actix_web::Error) -> Self {
        match error.as_error::<Error>() {
            Some(domain) => Self::from_domain(domain),
            None => Self::from_untyped(error.as_response_error().status_code(), error.to_string()),
        }
    }

    /// Status the failure renders with.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Client-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Diagnostic lines, outermost first. Never empty.
    pub fn trace(&self) -> &[String] {
        &self.trace
    }
}

/// Whether the raw query string asks for diagnostic traces with `trace=true`.
///
/// Any `trace` pair with the literal value `true` counts, so repeated keys
/// and unrelated parameters do not hide the flag.
pub fn trace_requested(query: &str) -> bool {
    form_urlencoded::parse(query.as_bytes()).any(|(key, value)| key == "trace" && value == "true")
}

/// Build the error envelope for `failure` raised on `path`.
///
/// `query` is the raw query string of the failed request.
pub fn error_body(path: &str, query: &str, failure: &Failure) -> ErrorBody {
    let stack_trace = trace_requested(query).then(|| failure.trace.clone());
    ErrorBody {
        timestamp: Utc::now(),
        status: failure.status.as_u16(),
        error: failure
            .status
            .canonical_reason()
            .unwrap_or("Unknown Status")
            .to_owned(),
        message: failure.message.clone(),
        developer_message: failure.developer_message.to_owned(),
        path: path.to_owned(),
        request_id: TraceId::current().map(|id| id.to_string()),
        stack_trace,
    }
}

/// Render `failure` as a JSON response, logging it on the way out.
pub fn render_failure(path: &str, query: &str, failure: &Failure) -> HttpResponse {
    let body = error_body(path, query, failure);
    if failure.status.is_server_error() {
        error!(
            status = body.status,
            path = %body.path,
            trace = %failure.trace.join(" | "),
            "request failed"
        );
    } else {
        debug!(status = body.status, path = %body.path, message = %body.message, "request rejected");
    }

    let mut builder = HttpResponse::build(failure.status);
    if failure.status == StatusCode::UNAUTHORIZED {
        builder.insert_header((header::WWW_AUTHENTICATE, BASIC_CHALLENGE));
    }
    builder.json(body)
}

/// Default service for paths no route matches.
pub async fn unmatched_route() -> ApiResult<HttpResponse> {
    Err(Error::not_found(RESOURCE_NOT_FOUND))
}

#[cfg(test)]
mod tests;
