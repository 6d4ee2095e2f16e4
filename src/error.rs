// Gateway error taxonomy
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::panic::Location;

use crate::context::RequestContext;

pub const USER_MESSAGE_NOT_AUTHENTICATED: &str = "Please sign in to continue.";
pub const USER_MESSAGE_NOT_AUTHORIZED: &str =
    "This account is not authorized to access the requested resource.";
pub const USER_MESSAGE_NOT_FOUND: &str = "The requested resource could not be found.";
pub const USER_MESSAGE_EXPIRED: &str = "This link or code has expired.";
pub const USER_MESSAGE_INTERNAL: &str =
    "Something went wrong on our end. Please try again in a moment.";

/// Classification carried by every gateway error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    Expired,
    Internal,
    NotAuthenticated,
    NotAuthorized,
    NotFound,
    NotSupported,
    Unknown,
}

impl ErrorKind {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::NotAuthenticated => 401,
            ErrorKind::NotAuthorized => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Expired => 410,
            ErrorKind::NotSupported => 422,
            ErrorKind::Internal | ErrorKind::Unknown => 500,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorKind::Expired => "EXPIRED",
            ErrorKind::Internal => "INTERNAL",
            ErrorKind::NotAuthenticated => "NOT_AUTHENTICATED",
            ErrorKind::NotAuthorized => "NOT_AUTHORIZED",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::NotSupported => "NOT_SUPPORTED",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }

    fn is_server_side(&self) -> bool {
        matches!(self, ErrorKind::Internal | ErrorKind::Unknown)
    }
}

/// Error surfaced to clients of the gateway.
///
/// Every error is stamped with the request id of the context it was created
/// under and carries the call sites it was created and traced through.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    developer_message: String,
    user_message: String,
    request_id: String,
    /// Query text of the request, when the context carries one
    query: Option<String>,
    trace: Vec<&'static Location<'static>>,
    source: Option<anyhow::Error>,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    #[track_caller]
    fn new(
        ctx: &RequestContext,
        kind: ErrorKind,
        developer_message: String,
        user_message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            developer_message,
            user_message: user_message.into(),
            request_id: ctx.request_id().to_string(),
            query: ctx.query().map(str::to_string),
            trace: vec![Location::caller()],
            source: None,
        }
    }

    #[track_caller]
    pub fn not_authenticated(ctx: &RequestContext) -> Self {
        Self::new(
            ctx,
            ErrorKind::NotAuthenticated,
            "no authenticated account on request".to_string(),
            USER_MESSAGE_NOT_AUTHENTICATED,
        )
    }

    #[track_caller]
    pub fn not_authorized(ctx: &RequestContext, resource_id: &str) -> Self {
        Self::new(
            ctx,
            ErrorKind::NotAuthorized,
            format!("not authorized to access {}", resource_id),
            USER_MESSAGE_NOT_AUTHORIZED,
        )
    }

    #[track_caller]
    pub fn not_found(ctx: &RequestContext, what: &str) -> Self {
        Self::new(
            ctx,
            ErrorKind::NotFound,
            format!("{} not found", what),
            USER_MESSAGE_NOT_FOUND,
        )
    }

    #[track_caller]
    pub fn expired(ctx: &RequestContext, what: &str) -> Self {
        Self::new(
            ctx,
            ErrorKind::Expired,
            format!("{} expired", what),
            USER_MESSAGE_EXPIRED,
        )
    }

    /// The user message is shown to the caller verbatim
    #[track_caller]
    pub fn not_supported(ctx: &RequestContext, user_message: impl Into<String>) -> Self {
        let user_message = user_message.into();
        Self::new(
            ctx,
            ErrorKind::NotSupported,
            format!("not supported: {}", user_message),
            user_message,
        )
    }

    /// Wrap an arbitrary failure as an internal error.
    ///
    /// Passing an error that is already a gateway `Error` returns it as is;
    /// the call is logged since it usually means a double wrap at the call site.
    #[track_caller]
    pub fn internal(ctx: &RequestContext, err: impl Into<anyhow::Error>) -> Self {
        match err.into().downcast::<Error>() {
            Ok(existing) => {
                tracing::warn!(
                    "Error::internal called with well-formed {} error at {}: {}",
                    existing.kind.error_code(),
                    Location::caller(),
                    existing.developer_message
                );
                existing
            }
            Err(err) => {
                let mut wrapped = Self::new(
                    ctx,
                    ErrorKind::Internal,
                    format!("{:#}", err),
                    USER_MESSAGE_INTERNAL,
                );
                wrapped.source = Some(err);
                wrapped
            }
        }
    }

    #[track_caller]
    pub fn internal_msg(ctx: &RequestContext, message: impl Into<String>) -> Self {
        Self::new(ctx, ErrorKind::Internal, message.into(), USER_MESSAGE_INTERNAL)
    }

    /// Record the caller as a frame in this error's trace
    #[track_caller]
    pub fn traced(mut self) -> Self {
        self.trace.push(Location::caller());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn developer_message(&self) -> &str {
        &self.developer_message
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn trace(&self) -> impl Iterator<Item = String> + '_ {
        self.trace
            .iter()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
    }

    /// Client-facing rendering. Production hides developer detail for
    /// server-side failures.
    pub fn format(&self, production: bool) -> FormattedError {
        let message = if production && self.kind.is_server_side() {
            self.user_message.clone()
        } else {
            self.developer_message.clone()
        };
        let trace = if production {
            Vec::new()
        } else {
            self.trace().collect()
        };

        FormattedError {
            code: self.kind.error_code(),
            message,
            user_message: self.user_message.clone(),
            request_id: self.request_id.clone(),
            query: if production { None } else { self.query.clone() },
            trace,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self, production: bool) -> Value {
        json!({
            "success": false,
            "error": self.format(production)
        })
    }
}

/// Classify any error. Errors that did not originate here are `Unknown`.
pub fn kind_of(err: &(dyn std::error::Error + 'static)) -> ErrorKind {
    match err.downcast_ref::<Error>() {
        Some(err) => err.kind,
        None => ErrorKind::Unknown,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FormattedError {
    pub code: &'static str,
    pub message: String,
    pub user_message: String,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<String>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.error_code(), self.developer_message)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|err| {
            let inner: &(dyn std::error::Error + 'static) = err.as_ref();
            inner
        })
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.kind.is_server_side() {
            tracing::error!(
                "Request {} failed: {} [{}] query={}",
                self.request_id,
                self,
                self.trace().collect::<Vec<_>>().join(" <- "),
                self.query.as_deref().unwrap_or("-")
            );
        } else {
            tracing::debug!("Request {} rejected: {}", self.request_id, self);
        }

        let status = StatusCode::from_u16(self.kind.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json(crate::is_production!()))).into_response()
    }
}
