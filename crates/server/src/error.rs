use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use promptdeck_common::PromptDeckError;
use promptdeck_compose::ComposeError;
use std::fmt;
use tracing::{error, warn};

use crate::types::ErrorResponse;

/// Error returned by route handlers, rendered as `{message, details}`
#[derive(Debug)]
pub struct ApiError {
    message: String,
    source: Option<PromptDeckError>,
    status: StatusCode,
}

impl ApiError {
    /// Wrap `source` under a route-specific summary such as "Failed to create template"
    pub fn new(message: impl Into<String>, source: impl Into<PromptDeckError>) -> Self {
        let source = source.into();
        let status =
            StatusCode::from_u16(source.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            message: message.into(),
            source: Some(source),
            status,
        }
    }

    /// Error with a message and no details
    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
            status,
        }
    }

    /// Wrap errors of a fallible step in a handler
    pub fn context<E: Into<PromptDeckError>>(message: &'static str) -> impl FnOnce(E) -> Self {
        move |e| Self::new(message, e)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {}", self.message, source),
            None => f.write_str(&self.message),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        if self.status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }

        HttpResponse::build(self.status).json(ErrorResponse {
            message: self.message.clone(),
            details: self.source.as_ref().map(|e| e.to_string()),
        })
    }
}

impl From<PromptDeckError> for ApiError {
    fn from(e: PromptDeckError) -> Self {
        Self::new("Request failed", e)
    }
}

impl From<ComposeError> for ApiError {
    fn from(e: ComposeError) -> Self {
        Self::new("Invalid request", PromptDeckError::invalid_input(e.to_string()))
    }
}
