use appgen_core::envelope::EnvelopeError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Relay failures, each mapped to an HTTP status and an `{ "error": ... }` body.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("API key is required")]
    MissingApiKey,

    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Details are logged, never sent to the caller.
    #[error("Internal Server Error")]
    Internal(String),
}

#[derive(Debug, serde::Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<EnvelopeError> for Error {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::MissingApiKey => Self::MissingApiKey,
        }
    }
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingApiKey => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            log::error!("Relay error: {detail}");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
