//! Tour error types
//!
//! Errors raised while storing, building or looking up tours. The HTTP
//! handlers return `TourError` directly; the `IntoResponse` impl maps each
//! variant to a status code and a small `{ "error": ... }` JSON body.
//!
//! # Examples
//!
//! ```rust
//! use panotour::errors::TourError;
//!
//! let err = TourError::NotFound("0b6f4d5e".to_string());
//! assert!(err.is_not_found());
//! assert_eq!(err.error_code(), "NOT_FOUND");
//! ```

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Tour-related errors
#[derive(Error, Debug)]
pub enum TourError {
    /// No tour document exists for the identifier
    #[error("Tour {0} not found")]
    NotFound(String),

    /// A stored tour document could not be parsed or breaks the node invariants
    #[error("Tour {tour_id} is corrupt: {reason}")]
    CorruptTour {
        /// Identifier of the tour being read
        tour_id: String,
        /// What was wrong with the stored document
        reason: String,
    },

    /// Node sequence does not have the shape produced by the builder
    #[error("Invalid tour: {0}")]
    InvalidTour(String),

    /// More files than a single tour may hold
    #[error("Too many files: at most {max} images per tour")]
    TooManyFiles {
        /// Upper bound on files per upload
        max: usize,
    },

    /// Upload request carried no image files
    #[error("No images uploaded")]
    NoImages,

    /// Multipart body could not be read, or exceeded the body limit
    #[error("Malformed upload: {message}")]
    Multipart {
        /// Status reported by the multipart extractor
        status: StatusCode,
        /// Extractor's description of the failure
        message: String,
    },

    /// Filesystem operation failed
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TourError {
    /// Check if this is a client error (400-series)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TourError::TooManyFiles { .. } | TourError::NoImages | TourError::Multipart { .. }
        )
    }

    /// Check if this is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, TourError::NotFound(_))
    }

    /// Get error code for API responses and logs
    pub fn error_code(&self) -> &'static str {
        match self {
            TourError::NotFound(_) => "NOT_FOUND",
            TourError::CorruptTour { .. } | TourError::InvalidTour(_) => "CORRUPT_TOUR",
            TourError::TooManyFiles { .. } => "TOO_MANY_FILES",
            TourError::NoImages => "NO_IMAGES",
            TourError::Multipart { status, .. } if *status == StatusCode::PAYLOAD_TOO_LARGE => {
                "PAYLOAD_TOO_LARGE"
            }
            TourError::Multipart { .. } => "BAD_MULTIPART",
            TourError::Io(_) => "STORAGE_ERROR",
            TourError::Json(_) => "SERIALIZATION_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        if let TourError::Multipart { status, .. } = self {
            *status
        } else if self.is_not_found() {
            StatusCode::NOT_FOUND
        } else if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Message sent to the client. Server faults do not leak internals.
    fn public_message(&self) -> String {
        match self {
            TourError::NotFound(_) => "Tour not found".to_string(),
            TourError::CorruptTour { .. } | TourError::InvalidTour(_) => {
                "Tour data is corrupt".to_string()
            }
            TourError::Io(_) | TourError::Json(_) => "Internal server error".to_string(),
            TourError::Multipart { status, .. } if *status == StatusCode::PAYLOAD_TOO_LARGE => {
                "Upload exceeds the maximum request size".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<MultipartError> for TourError {
    fn from(err: MultipartError) -> Self {
        TourError::Multipart {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl IntoResponse for TourError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.error_code(), "{}", self);
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
