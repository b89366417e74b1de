use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for locator operations.
pub type LocatorResult<T> = Result<T, LocatorError>;

/// The error type for all element-resolution operations.
///
/// Only usage errors are meant to reach callers of the locator. Everything
/// else is a resource error that the retry loops log and absorb.
#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("Unknown element kind '{kind}', expected 'image' or 'text'")]
    UnknownKind { kind: String },

    #[error("Invalid scale range [{min}, {max}): min must be positive and below max")]
    InvalidScaleRange { min: f64, max: f64 },

    #[error("Invalid argument: {description}")]
    InvalidArgument { description: String },

    #[error("Failed to load template {path:?}: {source}")]
    TemplateLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("OCR failed: {description}")]
    Ocr { description: String },
}

impl LocatorError {
    /// Check if this error is a programmer mistake rather than an environmental failure
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            LocatorError::UnknownKind { .. }
                | LocatorError::InvalidScaleRange { .. }
                | LocatorError::InvalidArgument { .. }
        )
    }

    /// Helper for OCR collaborators that report failures as plain strings
    pub fn ocr(description: impl Into<String>) -> Self {
        LocatorError::Ocr {
            description: description.into(),
        }
    }
}
