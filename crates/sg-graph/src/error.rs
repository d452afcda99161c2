use thiserror::Error;

/// Errors that abort extraction. Everything else degrades to empty or
/// `Undefined` results.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid image format: {0}")]
    InvalidImageFormat(#[from] sg_core::Error),
}
