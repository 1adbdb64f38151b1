//! Error types for the sprite-sheet pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while planning, compositing, or serializing a sheet
#[derive(Error, Debug)]
pub enum Error {
    /// Non-positive dimensions/counts or an empty frame set
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An image-editing primitive failed; carries the frame index and the
    /// backend operation that failed so a run can be diagnosed
    #[error("Backend operation '{operation}' failed for frame {frame}: {message}")]
    Backend {
        frame: usize,
        operation: &'static str,
        message: String,
    },

    /// A backend call failed while preparing the destination canvas, before
    /// any frame was composited
    #[error("Backend operation '{operation}' failed during sheet setup: {message}")]
    Setup {
        operation: &'static str,
        message: String,
    },
}

impl Error {
    /// Shorthand used by the compositor to wrap a backend failure with the
    /// frame index and operation name.
    pub fn backend(frame: usize, operation: &'static str, message: impl Into<String>) -> Self {
        Error::Backend {
            frame,
            operation,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_carries_context() {
        let err = Error::backend(7, "translate", "buffer gone");
        let msg = err.to_string();
        assert!(msg.contains("translate"));
        assert!(msg.contains("frame 7"));
        assert!(msg.contains("buffer gone"));
    }
}
