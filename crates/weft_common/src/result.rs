//! Common result and error types for the weft core.

/// The standard result type for fallible internal operations.
///
/// `Err` indicates an unrecoverable internal error (a bug in weft), not a
/// problem with the design being placed. User-facing failures — an
/// oversubscribed device, an unroutable net, an invalid primitive
/// configuration — are reported through the diagnostic sink and surface as
/// ordinary return values instead.
pub type WeftResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in weft, not a user input problem.
///
/// These should never occur during normal operation; one firing means there
/// is a logic error in the core that should be fixed.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let err = InternalError::new("mate table corrupted");
        assert_eq!(format!("{err}"), "internal error: mate table corrupted");
    }

    #[test]
    fn ok_and_err_paths() {
        let ok: WeftResult<u32> = Ok(7);
        assert_eq!(ok.ok(), Some(7));

        let err: WeftResult<u32> = Err(InternalError::new("boom"));
        assert_eq!(err.err().unwrap().message, "boom");
    }

    #[test]
    fn from_string() {
        let err: InternalError = "converted".to_string().into();
        assert_eq!(err.message, "converted");
    }
}
