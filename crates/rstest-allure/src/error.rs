//! Error types surfaced by the reporter.
//!
//! Errors raised by step bodies are deliberately absent: a body's return value
//! (including any `Err`) is handed back to the caller unchanged, and panics are
//! resumed once the step has been closed. The variants below only cover
//! failures of the reporting layer itself.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur while recording report data.
///
/// # Examples
///
/// ```
/// use rstest_allure::ReportError;
///
/// let error = ReportError::NoActiveTest { operation: "tag" };
/// assert_eq!(error.to_string(), "`tag` requires an active test");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    /// No step, test, or fallback root is available to receive the call.
    ///
    /// This indicates a context constructed without a root executable.
    #[error("no active executable: install a root executable before reporting")]
    NoActiveExecutable,

    /// The operation needs a test context and none is active.
    #[error("`{operation}` requires an active test")]
    NoActiveTest {
        /// Name of the rejected operation.
        operation: &'static str,
    },

    /// The attachment store failed to persist content.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An invalid configuration value was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A value could not be serialized into a JSON attachment.
    #[cfg(feature = "json")]
    #[error("failed to serialize JSON attachment: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_active_executable_displays_message() {
        assert_eq!(
            ReportError::NoActiveExecutable.to_string(),
            "no active executable: install a root executable before reporting"
        );
    }

    #[test]
    fn invalid_config_displays_message() {
        let error = ReportError::InvalidConfig("blank issue URL".to_string());
        assert_eq!(error.to_string(), "invalid configuration: blank issue URL");
    }

    #[test]
    fn store_errors_display_transparently() {
        let io = std::io::Error::other("disk full");
        let error = ReportError::from(StoreError::new(io));
        assert_eq!(error.to_string(), "disk full");
    }
}
