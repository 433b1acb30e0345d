use thiserror::Error;

use crate::model::membership::FieldId;

/// Failure of a single user action on a form session.
///
/// The `Display` text is the notice shown to the user. None of these leave the
/// session unusable; the action can simply be repeated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Please correct the errors highlighted.")]
    Validation,

    #[error("Please provide a signature.")]
    SignatureMissing,

    #[error("Could not generate PDF: {0}")]
    Render(String),

    #[error("{0}")]
    Persistence(String),

    #[error("Please upload a valid image file.")]
    UploadRejected,

    #[error("Another operation is still in progress.")]
    Busy,

    #[error("No generated document is available.")]
    NoDocument,

    #[error("Please download the PDF before sending the email.")]
    NotDownloaded,

    #[error("Unknown value '{value}' for field {field}")]
    UnknownOption { field: FieldId, value: String },

    #[error("Could not encode the signature: {0}")]
    Encoding(String),
}

impl SessionError {
    /// Generic notice for a persistence failure that carried no server message.
    pub const CONNECTION_FAILED: &'static str = "Failed to connect to server.";

    pub fn persistence(message: Option<String>) -> Self {
        SessionError::Persistence(
            message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| Self::CONNECTION_FAILED.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_falls_back_to_generic_notice() {
        assert_eq!(
            SessionError::persistence(None).to_string(),
            "Failed to connect to server."
        );
        assert_eq!(
            SessionError::persistence(Some("  ".into())).to_string(),
            "Failed to connect to server."
        );
        assert_eq!(
            SessionError::persistence(Some("Database locked".into())).to_string(),
            "Database locked"
        );
    }
}
