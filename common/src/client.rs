//! Collaborators the form session talks to.
//!
//! The browser client implements both over HTTP; tests use in-memory fakes.

use crate::error::SessionError;
use crate::model::submission::{Submission, SubmissionStatus};
use crate::requests::{DocumentRequest, SaveSubmissionRequest};

/// Submission Lifecycle Client.
///
/// `success=false` answers and transport failures are both reported as
/// [`SessionError::Persistence`].
#[allow(async_fn_in_trait)]
pub trait SubmissionClient {
    /// Persists a record. `Ok(None)` means saved without an identifier.
    async fn save(&self, request: &SaveSubmissionRequest) -> Result<Option<String>, SessionError>;

    async fn list(&self) -> Result<Vec<Submission>, SessionError>;

    async fn update(
        &self,
        id: i64,
        status: SubmissionStatus,
        comments: &str,
    ) -> Result<(), SessionError>;
}

/// Rasterizes and serializes a printable application into PDF bytes.
#[allow(async_fn_in_trait)]
pub trait DocumentRenderer {
    async fn render(&self, request: &DocumentRequest) -> Result<Vec<u8>, SessionError>;
}
