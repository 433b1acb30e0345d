//! Export side of the session: document generation, saving, download and
//! the email hand-off.

use super::FormSession;
use crate::client::{DocumentRenderer, SubmissionClient};
use crate::error::SessionError;
use crate::requests::{DocumentRequest, SaveSubmissionRequest};

/// Address the email draft is sent to.
pub const ORGANISATION_EMAIL: &str = "contact@hamburgkannadamitraru.com";

/// A render that was started. Hand `revision` back to
/// [`FormSession::finish_export`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExportJob {
    pub request: DocumentRequest,
    pub revision: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveJob {
    pub request: SaveSubmissionRequest,
    pub revision: u64,
}

/// Result of a `finish_*` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The record changed while the operation ran; its result was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDraft {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailDraft {
    /// `mailto:` link; `encode` percent-encodes a URI component.
    pub fn mailto_url(&self, encode: impl Fn(&str) -> String) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.to,
            encode(&self.subject),
            encode(&self.body)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupAction {
    Download,
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupOutcome {
    Download(DownloadArtifact),
    Email(EmailDraft),
}

impl FormSession {
    pub fn document(&self) -> Option<&[u8]> {
        self.export.document.as_deref()
    }

    pub fn hkf_id(&self) -> Option<&str> {
        self.export.hkf_id.as_deref()
    }

    /// Signature printed on the current export.
    pub fn printable_signature(&self) -> Option<&str> {
        self.export.printable_signature.as_deref()
    }

    pub fn is_saved(&self) -> bool {
        self.export.is_saved
    }

    pub fn has_downloaded(&self) -> bool {
        self.export.has_downloaded
    }

    pub fn is_processing(&self) -> bool {
        self.export.is_processing
    }

    pub fn is_saving_backend(&self) -> bool {
        self.export.is_saving_backend
    }

    pub fn is_busy(&self) -> bool {
        self.export.is_processing || self.export.is_saving_backend
    }

    pub fn popup_visible(&self) -> bool {
        self.export.show_popup
    }

    pub fn close_popup(&mut self) {
        self.export.show_popup = false;
    }

    /// Saved, and the identifier (if one came back) is printed in the
    /// current document.
    pub fn is_final(&self) -> bool {
        self.export.is_saved && !self.needs_reexport()
    }

    pub fn needs_save(&self) -> bool {
        !self.export.is_saved
    }

    pub fn needs_reexport(&self) -> bool {
        self.export.hkf_id.is_some() && self.export.document_hkf_id != self.export.hkf_id
    }

    pub fn email_enabled(&self) -> bool {
        self.export.has_downloaded
    }

    /// Starts document generation for the "Generate" action.
    ///
    /// Validates the whole record first; the error map is refreshed either
    /// way.
    pub fn begin_export(&mut self) -> Result<ExportJob, SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        if !self.validate_all() {
            return Err(SessionError::Validation);
        }
        let signature = self.signature.current()?.ok_or(SessionError::SignatureMissing)?;

        let export = &mut self.export;
        export.printable_signature = Some(signature);
        export.document = None;
        export.document_hkf_id = None;
        export.has_downloaded = false;
        export.show_popup = false;
        if !export.is_saved {
            export.hkf_id = None;
        }
        Ok(self.start_render())
    }

    /// Starts the render that prints a freshly assigned identifier.
    pub fn begin_reexport(&mut self) -> Result<ExportJob, SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        if self.export.printable_signature.is_none() {
            return Err(SessionError::NoDocument);
        }
        Ok(self.start_render())
    }

    fn start_render(&mut self) -> ExportJob {
        self.export.is_processing = true;
        ExportJob {
            request: DocumentRequest {
                form: self.form.clone(),
                signature_data_url: self.export.printable_signature.clone(),
                hkf_id: self.export.hkf_id.clone(),
            },
            revision: self.revision,
        }
    }

    /// Completes a render. A failure leaves no document behind.
    pub fn finish_export(
        &mut self,
        job: &ExportJob,
        result: Result<Vec<u8>, SessionError>,
    ) -> Result<Outcome, SessionError> {
        self.export.is_processing = false;
        if job.revision != self.revision {
            log::debug!("discarding render started at revision {}", job.revision);
            return Ok(Outcome::Stale);
        }
        let bytes = result.map_err(|e| match e {
            SessionError::Render(_) => e,
            other => SessionError::Render(other.to_string()),
        })?;
        self.export.document = Some(bytes);
        self.export.document_hkf_id = job.request.hkf_id.clone();
        self.export.show_popup = true;
        Ok(Outcome::Applied)
    }

    /// Starts persisting the exported record.
    pub fn begin_save(&mut self) -> Result<SaveJob, SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        if self.export.document.is_none() {
            return Err(SessionError::NoDocument);
        }
        self.export.is_saving_backend = true;
        Ok(SaveJob {
            request: SaveSubmissionRequest {
                form: self.form.normalized(),
                signature_data_url: self.export.printable_signature.clone(),
            },
            revision: self.revision,
        })
    }

    /// Completes a save. On failure nothing advances and the record stays
    /// as it was for a retry.
    pub fn finish_save(
        &mut self,
        job: &SaveJob,
        result: Result<Option<String>, SessionError>,
    ) -> Result<Outcome, SessionError> {
        self.export.is_saving_backend = false;
        if job.revision != self.revision {
            log::debug!("discarding save started at revision {}", job.revision);
            return Ok(Outcome::Stale);
        }
        let hkf_id = result?;
        self.export.is_saved = true;
        self.export.hkf_id = hkf_id.filter(|id| !id.is_empty());
        Ok(Outcome::Applied)
    }

    /// Hands out the current document for a local download.
    pub fn mark_downloaded(&mut self) -> Result<DownloadArtifact, SessionError> {
        let bytes = self.export.document.clone().ok_or(SessionError::NoDocument)?;
        self.export.has_downloaded = true;
        Ok(DownloadArtifact {
            file_name: format!(
                "HKF_Membership_{}.pdf",
                self.export.hkf_id.as_deref().unwrap_or("Application")
            ),
            bytes,
        })
    }

    /// Draft asking the organisation to receive the downloaded PDF. Nothing
    /// is sent or recorded by the session.
    pub fn email_draft(&self) -> Result<EmailDraft, SessionError> {
        if !self.export.has_downloaded {
            return Err(SessionError::NotDownloaded);
        }
        let name = format!("{} {}", self.form.first_name, self.form.last_name);
        Ok(EmailDraft {
            to: ORGANISATION_EMAIL.to_string(),
            subject: format!("Membership Application - {}", name),
            body: format!(
                "Dear HKF Team,\n\n>>> PLEASE ATTACH THE DOWNLOADED MEMBERSHIP FORM HERE <<<\n\n\
                 Please find attached my signed membership application form.\n\nRegards,\n{}",
                name
            ),
        })
    }

    /// Runs the "Generate" action to completion.
    pub async fn generate<R: DocumentRenderer>(&mut self, renderer: &R) -> Result<Outcome, SessionError> {
        let job = self.begin_export()?;
        let result = renderer.render(&job.request).await;
        self.finish_export(&job, result)
    }

    /// Runs one of the success popup actions to completion: save if needed,
    /// re-render with the assigned identifier, then download or draft the
    /// email.
    pub async fn popup_action<C, R>(
        &mut self,
        action: PopupAction,
        client: &C,
        renderer: &R,
    ) -> Result<PopupOutcome, SessionError>
    where
        C: SubmissionClient,
        R: DocumentRenderer,
    {
        if self.needs_save() {
            let job = self.begin_save()?;
            let result = client.save(&job.request).await;
            if self.finish_save(&job, result)? == Outcome::Stale {
                return Err(SessionError::NoDocument);
            }
        }
        if self.needs_reexport() {
            let job = self.begin_reexport()?;
            let result = renderer.render(&job.request).await;
            if self.finish_export(&job, result)? == Outcome::Stale {
                return Err(SessionError::NoDocument);
            }
        }
        match action {
            PopupAction::Download => self.mark_downloaded().map(PopupOutcome::Download),
            PopupAction::Email => self.email_draft().map(PopupOutcome::Email),
        }
    }
}
