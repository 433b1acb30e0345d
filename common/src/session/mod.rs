//! Form State Controller.
//!
//! A [`FormSession`] owns one application while it is being filled in: the
//! record, the inline error map, the signature pad and the export state. All
//! mutations go through methods here so that every edit can invalidate the
//! results of earlier exports.
//!
//! Asynchronous work (rendering, saving) is split into `begin_*` / `finish_*`
//! pairs, so a UI can drop its borrow of the session while the request is in
//! flight. Each `begin_*` records the session revision; a `finish_*` whose
//! revision no longer matches is discarded.

mod export;

pub use export::{
    DownloadArtifact, EmailDraft, ExportJob, Outcome, PopupAction, PopupOutcome, SaveJob,
    ORGANISATION_EMAIL,
};

use chrono::NaiveDate;

use crate::error::SessionError;
use crate::model::membership::{FieldId, MembershipForm};
use crate::rules;
use crate::signature::{Point, SignatureMode, SignaturePad};
use crate::validation::{self, FieldErrors};

/// Where the session stands in the export lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing,
    ReadyToExport,
    ExportedUnsaved,
    Saved,
    Downloaded,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct ExportState {
    document: Option<Vec<u8>>,
    /// Identifier printed inside `document`, if any.
    document_hkf_id: Option<String>,
    /// Signature captured when the export started; also sent on save.
    printable_signature: Option<String>,
    hkf_id: Option<String>,
    is_saved: bool,
    has_downloaded: bool,
    is_processing: bool,
    is_saving_backend: bool,
    show_popup: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormSession {
    form: MembershipForm,
    errors: FieldErrors,
    signature: SignaturePad,
    today: NaiveDate,
    export: ExportState,
    revision: u64,
}

impl FormSession {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            form: MembershipForm::new(today),
            errors: FieldErrors::new(),
            signature: SignaturePad::default(),
            today,
            export: ExportState::default(),
            revision: 0,
        }
    }

    pub fn form(&self) -> &MembershipForm {
        &self.form
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Errors currently shown next to the fields.
    pub fn field_errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: FieldId) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Errors the record would have if every field were checked now.
    pub fn errors(&self) -> FieldErrors {
        validation::validate_form(&self.form, self.today)
    }

    pub fn is_valid(&self) -> bool {
        validation::is_valid(&self.form, self.today)
    }

    pub fn signature(&self) -> &SignaturePad {
        &self.signature
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_signed()
    }

    /// Whether the student question applies to the current record.
    pub fn student_question_enabled(&self) -> bool {
        rules::student_field_required(&self.form, self.today)
    }

    pub fn age(&self) -> u32 {
        validation::age_on(&self.form.dob, self.today)
    }

    pub fn phase(&self) -> Phase {
        if self.export.has_downloaded {
            Phase::Downloaded
        } else if self.export.is_saved {
            Phase::Saved
        } else if self.export.document.is_some() {
            Phase::ExportedUnsaved
        } else if self.is_valid() && self.is_signed() {
            Phase::ReadyToExport
        } else {
            Phase::Editing
        }
    }

    /// Generate stays enabled purely on current validity and signature.
    pub fn can_export(&self) -> bool {
        self.is_valid() && self.is_signed() && !self.is_busy()
    }

    /// Applies user input to `field`.
    ///
    /// IBAN input is reformatted first. A field that already shows an error
    /// is re-checked right away; other fields wait for blur.
    pub fn change_field(&mut self, field: FieldId, raw: &str) -> Result<(), SessionError> {
        let value = if field == FieldId::Iban {
            validation::format_iban(raw)
        } else {
            raw.to_string()
        };
        self.form.set_value(field, &value)?;
        self.invalidate();

        if self.errors.contains_key(&field) {
            self.revalidate(field);
        }
        if matches!(field, FieldId::Dob | FieldId::IsKannadaShaaleStudent) {
            rules::apply_student_rule(&mut self.form, &mut self.errors, self.today);
        }
        Ok(())
    }

    pub fn blur_field(&mut self, field: FieldId) {
        self.revalidate(field);
    }

    /// Checks every field, replacing the error map. Returns whether the
    /// record is valid.
    pub fn validate_all(&mut self) -> bool {
        self.errors = self.errors();
        self.errors.is_empty()
    }

    fn revalidate(&mut self, field: FieldId) {
        match validation::validate_field(field, self.form.value(field), &self.form, self.today) {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    pub fn pointer_down(&mut self, at: Point) {
        self.signature.press(at);
    }

    pub fn pointer_move(&mut self, to: Point) {
        self.signature.drag(to);
    }

    /// Release or leave. Ending a stroke changes the signature.
    pub fn pointer_up(&mut self) {
        if self.signature.release() {
            self.invalidate();
        }
    }

    pub fn set_signature_mode(&mut self, mode: SignatureMode) {
        if self.signature.set_mode(mode) {
            self.invalidate();
        }
    }

    pub fn upload_signature(&mut self, content_type: &str, bytes: Vec<u8>) -> Result<(), SessionError> {
        self.signature.upload(content_type, bytes)?;
        self.invalidate();
        Ok(())
    }

    pub fn clear_signature(&mut self) {
        self.signature.clear();
        self.invalidate();
    }

    /// Drops every result derived from an earlier export. Operations still
    /// in flight keep running but their results will be discarded.
    fn invalidate(&mut self) {
        let export = &mut self.export;
        export.is_saved = false;
        export.has_downloaded = false;
        export.hkf_id = None;
        export.document = None;
        export.document_hkf_id = None;
        export.show_popup = false;
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::membership::StudentAnswer;
    use crate::validation::{MSG_EMAIL, MSG_REQUIRED, MSG_STUDENT_REQUIRED};

    pub(super) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    pub(super) fn filled_session() -> FormSession {
        let mut session = FormSession::new(today());
        let values = [
            (FieldId::FirstName, "Asha"),
            (FieldId::LastName, "Rao"),
            (FieldId::Dob, "1990-01-20"),
            (FieldId::Gender, "female"),
            (FieldId::Address, "Hauptstr. 1"),
            (FieldId::PostalCode, "20095"),
            (FieldId::City, "Hamburg"),
            (FieldId::Phone, "040 123456"),
            (FieldId::Email, "asha@example.de"),
            (FieldId::SepaGender, "female"),
            (FieldId::SepaFirstName, "Asha"),
            (FieldId::SepaLastName, "Rao"),
            (FieldId::SepaAddress, "Hauptstr. 1"),
            (FieldId::SepaPostalCode, "20095"),
            (FieldId::SepaCity, "Hamburg"),
            (FieldId::Iban, "de29123456789012345678"),
        ];
        for (field, value) in values {
            session.change_field(field, value).unwrap();
        }
        session
    }

    pub(super) fn sign(session: &mut FormSession) {
        session.pointer_down(Point::new(20.0, 20.0));
        session.pointer_move(Point::new(80.0, 50.0));
        session.pointer_up();
    }

    #[test]
    fn new_session_is_editing() {
        let session = FormSession::new(today());
        assert_eq!(session.phase(), Phase::Editing);
        assert_eq!(session.form().entry_date, "2026-06-15");
        assert!(session.field_errors().is_empty());
        assert!(!session.can_export());
    }

    #[test]
    fn change_does_not_validate_untouched_fields() {
        let mut session = FormSession::new(today());
        session.change_field(FieldId::Email, "not-an-email").unwrap();
        assert_eq!(session.error(FieldId::Email), None);

        session.blur_field(FieldId::Email);
        assert_eq!(session.error(FieldId::Email), Some(MSG_EMAIL));

        session.change_field(FieldId::Email, "a@b.de").unwrap();
        assert_eq!(session.error(FieldId::Email), None);
    }

    #[test]
    fn blur_on_empty_required_field() {
        let mut session = FormSession::new(today());
        session.blur_field(FieldId::City);
        assert_eq!(session.error(FieldId::City), Some(MSG_REQUIRED));
    }

    #[test]
    fn iban_is_formatted_while_typing() {
        let mut session = FormSession::new(today());
        session.change_field(FieldId::Iban, "de29 1234-5678").unwrap();
        assert_eq!(session.form().iban, "DE29 1234 5678");
    }

    #[test]
    fn ready_only_with_valid_record_and_signature() {
        let mut session = filled_session();
        assert!(session.is_valid());
        assert_eq!(session.phase(), Phase::Editing);

        sign(&mut session);
        assert_eq!(session.phase(), Phase::ReadyToExport);
        assert!(session.can_export());

        session.clear_signature();
        assert_eq!(session.phase(), Phase::Editing);
    }

    #[test]
    fn validate_all_fills_error_map() {
        let mut session = FormSession::new(today());
        assert!(!session.validate_all());
        assert_eq!(session.field_errors().len(), FieldId::REQUIRED.len());
        assert_eq!(session.errors(), *session.field_errors());
    }

    #[test]
    fn student_rule_follows_date_of_birth() {
        let mut session = filled_session();
        session.change_field(FieldId::Dob, "2001-06-16").unwrap();
        assert!(session.student_question_enabled());
        assert!(!session.is_valid());
        assert!(!session.validate_all());
        assert_eq!(
            session.error(FieldId::IsKannadaShaaleStudent),
            Some(MSG_STUDENT_REQUIRED)
        );

        session.change_field(FieldId::IsKannadaShaaleStudent, "yes").unwrap();
        assert_eq!(session.error(FieldId::IsKannadaShaaleStudent), None);

        session.change_field(FieldId::Dob, "1996-01-01").unwrap();
        assert_eq!(session.age(), 30);
        assert_eq!(session.form().is_kannada_shaale_student, StudentAnswer::Unset);
        assert_eq!(session.error(FieldId::IsKannadaShaaleStudent), None);
        assert!(session.is_valid());
    }

    #[test]
    fn rejected_upload_leaves_state_alone() {
        let mut session = filled_session();
        session.set_signature_mode(SignatureMode::Upload);
        let before = session.clone();
        let err = session.upload_signature("text/plain", b"hi".to_vec()).unwrap_err();
        assert_eq!(err, SessionError::UploadRejected);
        assert_eq!(session, before);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut session = FormSession::new(today());
        assert!(session.change_field(FieldId::SepaGender, "robot").is_err());
    }
}
