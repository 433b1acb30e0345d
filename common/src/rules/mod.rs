//! Conditional Rule Engine for the age-dependent student question.

use chrono::NaiveDate;

use crate::model::membership::{FieldId, MembershipForm, StudentAnswer};
use crate::validation::{self, FieldErrors};

/// Applicants younger than this must answer the student question.
pub const STUDENT_AGE_LIMIT: u32 = 25;

/// Whether the student question must be answered for this record.
pub fn student_field_required(form: &MembershipForm, today: NaiveDate) -> bool {
    validation::age_on(&form.dob, today) < STUDENT_AGE_LIMIT
}

/// Whether a stale student answer has to be discarded because the applicant
/// is no longer in the age bracket.
pub fn student_field_must_clear(form: &MembershipForm, today: NaiveDate) -> bool {
    !student_field_required(form, today) && form.is_kannada_shaale_student != StudentAnswer::Unset
}

/// Re-evaluates the student rule after the date of birth changed. Clears the
/// answer and its error when the question no longer applies. Returns whether
/// anything was reset.
pub fn apply_student_rule(form: &mut MembershipForm, errors: &mut FieldErrors, today: NaiveDate) -> bool {
    let must_clear = student_field_must_clear(form, today);
    if must_clear {
        log::debug!("clearing student answer, applicant is {} or older", STUDENT_AGE_LIMIT);
        form.is_kannada_shaale_student = StudentAnswer::Unset;
    }
    let had_error = if student_field_required(form, today) {
        false
    } else {
        errors.remove(&FieldId::IsKannadaShaaleStudent).is_some()
    };
    must_clear || had_error
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn form_born(dob: &str) -> MembershipForm {
        MembershipForm {
            dob: dob.into(),
            ..Default::default()
        }
    }

    #[test]
    fn required_below_limit() {
        assert!(student_field_required(&form_born("2001-06-16"), today()));
        assert!(!student_field_required(&form_born("2001-06-15"), today()));
        assert!(!student_field_required(&form_born(""), today()));
    }

    #[test]
    fn adult_answer_and_error_are_cleared() {
        let mut form = form_born("1996-03-01");
        form.is_kannada_shaale_student = StudentAnswer::Yes;
        let mut errors = FieldErrors::new();
        errors.insert(FieldId::IsKannadaShaaleStudent, "x".into());

        assert!(apply_student_rule(&mut form, &mut errors, today()));
        assert_eq!(form.is_kannada_shaale_student, StudentAnswer::Unset);
        assert!(errors.is_empty());
    }

    #[test]
    fn minor_answer_is_kept() {
        let mut form = form_born("2012-03-01");
        form.is_kannada_shaale_student = StudentAnswer::No;
        let mut errors = FieldErrors::new();

        assert!(!apply_student_rule(&mut form, &mut errors, today()));
        assert_eq!(form.is_kannada_shaale_student, StudentAnswer::No);
    }

    #[test]
    fn minor_error_survives_rule() {
        let mut form = form_born("2012-03-01");
        let mut errors = FieldErrors::new();
        errors.insert(FieldId::IsKannadaShaaleStudent, "x".into());
        apply_student_rule(&mut form, &mut errors, today());
        assert!(errors.contains_key(&FieldId::IsKannadaShaaleStudent));
    }
}
