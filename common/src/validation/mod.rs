//! Field Validator: pure checks of a single form field against the record.
//!
//! Precedence is fixed: the required check short-circuits, then the
//! age-dependent student rule, then format checks that only look at
//! non-empty values.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::model::membership::{FieldId, MembershipForm};
use crate::rules;

/// Current validation errors, keyed by field. Absence means valid or not yet
/// checked.
pub type FieldErrors = BTreeMap<FieldId, String>;

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_STUDENT_REQUIRED: &str = "Required for students/children.";
pub const MSG_EMAIL: &str = "Please enter a valid email address.";
pub const MSG_POSTAL_CODE: &str = "Please enter a 5-digit postal code.";
pub const MSG_IBAN: &str = "Please enter a valid 22-character German IBAN.";
pub const MSG_TOO_LONG: &str = "Please keep this entry under 200 characters.";

/// Longest accepted value of any field, in characters.
pub const MAX_FIELD_LEN: usize = 200;

/// Age reported while the date of birth is missing or unreadable. It is
/// large enough that the student rule never fires; the empty date of birth
/// is flagged by the required check on its own field.
pub const UNKNOWN_AGE: u32 = 999;

/// Longest formatted IBAN: 22 characters plus 5 group separators.
pub const IBAN_FORMATTED_LEN: usize = 27;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static POSTAL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}$").expect("valid postal code regex"));
static IBAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^DE\d{20}$").expect("valid IBAN regex"));

/// Validates `value` as the new content of `field` within `form`.
pub fn validate_field(
    field: FieldId,
    value: &str,
    form: &MembershipForm,
    today: NaiveDate,
) -> Option<String> {
    if field.is_required() && value.trim().is_empty() {
        return Some(MSG_REQUIRED.to_string());
    }

    if field == FieldId::IsKannadaShaaleStudent
        && rules::student_field_required(form, today)
        && value.is_empty()
    {
        return Some(MSG_STUDENT_REQUIRED.to_string());
    }

    if value.is_empty() {
        return None;
    }
    if is_too_long(value) {
        return Some(MSG_TOO_LONG.to_string());
    }

    let malformed = match field {
        FieldId::Email => (!EMAIL_RE.is_match(value)).then_some(MSG_EMAIL),
        FieldId::PostalCode | FieldId::SepaPostalCode => {
            (!POSTAL_CODE_RE.is_match(value)).then_some(MSG_POSTAL_CODE)
        }
        FieldId::Iban => (!IBAN_RE.is_match(&strip_whitespace(value))).then_some(MSG_IBAN),
        _ => None,
    };
    malformed.map(str::to_string)
}

/// Runs the validator over every checked field and collects the failures.
/// Display-only fields are still held to the length limit.
pub fn validate_form(form: &MembershipForm, today: NaiveDate) -> FieldErrors {
    let checked = FieldId::VALIDATED.into_iter().filter_map(|field| {
        validate_field(field, form.value(field), form, today).map(|msg| (field, msg))
    });
    let oversized = FieldId::ALL
        .into_iter()
        .filter(|field| !FieldId::VALIDATED.contains(field) && is_too_long(form.value(*field)))
        .map(|field| (field, MSG_TOO_LONG.to_string()));
    checked.chain(oversized).collect()
}

fn is_too_long(value: &str) -> bool {
    value.chars().count() > MAX_FIELD_LEN
}

pub fn is_valid(form: &MembershipForm, today: NaiveDate) -> bool {
    validate_form(form, today).is_empty()
}

/// Completed years between `dob` (`YYYY-MM-DD`) and `today`.
///
/// A missing or unparseable date yields [`UNKNOWN_AGE`].
pub fn age_on(dob: &str, today: NaiveDate) -> u32 {
    let Ok(birth) = NaiveDate::parse_from_str(dob.trim(), "%Y-%m-%d") else {
        return UNKNOWN_AGE;
    };
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    // Birth dates in the future count as newborns.
    age.max(0) as u32
}

/// Formats IBAN input while typing: keeps letters and digits, uppercases,
/// groups by four and caps the length.
pub fn format_iban(input: &str) -> String {
    let significant: Vec<char> = input
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let mut formatted = significant
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ");
    formatted.truncate(IBAN_FORMATTED_LEN);
    formatted.truncate(formatted.trim_end().len());
    formatted
}

pub fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::membership::{Gender, SepaGender, StudentAnswer};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn valid_form() -> MembershipForm {
        MembershipForm {
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            dob: "1990-01-20".into(),
            gender: Gender::Female,
            address: "Hauptstr. 1".into(),
            postal_code: "20095".into(),
            city: "Hamburg".into(),
            phone: "+49 40 123456".into(),
            email: "asha@example.de".into(),
            sepa_gender: SepaGender::Female,
            sepa_first_name: "Asha".into(),
            sepa_last_name: "Rao".into(),
            sepa_address: "Hauptstr. 1".into(),
            sepa_postal_code: "20095".into(),
            sepa_city: "Hamburg".into(),
            iban: "DE29 1234 5678 9012 3456 78".into(),
            ..MembershipForm::new(today())
        }
    }

    #[test]
    fn required_fields_reject_blank_values() {
        let form = valid_form();
        for field in FieldId::REQUIRED {
            for blank in ["", "   ", "\t"] {
                assert_eq!(
                    validate_field(field, blank, &form, today()).as_deref(),
                    Some(MSG_REQUIRED),
                    "{field}"
                );
            }
        }
    }

    #[test]
    fn overlong_values_are_rejected_everywhere() {
        let long = "ab ".repeat(MAX_FIELD_LEN);
        let mut form = valid_form();
        assert_eq!(
            validate_field(FieldId::Address, &long, &form, today()).as_deref(),
            Some(MSG_TOO_LONG)
        );

        form.address = long.clone();
        form.entry_date = long;
        let errors = validate_form(&form, today());
        assert_eq!(errors.get(&FieldId::Address).map(String::as_str), Some(MSG_TOO_LONG));
        assert_eq!(errors.get(&FieldId::EntryDate).map(String::as_str), Some(MSG_TOO_LONG));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn valid_record_has_no_errors() {
        let form = valid_form();
        for field in FieldId::ALL {
            assert_eq!(validate_field(field, form.value(field), &form, today()), None, "{field}");
        }
        assert!(is_valid(&form, today()));
    }

    #[test]
    fn postal_code_must_have_five_digits() {
        let form = valid_form();
        for field in [FieldId::PostalCode, FieldId::SepaPostalCode] {
            assert_eq!(
                validate_field(field, "1234", &form, today()).as_deref(),
                Some(MSG_POSTAL_CODE)
            );
            assert_eq!(validate_field(field, "12345", &form, today()), None);
            assert_eq!(
                validate_field(field, "123456", &form, today()).as_deref(),
                Some(MSG_POSTAL_CODE)
            );
            assert!(validate_field(field, "12a45", &form, today()).is_some());
        }
    }

    #[test]
    fn email_shape() {
        let form = valid_form();
        let check = |v: &str| validate_field(FieldId::Email, v, &form, today());
        assert_eq!(check("a@b.de"), None);
        assert_eq!(check("a@b").as_deref(), Some(MSG_EMAIL));
        assert_eq!(check("a b@c.de").as_deref(), Some(MSG_EMAIL));
        assert_eq!(check("a@@c.de").as_deref(), Some(MSG_EMAIL));
    }

    #[test]
    fn iban_accepts_spaces_but_only_german_format() {
        let form = valid_form();
        let check = |v: &str| validate_field(FieldId::Iban, v, &form, today());
        assert_eq!(check("DE29123456789012345678"), None);
        assert_eq!(check("DE29 1234 5678 9012 3456 78"), None);
        assert_eq!(check("DE29 1234 5678 9012 3456 7").as_deref(), Some(MSG_IBAN));
        assert_eq!(check("AT291234567890123456").as_deref(), Some(MSG_IBAN));
    }

    #[test]
    fn iban_formatting_round_trips() {
        let formatted = format_iban("de29123456789012345678");
        assert_eq!(formatted, "DE29 1234 5678 9012 3456 78");
        assert_eq!(strip_whitespace(&formatted), "DE29123456789012345678");
        assert_eq!(format_iban(&formatted), formatted);
    }

    #[test]
    fn iban_formatting_drops_punctuation_and_caps_length() {
        assert_eq!(format_iban("DE29-1234.5678"), "DE29 1234 5678");
        assert_eq!(format_iban("DE2912"), "DE29 12");
        assert_eq!(format_iban("DE29"), "DE29");
        let long = format_iban("DE29123456789012345678999999");
        assert_eq!(long.len(), IBAN_FORMATTED_LEN);
        assert_eq!(long, "DE29 1234 5678 9012 3456 78");
        assert_eq!(format_iban(""), "");
    }

    #[test]
    fn age_counts_completed_years() {
        let today = today();
        assert_eq!(age_on("2001-06-15", today), 25);
        assert_eq!(age_on("2001-06-16", today), 24);
        assert_eq!(age_on("2001-06-14", today), 25);
        assert_eq!(age_on("2001-12-31", today), 24);
    }

    #[test]
    fn missing_or_garbled_dob_yields_sentinel() {
        assert_eq!(age_on("", today()), UNKNOWN_AGE);
        assert_eq!(age_on("15.06.2001", today()), UNKNOWN_AGE);
    }

    #[test]
    fn student_field_required_only_below_twenty_five() {
        let mut form = valid_form();
        form.dob = "2001-06-16".into();
        assert_eq!(
            validate_field(FieldId::IsKannadaShaaleStudent, "", &form, today()).as_deref(),
            Some(MSG_STUDENT_REQUIRED)
        );
        assert_eq!(
            validate_field(FieldId::IsKannadaShaaleStudent, "no", &form, today()),
            None
        );

        form.dob = "1996-01-01".into();
        assert_eq!(validate_field(FieldId::IsKannadaShaaleStudent, "", &form, today()), None);

        form.dob.clear();
        assert_eq!(validate_field(FieldId::IsKannadaShaaleStudent, "", &form, today()), None);
    }

    #[test]
    fn whole_form_validation_collects_every_failure() {
        let mut form = valid_form();
        form.first_name.clear();
        form.postal_code = "1234".into();
        form.dob = "2010-01-01".into();
        form.is_kannada_shaale_student = StudentAnswer::Unset;

        let errors = validate_form(&form, today());
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[&FieldId::FirstName], MSG_REQUIRED);
        assert_eq!(errors[&FieldId::PostalCode], MSG_POSTAL_CODE);
        assert_eq!(errors[&FieldId::IsKannadaShaaleStudent], MSG_STUDENT_REQUIRED);
        assert!(!is_valid(&form, today()));
    }
}
