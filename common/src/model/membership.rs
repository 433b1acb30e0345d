use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SessionError;

/// Identifies one input of the membership form.
///
/// The serialized name matches the JSON key of the field inside
/// `MembershipForm`, so a `FieldErrors` map can be sent to a client as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    FirstName,
    LastName,
    Dob,
    Gender,
    IsKannadaShaaleStudent,
    Address,
    PostalCode,
    City,
    Phone,
    Email,
    EntryDate,
    SepaGender,
    SepaFirstName,
    SepaLastName,
    SepaAddress,
    SepaPostalCode,
    SepaCity,
    Iban,
    SepaEntryDate,
}

impl FieldId {
    /// Every field of the record, in form order.
    pub const ALL: [FieldId; 19] = [
        FieldId::FirstName,
        FieldId::LastName,
        FieldId::Dob,
        FieldId::Gender,
        FieldId::IsKannadaShaaleStudent,
        FieldId::Address,
        FieldId::PostalCode,
        FieldId::City,
        FieldId::Phone,
        FieldId::Email,
        FieldId::EntryDate,
        FieldId::SepaGender,
        FieldId::SepaFirstName,
        FieldId::SepaLastName,
        FieldId::SepaAddress,
        FieldId::SepaPostalCode,
        FieldId::SepaCity,
        FieldId::Iban,
        FieldId::SepaEntryDate,
    ];

    /// Fields that must never be empty.
    pub const REQUIRED: [FieldId; 16] = [
        FieldId::FirstName,
        FieldId::LastName,
        FieldId::Dob,
        FieldId::Gender,
        FieldId::Address,
        FieldId::PostalCode,
        FieldId::City,
        FieldId::Phone,
        FieldId::Email,
        FieldId::SepaGender,
        FieldId::SepaFirstName,
        FieldId::SepaLastName,
        FieldId::SepaAddress,
        FieldId::SepaPostalCode,
        FieldId::SepaCity,
        FieldId::Iban,
    ];

    /// Fields checked by whole-form validation: the required set plus the
    /// conditionally required student field.
    pub const VALIDATED: [FieldId; 17] = [
        FieldId::FirstName,
        FieldId::LastName,
        FieldId::Dob,
        FieldId::Gender,
        FieldId::IsKannadaShaaleStudent,
        FieldId::Address,
        FieldId::PostalCode,
        FieldId::City,
        FieldId::Phone,
        FieldId::Email,
        FieldId::SepaGender,
        FieldId::SepaFirstName,
        FieldId::SepaLastName,
        FieldId::SepaAddress,
        FieldId::SepaPostalCode,
        FieldId::SepaCity,
        FieldId::Iban,
    ];

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }

    /// JSON key / HTML input name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldId::FirstName => "firstName",
            FieldId::LastName => "lastName",
            FieldId::Dob => "dob",
            FieldId::Gender => "gender",
            FieldId::IsKannadaShaaleStudent => "isKannadaShaaleStudent",
            FieldId::Address => "address",
            FieldId::PostalCode => "postalCode",
            FieldId::City => "city",
            FieldId::Phone => "phone",
            FieldId::Email => "email",
            FieldId::EntryDate => "entryDate",
            FieldId::SepaGender => "sepaGender",
            FieldId::SepaFirstName => "sepaFirstName",
            FieldId::SepaLastName => "sepaLastName",
            FieldId::SepaAddress => "sepaAddress",
            FieldId::SepaPostalCode => "sepaPostalCode",
            FieldId::SepaCity => "sepaCity",
            FieldId::Iban => "iban",
            FieldId::SepaEntryDate => "sepaEntryDate",
        }
    }

    pub fn from_name(name: &str) -> Option<FieldId> {
        FieldId::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gender of the applicant. `Unset` serializes to an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    #[serde(rename = "")]
    Unset,
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Unset => "",
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn parse(value: &str) -> Option<Gender> {
        match value {
            "" => Some(Gender::Unset),
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }

    /// Bilingual label printed on the application.
    pub fn label(self) -> &'static str {
        match self {
            Gender::Unset => "",
            Gender::Male => "Männlich (Male)",
            Gender::Female => "Weiblich (Female)",
        }
    }
}

/// Salutation of the SEPA account holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SepaGender {
    #[default]
    #[serde(rename = "")]
    Unset,
    Male,
    Female,
    Diverse,
    None,
    Institution,
}

impl SepaGender {
    pub fn as_str(self) -> &'static str {
        match self {
            SepaGender::Unset => "",
            SepaGender::Male => "male",
            SepaGender::Female => "female",
            SepaGender::Diverse => "diverse",
            SepaGender::None => "none",
            SepaGender::Institution => "institution",
        }
    }

    pub fn parse(value: &str) -> Option<SepaGender> {
        match value {
            "" => Some(SepaGender::Unset),
            "male" => Some(SepaGender::Male),
            "female" => Some(SepaGender::Female),
            "diverse" => Some(SepaGender::Diverse),
            "none" => Some(SepaGender::None),
            "institution" => Some(SepaGender::Institution),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SepaGender::Unset => "",
            SepaGender::Male => "Male",
            SepaGender::Female => "Female",
            SepaGender::Diverse => "Diverse",
            SepaGender::None => "No Answer",
            SepaGender::Institution => "Institution",
        }
    }
}

/// Answer to "Enrolled in Kannada Shaale?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentAnswer {
    #[default]
    #[serde(rename = "")]
    Unset,
    Yes,
    No,
}

impl StudentAnswer {
    pub fn as_str(self) -> &'static str {
        match self {
            StudentAnswer::Unset => "",
            StudentAnswer::Yes => "yes",
            StudentAnswer::No => "no",
        }
    }

    pub fn parse(value: &str) -> Option<StudentAnswer> {
        match value {
            "" => Some(StudentAnswer::Unset),
            "yes" => Some(StudentAnswer::Yes),
            "no" => Some(StudentAnswer::No),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StudentAnswer::Unset => "",
            StudentAnswer::Yes => "Yes",
            StudentAnswer::No => "No",
        }
    }
}

/// The membership application: personal details plus the SEPA direct debit
/// mandate. Dates are ISO `YYYY-MM-DD` strings as entered in the form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MembershipForm {
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub gender: Gender,
    pub is_kannada_shaale_student: StudentAnswer,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub phone: String,
    pub email: String,
    pub entry_date: String,

    pub sepa_gender: SepaGender,
    pub sepa_first_name: String,
    pub sepa_last_name: String,
    pub sepa_address: String,
    pub sepa_postal_code: String,
    pub sepa_city: String,
    pub iban: String,
    pub sepa_entry_date: String,
}

impl MembershipForm {
    /// An empty record whose entry dates are set to `today`.
    pub fn new(today: NaiveDate) -> Self {
        let today = today.format("%Y-%m-%d").to_string();
        Self {
            entry_date: today.clone(),
            sepa_entry_date: today,
            ..Default::default()
        }
    }

    /// Current value of `field` as it appears in the form.
    pub fn value(&self, field: FieldId) -> &str {
        match field {
            FieldId::FirstName => &self.first_name,
            FieldId::LastName => &self.last_name,
            FieldId::Dob => &self.dob,
            FieldId::Gender => self.gender.as_str(),
            FieldId::IsKannadaShaaleStudent => self.is_kannada_shaale_student.as_str(),
            FieldId::Address => &self.address,
            FieldId::PostalCode => &self.postal_code,
            FieldId::City => &self.city,
            FieldId::Phone => &self.phone,
            FieldId::Email => &self.email,
            FieldId::EntryDate => &self.entry_date,
            FieldId::SepaGender => self.sepa_gender.as_str(),
            FieldId::SepaFirstName => &self.sepa_first_name,
            FieldId::SepaLastName => &self.sepa_last_name,
            FieldId::SepaAddress => &self.sepa_address,
            FieldId::SepaPostalCode => &self.sepa_postal_code,
            FieldId::SepaCity => &self.sepa_city,
            FieldId::Iban => &self.iban,
            FieldId::SepaEntryDate => &self.sepa_entry_date,
        }
    }

    /// Stores `value` into `field`. Enumerated fields only accept one of their
    /// option values (or the empty string).
    pub fn set_value(&mut self, field: FieldId, value: &str) -> Result<(), SessionError> {
        let unknown = || SessionError::UnknownOption {
            field,
            value: value.to_string(),
        };
        match field {
            FieldId::Gender => self.gender = Gender::parse(value).ok_or_else(unknown)?,
            FieldId::SepaGender => self.sepa_gender = SepaGender::parse(value).ok_or_else(unknown)?,
            FieldId::IsKannadaShaaleStudent => {
                self.is_kannada_shaale_student = StudentAnswer::parse(value).ok_or_else(unknown)?
            }
            text_field => {
                if let Some(slot) = self.text_mut(text_field) {
                    *slot = value.to_string();
                }
            }
        }
        Ok(())
    }

    fn text_mut(&mut self, field: FieldId) -> Option<&mut String> {
        let slot = match field {
            FieldId::FirstName => &mut self.first_name,
            FieldId::LastName => &mut self.last_name,
            FieldId::Dob => &mut self.dob,
            FieldId::Address => &mut self.address,
            FieldId::PostalCode => &mut self.postal_code,
            FieldId::City => &mut self.city,
            FieldId::Phone => &mut self.phone,
            FieldId::Email => &mut self.email,
            FieldId::EntryDate => &mut self.entry_date,
            FieldId::SepaFirstName => &mut self.sepa_first_name,
            FieldId::SepaLastName => &mut self.sepa_last_name,
            FieldId::SepaAddress => &mut self.sepa_address,
            FieldId::SepaPostalCode => &mut self.sepa_postal_code,
            FieldId::SepaCity => &mut self.sepa_city,
            FieldId::Iban => &mut self.iban,
            FieldId::SepaEntryDate => &mut self.sepa_entry_date,
            FieldId::Gender | FieldId::SepaGender | FieldId::IsKannadaShaaleStudent => return None,
        };
        Some(slot)
    }

    /// Account holder printed on the mandate; falls back to the applicant's
    /// own name for each part left empty.
    pub fn holder_name(&self) -> String {
        let first = if self.sepa_first_name.is_empty() {
            &self.first_name
        } else {
            &self.sepa_first_name
        };
        let last = if self.sepa_last_name.is_empty() {
            &self.last_name
        } else {
            &self.sepa_last_name
        };
        format!("{} {}", first, last)
    }

    /// Copy of the record as it is persisted: IBAN without whitespace.
    pub fn normalized(&self) -> Self {
        let mut form = self.clone();
        form.iban.retain(|c| !c.is_whitespace());
        form
    }
}
