//! Printable representation of one application.
//!
//! The view is a flat list of [`Block`]s per section; the rasterizer turns
//! each section into one tall bitmap.

use chrono::NaiveDate;
use common::model::membership::MembershipForm;
use common::requests::DocumentRequest;
use common::rules;
use common::terms;

pub const ORGANISATION: &str = "Hamburg Kannada Freunde e.V";
pub const FORM_SUBTITLE: &str = "EINTRITTSFORMULAR / Membership Form";

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Organisation name and form subtitle, followed by a rule.
    Header { title: String, subtitle: String },
    /// Highlighted membership number.
    Banner { label: String, value: String },
    Heading(String),
    /// Label on the left, boxed value on the right.
    Field { label: String, value: String },
    /// Text with an optional bold lead-in.
    Paragraph { lead: Option<String>, text: String },
    Bullet(String),
    /// Entry date box next to the signature box.
    Signature { entry_date: String, data_url: Option<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintableView {
    pub form: Vec<Block>,
    pub terms: Vec<Block>,
}

impl PrintableView {
    pub fn build(request: &DocumentRequest, today: NaiveDate) -> Self {
        Self {
            form: form_section(request, today),
            terms: terms_section(),
        }
    }
}

fn field(label: &str, value: &str) -> Block {
    Block::Field {
        label: label.to_string(),
        value: value.to_string(),
    }
}

fn form_section(request: &DocumentRequest, today: NaiveDate) -> Vec<Block> {
    let form: &MembershipForm = &request.form;
    let mut blocks = vec![Block::Header {
        title: ORGANISATION.to_string(),
        subtitle: FORM_SUBTITLE.to_string(),
    }];

    if let Some(id) = request.hkf_id.as_deref().filter(|id| !id.is_empty()) {
        blocks.push(Block::Banner {
            label: "Membership Number:".to_string(),
            value: id.to_string(),
        });
    }

    blocks.push(Block::Heading("Personal Details".to_string()));
    blocks.push(field("First Name", &form.first_name));
    blocks.push(field("Last Name", &form.last_name));
    blocks.push(field("Date of Birth", &form.dob));
    blocks.push(field("Gender", form.gender.label()));
    if rules::student_field_required(form, today) {
        blocks.push(field("Kannada Shaale?", form.is_kannada_shaale_student.label()));
    }
    blocks.push(field("Address", &form.address));
    blocks.push(field("Postal Code", &form.postal_code));
    blocks.push(field("City", &form.city));
    blocks.push(field("Phone", &form.phone));
    blocks.push(field("E-Mail", &form.email));

    blocks.push(Block::Heading("SEPA-Lastschriftmandat".to_string()));
    blocks.push(field("Holder Name", &form.holder_name()));
    blocks.push(field("IBAN", &form.iban));

    blocks.push(Block::Heading("Signature".to_string()));
    blocks.push(Block::Signature {
        entry_date: form.entry_date.clone(),
        data_url: request.signature_data_url.clone(),
    });
    blocks
}

fn terms_section() -> Vec<Block> {
    let mut blocks = vec![Block::Heading(terms::TITLE.to_string())];
    for clause in terms::CLAUSES {
        blocks.push(Block::Paragraph {
            lead: Some(clause.heading()),
            text: clause.text.to_string(),
        });
        blocks.extend(clause.bullets.iter().map(|b| Block::Bullet(b.to_string())));
    }
    blocks.push(Block::Heading(terms::CONTRIBUTIONS_TITLE.to_string()));
    blocks.push(Block::Paragraph {
        lead: None,
        text: terms::CONTRIBUTIONS.to_string(),
    });
    blocks
}
