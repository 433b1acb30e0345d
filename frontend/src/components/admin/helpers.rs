use common::model::submission::Submission;

/// Download name of a stored record's PDF. Matches the name the backend puts
/// in `Content-Disposition`.
pub fn pdf_file_name(submission: &Submission) -> String {
    match submission.hkf_id.as_deref() {
        Some(id) if !id.is_empty() => format!("HKF_{}.pdf", id),
        _ => format!("HKF_{}.pdf", submission.id),
    }
}

/// `city (postal code)`, leaving out whatever is missing.
pub fn location(submission: &Submission) -> String {
    let form = &submission.form;
    match (form.city.trim(), form.postal_code.trim()) {
        ("", "") => "-".to_string(),
        (city, "") => city.to_string(),
        ("", postal) => format!("({})", postal),
        (city, postal) => format!("{} ({})", city, postal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::membership::MembershipForm;

    fn submission(hkf_id: Option<&str>) -> Submission {
        Submission {
            id: 3,
            hkf_id: hkf_id.map(str::to_string),
            form: MembershipForm {
                city: "Hamburg".into(),
                postal_code: "21147".into(),
                ..Default::default()
            },
            signature: None,
            status: Default::default(),
            comments: None,
            created_at: None,
        }
    }

    #[test]
    fn file_name_prefers_membership_number() {
        assert_eq!(pdf_file_name(&submission(Some("HKF-0003"))), "HKF_HKF-0003.pdf");
        assert_eq!(pdf_file_name(&submission(None)), "HKF_3.pdf");
    }

    #[test]
    fn location_joins_city_and_postal_code() {
        assert_eq!(location(&submission(None)), "Hamburg (21147)");
    }
}
