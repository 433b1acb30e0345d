//! Component state of the admin dashboard.

use common::model::submission::{StatusFilter, Submission};

#[derive(Default)]
pub struct AdminComponent {
    pub email: String,
    pub password: String,
    pub login_error: Option<String>,
    pub logging_in: bool,
    /// Bearer token of the admin session; `None` shows the login form.
    pub token: Option<String>,

    pub submissions: Vec<Submission>,
    pub loading: bool,
    pub load_error: Option<String>,
    pub filter: StatusFilter,

    /// Row id of the record open in the review sheet.
    pub selected: Option<i64>,
    pub comment: String,
    pub updating: bool,
    pub downloading: bool,
}

impl AdminComponent {
    pub fn selected_submission(&self) -> Option<&Submission> {
        let id = self.selected?;
        self.submissions.iter().find(|s| s.id == id)
    }
}
