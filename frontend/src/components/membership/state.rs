//! Component state of the membership form.

use chrono::NaiveDate;
use common::model::membership::FieldId;
use common::session::FormSession;
use std::collections::HashSet;
use yew::NodeRef;

pub struct MembershipComponent {
    pub session: FormSession,

    /// Fields the user has left at least once; a valid touched field is
    /// shown with a success border.
    pub touched: HashSet<FieldId>,

    /// Transient line under the generate button.
    pub status_message: Option<String>,
    pub status_serial: u32,

    /// PNG data URL of the drawing surface, refreshed after every stroke
    /// segment.
    pub surface_preview: Option<String>,

    pub file_input_ref: NodeRef,
}

impl MembershipComponent {
    pub fn new(today: NaiveDate) -> Self {
        let mut component = Self {
            session: FormSession::new(today),
            touched: HashSet::new(),
            status_message: None,
            status_serial: 0,
            surface_preview: None,
            file_input_ref: NodeRef::default(),
        };
        component.refresh_surface_preview();
        component
    }

    pub fn refresh_surface_preview(&mut self) {
        self.surface_preview = self.session.signature().surface().to_data_url().ok();
    }

    pub fn is_success(&self, field: FieldId) -> bool {
        self.touched.contains(&field)
            && !self.session.form().value(field).is_empty()
            && self.session.error(field).is_none()
    }
}
