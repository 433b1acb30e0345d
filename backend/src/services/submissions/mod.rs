//! # Submission Service
//!
//! Persists finished applications and serves them to the review dashboard.
//!
//! ## Sub-modules
//! - `store`: the SQLite table behind every handler.
//! - `save`: public endpoint called by the membership form after export.
//! - `list`, `update`, `pdf`: admin endpoints, guarded by
//!   [`crate::services::admin::require_admin`].
//!
//! ## Routes
//! - `POST /api/submissions/save`
//! - `GET  /api/submissions`
//! - `POST /api/submissions/update`
//! - `GET  /api/submissions/{id}/pdf`

mod list;
mod pdf;
mod save;
pub mod store;
mod update;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/submissions";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/save", post().to(save::process))
        .route("/update", post().to(update::process))
        .route("/{id}/pdf", get().to(pdf::process))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::store::SubmissionStore;
    use crate::services::admin::AdminSessions;

    pub struct Fixture {
        pub _dir: tempfile::TempDir,
        pub store: SubmissionStore,
        pub sessions: AdminSessions,
        pub token: String,
    }

    /// Empty store plus one logged-in administrator.
    pub async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = SubmissionStore::open(dir.path().join("membership.sqlite")).unwrap();
        let sessions = AdminSessions::new("admin@example.com", Some("pw".into()));
        let token = sessions.issue().await;
        Fixture {
            _dir: dir,
            store,
            sessions,
            token,
        }
    }
}
