//! SQLite persistence for membership applications.
//!
//! One connection is opened per operation, the same way the other services
//! talk to their database file. The form itself is stored as JSON so that
//! the table does not have to follow every field of the record.

use chrono::Local;
use common::model::membership::MembershipForm;
use common::model::submission::{Submission, SubmissionStatus};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("stored record is not readable: {0}")]
    Json(#[from] serde_json::Error),
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS submissions (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    hkf_id     TEXT,
    form_json  TEXT NOT NULL,
    signature  TEXT,
    status     TEXT,
    comments   TEXT,
    created_at TEXT
)";

const COLUMNS: &str = "id, hkf_id, form_json, signature, status, comments, created_at";

/// Membership number issued for row `id`.
pub fn membership_number(id: i64) -> String {
    format!("HKF-{:04}", id)
}

#[derive(Debug, Clone)]
pub struct SubmissionStore {
    path: PathBuf,
}

impl SubmissionStore {
    /// Opens (and if needed creates) the database file and its table.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.connect()?.execute(SCHEMA, [])?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(&self.path)?)
    }

    /// Inserts a new application and returns its membership number.
    pub fn save(&self, form: &MembershipForm, signature: Option<&str>) -> Result<String, StoreError> {
        let created_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.save_at(form, signature, &created_at)
    }

    pub(crate) fn save_at(
        &self,
        form: &MembershipForm,
        signature: Option<&str>,
        created_at: &str,
    ) -> Result<String, StoreError> {
        let form_json = serde_json::to_string(form)?;
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO submissions (form_json, signature, created_at) VALUES (?1, ?2, ?3)",
            params![form_json, signature, created_at],
        )?;
        let id = tx.last_insert_rowid();
        let hkf_id = membership_number(id);
        tx.execute(
            "UPDATE submissions SET hkf_id = ?1 WHERE id = ?2",
            params![hkf_id, id],
        )?;
        tx.commit()?;
        Ok(hkf_id)
    }

    /// Every application, newest first.
    pub fn list(&self) -> Result<Vec<Submission>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM submissions ORDER BY id DESC", COLUMNS))?;
        let rows = stmt.query_map([], StoredRow::read)?;

        let mut submissions = Vec::new();
        for row in rows {
            submissions.push(row?.into_submission()?);
        }
        Ok(submissions)
    }

    pub fn get(&self, id: i64) -> Result<Option<Submission>, StoreError> {
        let conn = self.connect()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM submissions WHERE id = ?1", COLUMNS),
                params![id],
                StoredRow::read,
            )
            .optional()?;
        row.map(StoredRow::into_submission).transpose()
    }

    /// Records a review decision. Returns `false` when `id` does not exist.
    pub fn update_status(&self, id: i64, status: SubmissionStatus, comments: &str) -> Result<bool, StoreError> {
        let conn = self.connect()?;
        let changed = conn.execute(
            "UPDATE submissions SET status = ?1, comments = ?2 WHERE id = ?3",
            params![status.as_str(), comments, id],
        )?;
        Ok(changed > 0)
    }
}

struct StoredRow {
    id: i64,
    hkf_id: Option<String>,
    form_json: String,
    signature: Option<String>,
    status: Option<String>,
    comments: Option<String>,
    created_at: Option<String>,
}

impl StoredRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            hkf_id: row.get(1)?,
            form_json: row.get(2)?,
            signature: row.get(3)?,
            status: row.get(4)?,
            comments: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn into_submission(self) -> Result<Submission, StoreError> {
        Ok(Submission {
            id: self.id,
            hkf_id: self.hkf_id,
            form: serde_json::from_str(&self.form_json)?,
            signature: self.signature,
            status: SubmissionStatus::from_stored(self.status.as_deref()),
            comments: self.comments,
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(first: &str) -> MembershipForm {
        MembershipForm {
            first_name: first.into(),
            last_name: "Rao".into(),
            iban: "DE29123456789012345678".into(),
            ..Default::default()
        }
    }

    fn store() -> (tempfile::TempDir, SubmissionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SubmissionStore::open(dir.path().join("membership.sqlite")).unwrap();
        (dir, store)
    }

    #[test]
    fn numbers_follow_row_ids() {
        let (_dir, store) = store();
        assert_eq!(store.save(&form("Asha"), Some("data:image/png;base64,AA==")).unwrap(), "HKF-0001");
        assert_eq!(store.save(&form("Ravi"), None).unwrap(), "HKF-0002");
        assert_eq!(membership_number(12345), "HKF-12345");
    }

    #[test]
    fn list_is_newest_first_and_new_rows_are_pending() {
        let (_dir, store) = store();
        store.save_at(&form("Asha"), None, "2024-05-01 10:00:00").unwrap();
        store.save_at(&form("Ravi"), None, "2025-02-01 10:00:00").unwrap();

        let all = store.list().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].form.first_name, "Ravi");
        assert_eq!(all[0].hkf_id.as_deref(), Some("HKF-0002"));
        assert_eq!(all[0].year(), "2025");
        assert_eq!(all[1].status, SubmissionStatus::Pending);
        assert_eq!(all[1].status.badge(), "NEW");
    }

    #[test]
    fn review_decision_is_persisted() {
        let (_dir, store) = store();
        store.save(&form("Asha"), None).unwrap();
        assert!(store.update_status(1, SubmissionStatus::Approved, "Welcome").unwrap());

        let record = store.get(1).unwrap().unwrap();
        assert_eq!(record.status, SubmissionStatus::Approved);
        assert_eq!(record.comments.as_deref(), Some("Welcome"));
        assert_eq!(record.form.iban, "DE29123456789012345678");
    }

    #[test]
    fn missing_rows() {
        let (_dir, store) = store();
        assert!(!store.update_status(42, SubmissionStatus::Rejected, "").unwrap());
        assert!(store.get(42).unwrap().is_none());
    }

    #[test]
    fn legacy_rows_without_number_or_status() {
        let (_dir, store) = store();
        let conn = Connection::open(store.path()).unwrap();
        conn.execute(
            "INSERT INTO submissions (form_json, status) VALUES (?1, ?2)",
            params![r#"{"firstName":"Old"}"#, " PENDING "],
        )
        .unwrap();

        let record = store.get(1).unwrap().unwrap();
        assert_eq!(record.display_id(), "ID-1");
        assert_eq!(record.year(), "Legacy");
        assert_eq!(record.status, SubmissionStatus::Pending);
        assert_eq!(record.form.first_name, "Old");
    }
}
