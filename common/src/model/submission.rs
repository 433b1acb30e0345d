use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::model::membership::MembershipForm;

/// Review state of a persisted application.
///
/// Records written before the review workflow existed carry no status at all;
/// an unset or empty status reads as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }

    /// Lenient parse used for stored values: trimmed and case-insensitive.
    /// Anything that is not approved or rejected is still awaiting review.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("approved") => SubmissionStatus::Approved,
            Some("rejected") => SubmissionStatus::Rejected,
            _ => SubmissionStatus::Pending,
        }
    }

    /// Strict parse used for administrator input.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "new" | "pending" => Some(SubmissionStatus::Pending),
            "approved" => Some(SubmissionStatus::Approved),
            "rejected" => Some(SubmissionStatus::Rejected),
            _ => None,
        }
    }

    /// Badge text shown in the dashboard table.
    pub fn badge(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "NEW",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SubmissionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(SubmissionStatus::from_stored(raw.as_deref()))
    }
}

/// A persisted application as listed in the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Row id assigned by the store.
    pub id: i64,
    /// Membership number issued on first save, e.g. `HKF-0007`.
    #[serde(default)]
    pub hkf_id: Option<String>,
    #[serde(flatten)]
    pub form: MembershipForm,
    /// Signature image as a data URL.
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub status: SubmissionStatus,
    /// Internal comment left by the reviewing administrator.
    #[serde(default)]
    pub comments: Option<String>,
    /// `YYYY-MM-DD HH:MM:SS` timestamp of the first save.
    #[serde(default, rename = "created_at")]
    pub created_at: Option<String>,
}

impl Submission {
    /// Identifier shown to administrators: the membership number, or the row
    /// id for legacy records saved without one.
    pub fn display_id(&self) -> String {
        match &self.hkf_id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => format!("ID-{}", self.id),
        }
    }

    /// Year the application was submitted, `Legacy` when unknown.
    pub fn year(&self) -> String {
        self.created_at
            .as_deref()
            .and_then(|ts| ts.split('-').next())
            .filter(|year| !year.is_empty())
            .unwrap_or("Legacy")
            .to_string()
    }
}

/// Dashboard tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Approved,
    Rejected,
}

impl StatusFilter {
    pub const TABS: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Pending,
        StatusFilter::Approved,
        StatusFilter::Rejected,
    ];

    pub fn matches(self, status: SubmissionStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == SubmissionStatus::Pending,
            StatusFilter::Approved => status == SubmissionStatus::Approved,
            StatusFilter::Rejected => status == SubmissionStatus::Rejected,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All Records",
            StatusFilter::Pending => "New/Pending",
            StatusFilter::Approved => "Approved",
            StatusFilter::Rejected => "Rejected",
        }
    }

    pub fn apply<'a>(self, submissions: &'a [Submission]) -> Vec<&'a Submission> {
        submissions.iter().filter(|s| self.matches(s.status)).collect()
    }
}

/// Counters shown on top of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Applications per submission year, sorted by year.
    pub by_year: BTreeMap<String, usize>,
}

impl SubmissionStats {
    pub fn collect(submissions: &[Submission]) -> Self {
        let mut stats = SubmissionStats {
            total: submissions.len(),
            ..Default::default()
        };
        for submission in submissions {
            match submission.status {
                SubmissionStatus::Pending => stats.pending += 1,
                SubmissionStatus::Approved => stats.approved += 1,
                SubmissionStatus::Rejected => stats.rejected += 1,
            }
            *stats.by_year.entry(submission.year()).or_insert(0) += 1;
        }
        stats
    }

    /// Bar height of `year` relative to the total, in percent, never below 10.
    pub fn year_share(&self, year: &str) -> f64 {
        let count = self.by_year.get(year).copied().unwrap_or(0);
        if self.total == 0 {
            return 10.0;
        }
        (count as f64 / self.total as f64 * 100.0).max(10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(id: i64, status: &str, created_at: Option<&str>) -> Submission {
        let json = serde_json::json!({
            "id": id,
            "firstName": "Asha",
            "lastName": "Rao",
            "status": status,
            "created_at": created_at,
        });
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn unset_and_odd_statuses_read_as_pending() {
        assert_eq!(SubmissionStatus::from_stored(None), SubmissionStatus::Pending);
        assert_eq!(SubmissionStatus::from_stored(Some("")), SubmissionStatus::Pending);
        assert_eq!(
            SubmissionStatus::from_stored(Some("  Pending ")),
            SubmissionStatus::Pending
        );
        assert_eq!(
            SubmissionStatus::from_stored(Some("APPROVED")),
            SubmissionStatus::Approved
        );

        let legacy: Submission = serde_json::from_str(r#"{"id":3,"status":null}"#).unwrap();
        assert_eq!(legacy.status, SubmissionStatus::Pending);
        let missing: Submission = serde_json::from_str(r#"{"id":4}"#).unwrap();
        assert_eq!(missing.status, SubmissionStatus::Pending);
    }

    #[test]
    fn admin_input_is_parsed_strictly() {
        assert_eq!(SubmissionStatus::parse("approved"), Some(SubmissionStatus::Approved));
        assert_eq!(SubmissionStatus::parse("new"), Some(SubmissionStatus::Pending));
        assert_eq!(SubmissionStatus::parse("archived"), None);
    }

    #[test]
    fn submission_json_flattens_the_form() {
        let s = submission(7, "approved", Some("2025-04-01 10:00:00"));
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["firstName"], "Asha");
        assert_eq!(json["status"], "approved");
        assert_eq!(json["created_at"], "2025-04-01 10:00:00");
    }

    #[test]
    fn display_id_prefers_membership_number() {
        let mut s = submission(12, "", None);
        assert_eq!(s.display_id(), "ID-12");
        s.hkf_id = Some("HKF-0012".into());
        assert_eq!(s.display_id(), "HKF-0012");
    }

    #[test]
    fn filters_and_stats_agree() {
        let all = vec![
            submission(1, "", Some("2024-02-01 09:00:00")),
            submission(2, "pending", Some("2025-01-10 09:00:00")),
            submission(3, "approved", Some("2025-03-10 09:00:00")),
            submission(4, "rejected", None),
        ];
        let stats = SubmissionStats::collect(&all);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.by_year.get("2025"), Some(&2));
        assert_eq!(stats.by_year.get("Legacy"), Some(&1));
        assert_eq!(stats.year_share("2025"), 50.0);

        assert_eq!(StatusFilter::Pending.apply(&all).len(), 2);
        assert_eq!(StatusFilter::All.apply(&all).len(), 4);
        assert_eq!(StatusFilter::Rejected.apply(&all)[0].id, 4);
    }
}
