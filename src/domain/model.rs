use crate::utils::lenient::{deserialize_lenient_field, deserialize_lenient_id};
use crate::utils::time::{deserialize_lenient, parse_iso};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw JSON record as returned by the Canvas API.
pub type RawRecord = serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub workflow_state: String,
    pub enrollment_term_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Term {
    pub id: i64,
    pub name: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermSummary {
    pub term: Term,
    pub course_count: usize,
    pub current: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Submission {
    pub workflow_state: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub graded_at: Option<DateTime<Utc>>,
    pub score: Option<f64>,
    pub late: bool,
    pub missing: bool,
    /// Canvas 給了非空的 submitted_at（即使格式無法解析）
    #[serde(skip)]
    has_submitted_stamp: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub id: i64,
    pub title: String,
    pub course_name: String,
    pub url: Option<String>,
    pub points: Option<f64>,
    pub published: bool,
    pub due_at: Option<DateTime<Utc>>,
    pub submission: Option<Submission>,
}

/// Whether dateless assignments belong in the upcoming bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpcomingView {
    /// Windowed view: only assignments with a due date are reported.
    #[default]
    DatedOnly,
    /// Dateless assignments are listed last under upcoming.
    IncludeUndated,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentReport {
    pub generated_at: DateTime<Utc>,
    pub window_days: u32,
    pub view: UpcomingView,
    pub overdue: Vec<Assignment>,
    pub upcoming: Vec<Assignment>,
}

const SUBMITTED_STATES: [&str; 3] = ["submitted", "graded", "pending_review"];

#[derive(Debug, Deserialize)]
struct RawCourse {
    #[serde(default, deserialize_with = "deserialize_lenient_id")]
    id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_field")]
    name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_field")]
    workflow_state: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_id")]
    enrollment_term_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawTerm {
    #[serde(default, deserialize_with = "deserialize_lenient_id")]
    id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_field")]
    name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    start_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    end_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawAssignment {
    #[serde(default, deserialize_with = "deserialize_lenient_id")]
    id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_field")]
    name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_field")]
    html_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_field")]
    points_possible: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_field")]
    published: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    due_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient_field")]
    submission: Option<RawSubmission>,
}

#[derive(Debug, Deserialize)]
struct RawSubmission {
    #[serde(default, deserialize_with = "deserialize_lenient_field")]
    workflow_state: Option<String>,
    #[serde(default)]
    submitted_at: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    graded_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient_field")]
    score: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_field")]
    late: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_lenient_field")]
    missing: Option<bool>,
}

impl Course {
    /// Builds a course from a raw `/courses` record. Records without an id are rejected.
    pub fn from_api(record: &RawRecord) -> Option<Self> {
        let raw = match RawCourse::deserialize(record) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!("Skipping malformed course record: {}", e);
                return None;
            }
        };
        let id = raw.id?;

        Some(Self {
            id,
            name: raw.name.unwrap_or_default(),
            workflow_state: raw.workflow_state.unwrap_or_default(),
            enrollment_term_id: raw.enrollment_term_id,
        })
    }
}

impl Term {
    /// Reads the `term` object embedded in a course record (`include[]=term`).
    pub fn from_course_record(record: &RawRecord) -> Option<Self> {
        let term = record.get("term")?;
        if !term.is_object() {
            return None;
        }
        let raw = RawTerm::deserialize(term).ok()?;

        Some(Self {
            id: raw.id?,
            name: raw.name,
            start_at: raw.start_at,
            end_at: raw.end_at,
        })
    }

    /// `start_at <= now` and, when an end is known, `now <= end_at`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        match (self.start_at, self.end_at) {
            (Some(start), Some(end)) => start <= now && now <= end,
            (Some(start), None) => start <= now,
            (None, _) => false,
        }
    }
}

impl Submission {
    fn from_raw(raw: RawSubmission) -> Self {
        let has_submitted_stamp = match &raw.submitted_at {
            Some(serde_json::Value::String(s)) => !s.trim().is_empty(),
            Some(serde_json::Value::Null) | None => false,
            Some(_) => true,
        };
        let submitted_at = raw
            .submitted_at
            .as_ref()
            .and_then(|v| v.as_str())
            .and_then(|s| parse_iso(Some(s)));

        Self {
            workflow_state: raw.workflow_state,
            submitted_at,
            graded_at: raw.graded_at,
            score: raw.score,
            late: raw.late.unwrap_or(false),
            missing: raw.missing.unwrap_or(false),
            has_submitted_stamp,
        }
    }

    pub fn is_submitted(&self) -> bool {
        if self.has_submitted_stamp || self.submitted_at.is_some() {
            return true;
        }
        self.workflow_state.as_deref().is_some_and(|state| {
            SUBMITTED_STATES
                .iter()
                .any(|s| s.eq_ignore_ascii_case(state.trim()))
        })
    }
}

impl Assignment {
    pub fn from_api(record: &RawRecord, course_name: &str) -> Option<Self> {
        let raw = match RawAssignment::deserialize(record) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!("Skipping malformed assignment record: {}", e);
                return None;
            }
        };
        let id = raw.id?;

        Some(Self {
            id,
            title: raw.name.unwrap_or_else(|| "Untitled".to_string()),
            course_name: course_name.to_string(),
            url: raw.html_url,
            points: raw.points_possible,
            published: raw.published.unwrap_or(false),
            due_at: raw.due_at,
            submission: raw.submission.map(Submission::from_raw),
        })
    }

    pub fn is_submitted(&self) -> bool {
        self.submission.as_ref().is_some_and(Submission::is_submitted)
    }
}
