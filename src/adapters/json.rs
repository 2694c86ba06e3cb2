use crate::domain::model::{AssignmentReport, Course, TermSummary};
use crate::domain::ports::Presenter;
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;

/// Writes each result as one pretty-printed JSON document.
pub struct JsonPresenter<W: Write> {
    out: W,
}

impl JsonPresenter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit<T: Serialize>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, value)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct CoursesDocument<'a> {
    courses: &'a [Course],
}

#[derive(Serialize)]
struct TermsDocument<'a> {
    terms: &'a [TermSummary],
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn display_courses(&mut self, courses: &[Course]) -> Result<()> {
        self.emit(&CoursesDocument { courses })
    }

    fn display_terms(&mut self, terms: &[TermSummary]) -> Result<()> {
        self.emit(&TermsDocument { terms })
    }

    fn display_assignments(&mut self, report: &AssignmentReport) -> Result<()> {
        self.emit(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Assignment, UpcomingView};
    use chrono::{Duration, Utc};
    use serde_json::Value;

    #[test]
    fn test_courses_document() {
        let mut presenter = JsonPresenter::new(Vec::new());
        presenter
            .display_courses(&[Course {
                id: 1,
                name: "Algorithms".to_string(),
                workflow_state: "available".to_string(),
                enrollment_term_id: None,
            }])
            .unwrap();

        let doc: Value = serde_json::from_slice(&presenter.into_inner()).unwrap();
        assert_eq!(doc["courses"][0]["id"], 1);
        assert_eq!(doc["courses"][0]["enrollment_term_id"], Value::Null);
    }

    #[test]
    fn test_report_document() {
        let now = Utc::now();
        let report = AssignmentReport {
            generated_at: now,
            window_days: 7,
            view: UpcomingView::IncludeUndated,
            overdue: vec![],
            upcoming: vec![Assignment {
                id: 2,
                title: "Quiz".to_string(),
                course_name: "Algorithms".to_string(),
                url: None,
                points: None,
                published: false,
                due_at: Some(now + Duration::days(1)),
                submission: None,
            }],
        };

        let mut presenter = JsonPresenter::new(Vec::new());
        presenter.display_assignments(&report).unwrap();

        let doc: Value = serde_json::from_slice(&presenter.into_inner()).unwrap();
        assert_eq!(doc["view"], "include_undated");
        assert_eq!(doc["window_days"], 7);
        assert_eq!(doc["upcoming"][0]["title"], "Quiz");
        assert!(doc["overdue"].as_array().unwrap().is_empty());
    }
}
