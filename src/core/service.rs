use crate::core::classify::{classify, is_relevant};
use crate::core::term::TermCatalog;
use crate::core::{CanvasClient, QueryParam, RawRecord};
use crate::domain::model::{Assignment, AssignmentReport, Course, TermSummary, UpcomingView};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

pub const COURSES_PATH: &str = "/api/v1/courses";
const PER_PAGE: &str = "100";

/// Ids the user never wants to see.
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    pub assignment_ids: HashSet<i64>,
    pub course_ids: HashSet<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentQuery {
    pub window_days: u32,
    pub view: UpcomingView,
    /// 非空時只查這些課程
    pub only_course_ids: Vec<i64>,
}

pub fn assignments_path(course_id: i64) -> String {
    format!("{}/{}/assignments", COURSES_PATH, course_id)
}

fn course_params() -> Vec<QueryParam> {
    vec![
        ("per_page".to_string(), PER_PAGE.to_string()),
        ("state[]".to_string(), "available".to_string()),
        ("include[]".to_string(), "term".to_string()),
    ]
}

fn assignment_params() -> Vec<QueryParam> {
    vec![
        ("per_page".to_string(), PER_PAGE.to_string()),
        ("include[]".to_string(), "submission".to_string()),
    ]
}

/// Course and assignment use cases on top of a [`CanvasClient`].
pub struct CourseService<C: CanvasClient> {
    client: C,
    exclusions: Exclusions,
}

impl<C: CanvasClient> CourseService<C> {
    pub fn new(client: C, exclusions: Exclusions) -> Self {
        Self { client, exclusions }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    async fn fetch_course_records(&self) -> Result<Vec<RawRecord>> {
        let records = self.client.get_paginated(COURSES_PATH, &course_params()).await?;
        Ok(records.into_iter().filter(|r| r.is_object()).collect())
    }

    pub async fn list_courses(&self, include_archived: bool) -> Result<Vec<Course>> {
        self.list_courses_at(include_archived, Utc::now()).await
    }

    /// 預設只回傳目前學期的課程；`include_archived` 時回傳全部
    ///
    /// When no current term can be inferred every fetched course is returned.
    pub async fn list_courses_at(
        &self,
        include_archived: bool,
        now: DateTime<Utc>,
    ) -> Result<Vec<Course>> {
        let records = self.fetch_course_records().await?;
        let courses: Vec<Course> = records.iter().filter_map(Course::from_api).collect();
        tracing::info!("📚 Fetched {} courses", courses.len());

        if include_archived {
            return Ok(courses);
        }

        let catalog = TermCatalog::from_course_records(&records);
        if catalog.is_empty() {
            tracing::debug!("Course records carry no term data");
        }
        let current_term = catalog.current_term_id(now);
        let in_term: Vec<Course> = match current_term {
            Some(term_id) => {
                tracing::info!("📅 Current term: {}", term_id);
                courses
                    .into_iter()
                    .filter(|c| c.enrollment_term_id == Some(term_id))
                    .collect()
            }
            None => {
                tracing::warn!("⚠️ Could not determine the current term, showing all courses");
                courses
            }
        };

        Ok(in_term
            .into_iter()
            .filter(|c| {
                let excluded = self.exclusions.course_ids.contains(&c.id);
                if excluded {
                    tracing::debug!("Skipping excluded course {} ({})", c.id, c.name);
                }
                !excluded
            })
            .collect())
    }

    pub async fn list_terms(&self, now: DateTime<Utc>) -> Result<Vec<TermSummary>> {
        let records = self.fetch_course_records().await?;
        Ok(TermCatalog::from_course_records(&records).summaries(now))
    }

    /// Unsubmitted, non-excluded assignments of the current term's courses
    /// that are relevant to the query's window and view.
    pub async fn get_unsubmitted_assignments(
        &self,
        query: &AssignmentQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<Assignment>> {
        let courses = self.list_courses_at(false, now).await?;
        let selected: Vec<Course> = courses
            .into_iter()
            .filter(|c| query.only_course_ids.is_empty() || query.only_course_ids.contains(&c.id))
            .collect();

        if selected.is_empty() {
            tracing::warn!("⚠️ No courses selected, nothing to fetch");
        }

        let mut assignments = Vec::new();
        for course in &selected {
            let path = assignments_path(course.id);
            let records = match self.client.get_paginated(&path, &assignment_params()).await {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!("⚠️ Skipping course {} ({}): {}", course.id, course.name, e);
                    continue;
                }
            };

            let course_name = if course.name.is_empty() {
                format!("Course {}", course.id)
            } else {
                course.name.clone()
            };

            let before = assignments.len();
            for record in &records {
                let Some(assignment) = Assignment::from_api(record, &course_name) else {
                    continue;
                };
                if self.exclusions.assignment_ids.contains(&assignment.id) {
                    tracing::debug!("Skipping excluded assignment {}", assignment.id);
                    continue;
                }
                if assignment.is_submitted() {
                    continue;
                }
                if !is_relevant(&assignment, now, query.window_days, query.view) {
                    continue;
                }
                assignments.push(assignment);
            }

            tracing::debug!(
                "{}: {} of {} assignments kept",
                course_name,
                assignments.len() - before,
                records.len()
            );
        }

        tracing::info!(
            "📝 {} unsubmitted assignments across {} courses",
            assignments.len(),
            selected.len()
        );
        Ok(assignments)
    }

    /// One fetch-filter-classify pass against a single `now`.
    pub async fn assignment_report(
        &self,
        query: &AssignmentQuery,
        now: DateTime<Utc>,
    ) -> Result<AssignmentReport> {
        let assignments = self.get_unsubmitted_assignments(query, now).await?;
        Ok(classify(assignments, now, query.window_days, query.view))
    }
}
