use crate::domain::model::{AssignmentReport, Course, RawRecord, TermSummary};
use crate::utils::error::Result;
use async_trait::async_trait;

pub type QueryParam = (String, String);

/// One response of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// A JSON array, or a single object for non-list endpoints.
    pub body: RawRecord,
    /// Absolute URL of the `rel="next"` link, if any.
    pub next: Option<String>,
}

#[async_trait]
pub trait CanvasClient: Send + Sync {
    /// Turns an API path such as `/api/v1/courses` into a request URL.
    fn resolve_url(&self, path: &str) -> Result<String>;

    /// Fetches exactly one page. Any transport problem is an `Err`.
    async fn fetch_page(&self, url: &str, params: Option<&[QueryParam]>) -> Result<Page>;

    /// Follows `next` links and returns every record in page order.
    ///
    /// A failing page ends the walk and keeps what was already collected.
    /// Only an unresolvable `path` is reported as an error.
    async fn get_paginated(&self, path: &str, params: &[QueryParam]) -> Result<Vec<RawRecord>> {
        crate::core::pagination::fetch_all(self, path, params).await
    }
}

pub trait Presenter {
    fn display_courses(&mut self, courses: &[Course]) -> Result<()>;
    fn display_terms(&mut self, terms: &[TermSummary]) -> Result<()>;
    fn display_assignments(&mut self, report: &AssignmentReport) -> Result<()>;
}
