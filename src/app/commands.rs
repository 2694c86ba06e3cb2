use crate::core::service::{AssignmentQuery, CourseService};
use crate::core::{CanvasClient, Presenter};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

/// A parsed command, independent of how it was entered.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandRequest {
    ListCourses { include_archived: bool },
    ListTerms,
    ShowAssignments(AssignmentQuery),
}

impl CommandRequest {
    pub fn name(&self) -> &'static str {
        match self {
            CommandRequest::ListCourses { .. } => "list-courses",
            CommandRequest::ListTerms => "list-terms",
            CommandRequest::ShowAssignments(_) => "show-assignments",
        }
    }
}

/// 執行一個指令：抓取、篩選、分類後交給 presenter
pub async fn run_command<C: CanvasClient>(
    request: CommandRequest,
    service: &CourseService<C>,
    presenter: &mut dyn Presenter,
    now: DateTime<Utc>,
) -> Result<()> {
    tracing::info!("▶️ Running {}", request.name());

    match request {
        CommandRequest::ListCourses { include_archived } => {
            let courses = service.list_courses_at(include_archived, now).await?;
            presenter.display_courses(&courses)
        }
        CommandRequest::ListTerms => {
            let terms = service.list_terms(now).await?;
            presenter.display_terms(&terms)
        }
        CommandRequest::ShowAssignments(query) => {
            let report = service.assignment_report(&query, now).await?;
            presenter.display_assignments(&report)
        }
    }
}
