use crate::app::commands::CommandRequest;
use crate::config::{AppConfig, ConfigOverrides};
use crate::core::service::AssignmentQuery;
use crate::domain::model::UpcomingView;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "canvas-pulse", version)]
#[command(about = "List upcoming and recently overdue Canvas assignments")]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./canvas-pulse.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Canvas base URL, e.g. https://school.instructure.com/
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Disable ANSI colours
    #[arg(long, global = true)]
    pub no_color: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List the courses of the current term
    ListCourses {
        /// Include archived/ended courses
        #[arg(long)]
        include_archived: bool,
    },
    /// List the enrollment terms referenced by your courses
    ListTerms,
    /// Show unsubmitted assignments that are overdue or upcoming
    ShowAssignments {
        /// Show overdue items up to N days late
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=365))]
        window_days: Option<u32>,

        /// Restrict to specific course id(s); repeatable
        #[arg(long = "course-id")]
        course_ids: Vec<i64>,

        /// Also list assignments without a due date under upcoming
        #[arg(long)]
        include_undated: bool,
    },
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            color: self.no_color.then_some(false),
        }
    }
}

impl Command {
    pub fn into_request(self, config: &AppConfig) -> CommandRequest {
        match self {
            Command::ListCourses { include_archived } => {
                CommandRequest::ListCourses { include_archived }
            }
            Command::ListTerms => CommandRequest::ListTerms,
            Command::ShowAssignments {
                window_days,
                course_ids,
                include_undated,
            } => CommandRequest::ShowAssignments(AssignmentQuery {
                window_days: window_days.unwrap_or(config.overdue_window_days),
                view: if include_undated {
                    UpcomingView::IncludeUndated
                } else {
                    UpcomingView::DatedOnly
                },
                only_course_ids: course_ids,
            }),
        }
    }
}
