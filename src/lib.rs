pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{Cli, Command, OutputFormat};

pub use crate::adapters::{
    CanvasHttpClient, ConsolePresenter, InMemoryCanvas, JsonPresenter, PresenterConfig,
};
pub use crate::app::{run_command, CommandRequest};
pub use crate::config::AppConfig;
pub use crate::core::service::{AssignmentQuery, CourseService, Exclusions};
pub use crate::utils::error::{PulseError, Result};
