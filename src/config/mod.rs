#[cfg(feature = "cli")]
pub mod cli;
pub mod file;

use crate::adapters::console::PresenterConfig;
use crate::core::service::Exclusions;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_required_field, validate_url, Validate,
};
use file::FileConfig;
use std::fmt;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://reykjavik.instructure.com/";
pub const DEFAULT_CONFIG_FILE: &str = "canvas-pulse.toml";
pub const DEFAULT_WINDOW_DAYS: u32 = 7;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_TITLE_WIDTH: usize = 48;

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub color: Option<bool>,
}

#[derive(Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub token: String,
    pub excluded_assignment_ids: Vec<i64>,
    pub excluded_course_ids: Vec<i64>,
    pub overdue_window_days: u32,
    pub request_timeout_seconds: u64,
    pub title_width: usize,
    pub color: bool,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("excluded_assignment_ids", &self.excluded_assignment_ids)
            .field("excluded_course_ids", &self.excluded_course_ids)
            .field("overdue_window_days", &self.overdue_window_days)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("title_width", &self.title_width)
            .field("color", &self.color)
            .finish()
    }
}

impl AppConfig {
    /// 載入順序：預設值 → TOML 檔 → 環境變數（含 .env）→ 命令列
    pub fn load(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        let file = match config_path {
            Some(path) => FileConfig::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                tracing::debug!("Using {}", DEFAULT_CONFIG_FILE);
                FileConfig::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => FileConfig::default(),
        };

        Self::resolve(file, |key| std::env::var(key).ok(), overrides)
    }

    /// Merges the layers and validates the result. `env` looks up environment variables.
    pub fn resolve<F>(file: FileConfig, env: F, overrides: &ConfigOverrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = overrides
            .base_url
            .clone()
            .or_else(|| env("CANVAS_BASE_URL").filter(|v| !v.trim().is_empty()))
            .or(file.canvas.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let token = env("CANVAS_TOKEN")
            .filter(|v| !v.is_empty())
            .or(file.canvas.token);
        let token = validate_required_field("CANVAS_TOKEN", &token)?.trim().to_string();

        let color = overrides
            .color
            .or_else(|| env("NO_COLOR").map(|_| false))
            .or(file.display.color)
            .unwrap_or(true);

        let config = Self {
            base_url,
            token,
            excluded_assignment_ids: file.filters.excluded_assignment_ids,
            excluded_course_ids: file.filters.excluded_course_ids,
            overdue_window_days: file.filters.overdue_window_days.unwrap_or(DEFAULT_WINDOW_DAYS),
            request_timeout_seconds: file
                .canvas
                .request_timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            title_width: file.display.title_width.unwrap_or(DEFAULT_TITLE_WIDTH),
            color,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn exclusions(&self) -> Exclusions {
        Exclusions {
            assignment_ids: self.excluded_assignment_ids.iter().copied().collect(),
            course_ids: self.excluded_course_ids.iter().copied().collect(),
        }
    }

    pub fn presenter_config(&self) -> PresenterConfig {
        PresenterConfig {
            color: self.color,
            title_width: self.title_width,
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        validate_non_empty_string("CANVAS_TOKEN", &self.token)?;
        validate_range("overdue_window_days", self.overdue_window_days, 0, 365)?;
        validate_range("request_timeout_seconds", self.request_timeout_seconds, 1, 600)?;
        validate_range("title_width", self.title_width, 8, 500)?;
        Ok(())
    }
}
