use thiserror::Error;

#[derive(Error, Debug)]
pub enum PulseError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned status {status} for {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Config file error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PulseError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PulseError::ApiError(_) | PulseError::HttpStatusError { .. } => ErrorCategory::Network,
            PulseError::SerializationError(_) => ErrorCategory::Data,
            PulseError::UrlError(_)
            | PulseError::TomlError(_)
            | PulseError::ConfigError { .. }
            | PulseError::MissingConfigError { .. }
            | PulseError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            PulseError::IoError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息（不含內部細節）
    pub fn user_friendly_message(&self) -> String {
        match self {
            PulseError::ApiError(_) => "Could not reach the Canvas API".to_string(),
            PulseError::HttpStatusError { status, .. } => match status {
                401 => "Canvas rejected the access token".to_string(),
                403 => "The access token is not allowed to read this data".to_string(),
                404 => "Canvas could not find the requested resource".to_string(),
                _ => format!("Canvas answered with HTTP {}", status),
            },
            PulseError::MissingConfigError { field } => {
                format!("Missing required setting: {}", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PulseError::ApiError(_) => {
                "Check your network connection and the configured base URL".to_string()
            }
            PulseError::HttpStatusError { status: 401, .. } => {
                "Generate a new token under Canvas > Account > Settings".to_string()
            }
            PulseError::HttpStatusError { .. } => "Retry later or verify the base URL".to_string(),
            PulseError::MissingConfigError { field } if field == "CANVAS_TOKEN" => {
                "Set CANVAS_TOKEN in your environment or in a .env file".to_string()
            }
            PulseError::MissingConfigError { field } => {
                format!("Provide {} via the config file or environment", field)
            }
            PulseError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of {} and run again", field)
            }
            PulseError::TomlError(_) => "Make sure the config file is valid TOML".to_string(),
            PulseError::UrlError(_) => "Use an absolute http(s) base URL".to_string(),
            PulseError::ConfigError { .. } => "Review your configuration".to_string(),
            PulseError::SerializationError(_) => {
                "The API returned unexpected data; run with --verbose for details".to_string()
            }
            PulseError::IoError(_) => {
                "Check that the output stream is writable".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PulseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_is_configuration_error() {
        let err = PulseError::MissingConfigError {
            field: "CANVAS_TOKEN".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains(".env"));
    }

    #[test]
    fn test_output_failures_are_critical() {
        let err = PulseError::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
        assert_eq!(err.category(), ErrorCategory::Output);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.recovery_suggestion().contains("writable"));
    }

    #[test]
    fn test_status_error_messages() {
        let err = PulseError::HttpStatusError {
            status: 401,
            url: "https://canvas.test/api/v1/courses".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.user_friendly_message(), "Canvas rejected the access token");
        assert!(err.to_string().contains("401"));
    }
}
