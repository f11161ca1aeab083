use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatterError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Source file not found: {path}")]
    SourceMissing { path: String },

    #[error("Failed to copy '{from}' to '{to}': {source}")]
    CopyFailed {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Template error: {message}")]
    TemplateError { message: String },

    #[error("Unresolved placeholder '{{{{{name}}}}}' in template")]
    UnresolvedPlaceholder { name: String },

    #[error("Renderer '{command}' could not be started: {reason}")]
    RendererNotFound { command: String, reason: String },

    #[error("Renderer '{command}' failed on '{script}' (exit code {code:?}): {stderr}")]
    RenderFailed {
        command: String,
        script: String,
        code: Option<i32>,
        stderr: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Template,
    Rendering,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FormatterError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FormatterError::ConfigValidationError { .. }
            | FormatterError::InvalidConfigValueError { .. }
            | FormatterError::MissingConfigError { .. } => ErrorCategory::Configuration,
            FormatterError::SourceMissing { .. }
            | FormatterError::CopyFailed { .. }
            | FormatterError::CsvError(_) => ErrorCategory::Input,
            FormatterError::TemplateError { .. } | FormatterError::UnresolvedPlaceholder { .. } => {
                ErrorCategory::Template
            }
            FormatterError::RendererNotFound { .. } | FormatterError::RenderFailed { .. } => {
                ErrorCategory::Rendering
            }
            FormatterError::ZipError(_)
            | FormatterError::IoError(_)
            | FormatterError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 單一組合失敗，其它組合仍可繼續
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Rendering => match self {
                FormatterError::RendererNotFound { .. } => ErrorSeverity::Critical,
                _ => ErrorSeverity::Medium,
            },
            ErrorCategory::Configuration | ErrorCategory::Template => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            FormatterError::SourceMissing { path } => format!(
                "Check that the simulation sweep has finished and '{}' exists in the working directory",
                path
            ),
            FormatterError::CopyFailed { to, .. } => {
                format!("Check write permissions for '{}'", to)
            }
            FormatterError::RendererNotFound { command, .. } => format!(
                "Install '{}' or pass --renderer with the path to a gnuplot executable",
                command
            ),
            FormatterError::RenderFailed { script, .. } => format!(
                "Run the renderer on '{}' by hand to inspect the error",
                script
            ),
            FormatterError::UnresolvedPlaceholder { name } => format!(
                "Remove '{{{{{}}}}}' from the template or use one of the supported placeholders",
                name
            ),
            FormatterError::TemplateError { .. } => {
                "Check the template file referenced by the configuration".to_string()
            }
            FormatterError::ConfigValidationError { field, .. }
            | FormatterError::InvalidConfigValueError { field, .. }
            | FormatterError::MissingConfigError { field } => {
                format!("Fix the '{}' entry in the configuration file", field)
            }
            FormatterError::CsvError(_) => {
                "Check that the data file is comma separated".to_string()
            }
            FormatterError::ZipError(_) | FormatterError::IoError(_) => {
                "Check disk space and permissions in the working directory".to_string()
            }
            FormatterError::SerializationError(_) => {
                "Re-run with --verbose and report the failure".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Input problem: {}", self),
            ErrorCategory::Template => format!("Script template problem: {}", self),
            ErrorCategory::Rendering => format!("Plot rendering problem: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, FormatterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_source_is_recoverable() {
        let err = FormatterError::SourceMissing {
            path: "model0/Cell_age_distribution.eps".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.recovery_suggestion().contains("model0/Cell_age_distribution.eps"));
    }

    #[test]
    fn test_missing_renderer_is_critical() {
        let err = FormatterError::RendererNotFound {
            command: "gnuplot".to_string(),
            reason: "No such file or directory".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().starts_with("Plot rendering problem"));
    }

    #[test]
    fn test_unresolved_placeholder_message() {
        let err = FormatterError::UnresolvedPlaceholder {
            name: "colour".to_string(),
        };
        assert_eq!(err.to_string(), "Unresolved placeholder '{{colour}}' in template");
    }
}
