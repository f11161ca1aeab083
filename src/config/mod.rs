pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use super::toml_config::{FormatterConfig, Preset};
    use crate::core::engine::ErrorPolicy;
    use crate::utils::error::{FormatterError, Result};
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "crypt-plots")]
    #[command(about = "Relabel crypt proliferation sweep plots for publication")]
    pub struct CliConfig {
        /// Test output folder holding the sweep results (defaults to the current directory)
        pub work_dir: Option<PathBuf>,

        /// Built-in figure set to produce
        #[arg(long, value_enum, default_value_t = Preset::LiteratePaper)]
        pub preset: Preset,

        /// TOML file describing a custom figure set (overrides --preset)
        #[arg(short, long)]
        pub config: Option<PathBuf>,

        /// Plotting program to invoke on each generated script
        #[arg(long)]
        pub renderer: Option<String>,

        #[arg(long, help = "Copy data and write scripts without running the renderer")]
        pub skip_render: bool,

        #[arg(long, help = "Stop at the first failed plot")]
        pub fail_fast: bool,

        #[arg(long, help = "Show what would be produced without touching any file")]
        pub dry_run: bool,

        /// Zip archive (relative to the working directory) collecting the finished figures
        #[arg(long)]
        pub bundle: Option<String>,

        /// JSON run report (relative to the working directory)
        #[arg(long)]
        pub report: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,
    }

    impl CliConfig {
        pub fn work_dir(&self) -> PathBuf {
            self.work_dir.clone().unwrap_or_else(|| PathBuf::from("."))
        }

        pub fn error_policy(&self) -> ErrorPolicy {
            if self.fail_fast {
                ErrorPolicy::FailFast
            } else {
                ErrorPolicy::BestEffort
            }
        }

        /// 載入圖組設定並套用命令列覆蓋
        pub fn load_formatter_config(&self) -> Result<FormatterConfig> {
            let mut config = match &self.config {
                Some(path) => FormatterConfig::from_file(path)?,
                None => FormatterConfig::preset(self.preset)?,
            };

            if let Some(renderer) = &self.renderer {
                tracing::info!("🔧 Renderer overridden to: {}", renderer);
                config.renderer.command = renderer.clone();
            }

            Ok(config)
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            let work_dir = self.work_dir();
            validation::validate_path("work_dir", &work_dir.to_string_lossy())?;
            if !work_dir.is_dir() {
                return Err(FormatterError::ConfigValidationError {
                    field: "work_dir".to_string(),
                    message: format!("'{}' is not a directory", work_dir.display()),
                });
            }

            if let Some(bundle) = &self.bundle {
                validation::validate_path("bundle", bundle)?;
                if !bundle.ends_with(".zip") {
                    return Err(FormatterError::InvalidConfigValueError {
                        field: "bundle".to_string(),
                        value: bundle.clone(),
                        reason: "Bundle file name must end with .zip".to_string(),
                    });
                }
            }

            if let Some(report) = &self.report {
                validation::validate_path("report", report)?;
            }

            if let Some(renderer) = &self.renderer {
                validation::validate_non_empty_string("renderer", renderer)?;
            }

            Ok(())
        }
    }

}
