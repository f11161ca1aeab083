pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::cli::LocalStorage;
pub use config::toml_config::{FormatterConfig, Preset};
pub use core::{
    engine::{ErrorPolicy, FormatterEngine},
    pipeline::PublicationPipeline,
    renderer::GnuplotRenderer,
};
pub use utils::error::{FormatterError, Result};
