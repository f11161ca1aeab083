pub mod bundle;
pub mod engine;
pub mod naming;
pub mod pipeline;
pub mod renderer;
pub mod template;

pub use crate::domain::model::{PlotJob, RunReport};
pub use crate::domain::ports::{Pipeline, Renderer, Storage};
pub use crate::utils::error::Result;
