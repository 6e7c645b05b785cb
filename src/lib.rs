pub mod apis;
pub mod common;
pub mod config;
pub mod logging;
pub mod pipeline;

pub use common::error::{Result, ScraperError};
pub use config::{CliArgs, Config};
pub use pipeline::{Pipeline, PipelineResult, TableOutcome};
