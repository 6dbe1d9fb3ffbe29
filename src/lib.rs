pub mod adapters;
pub mod analysis;
pub mod config;
pub mod core;
pub mod domain;
pub mod loader;
pub mod network;
pub mod utils;

pub use adapters::{HttpStorage, LocalStorage, SourceStorage};
#[cfg(feature = "cli")]
pub use config::{CliArgs, CliConfig};
pub use config::TomlConfig;
pub use core::{engine::AnalysisEngine, pipeline::AnalysisPipeline};
pub use utils::error::{AnalysisError, Result};
