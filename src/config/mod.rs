#[cfg(feature = "cli")]
pub mod cli;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliArgs, CliConfig};
pub use settings::{AnalysisSettings, DatasetFiles, DatasetSource};
pub use toml_config::TomlConfig;

/// 合法的輸出格式
pub const OUTPUT_FORMATS: [&str; 2] = ["json", "csv"];

/// 未指定檔名時的 ZIP 輸出名稱
pub const DEFAULT_ARCHIVE_NAME: &str = "analysis_output.zip";
