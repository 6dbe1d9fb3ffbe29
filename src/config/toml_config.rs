use super::settings::{AnalysisSettings, DatasetFiles, DatasetSource};
use super::{DEFAULT_ARCHIVE_NAME, OUTPUT_FORMATS};
use crate::core::ConfigProvider;
use crate::loader::FileType;
use crate::utils::error::{AnalysisError, Result};
use crate::utils::validation::{
    validate_file_extensions, validate_non_empty_string, validate_one_of, validate_path, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub analysis: AnalysisInfo,
    pub source: DatasetSource,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub settings: AnalysisSettings,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// 未指定時依 recipes 檔名推斷
    pub file_type: Option<FileType>,
    #[serde(flatten)]
    pub files: DatasetFiles,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

fn default_output_formats() -> Vec<String> {
    OUTPUT_FORMATS.iter().map(|f| f.to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    #[serde(default = "default_archive_name")]
    pub filename: String,
}

fn default_archive_name() -> String {
    DEFAULT_ARCHIVE_NAME.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AnalysisError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AnalysisError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AnalysisError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("analysis.name", &self.analysis.name)?;
        validate_non_empty_string("analysis.version", &self.analysis.version)?;

        self.source.validate()?;
        self.dataset.files.validate()?;
        self.settings.validate()?;

        // 驗證輸出路徑
        validate_path("load.output_path", &self.load.output_path)?;

        // 驗證輸出格式
        for format in &self.load.output_formats {
            validate_one_of("load.output_formats", format, &OUTPUT_FORMATS)?;
        }

        if let Some(compression) = self.load.compression.as_ref().filter(|c| c.enabled) {
            validate_file_extensions(
                "load.compression.filename",
                &[compression.filename.as_str()],
                &["zip"],
            )?;
        }

        Ok(())
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn source(&self) -> &DatasetSource {
        &self.source
    }

    fn dataset_files(&self) -> &DatasetFiles {
        &self.dataset.files
    }

    fn file_type(&self) -> FileType {
        self.dataset
            .file_type
            .or_else(|| FileType::from_extension(&self.dataset.files.recipes).ok())
            .unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn archive_name(&self) -> Option<&str> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }

    fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{CentralityMeasure, GraphKind};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[analysis]
name = "culinary-network"
description = "Ingredient co-occurrence"
version = "1.0.0"

[source]
type = "local"
path = "./database"

[load]
output_path = "./test-output"
output_formats = ["csv", "json"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.analysis.name, "culinary-network");
        assert_eq!(config.source.describe(), "local directory ./database");
        assert_eq!(config.dataset_files(), &DatasetFiles::default());
        assert_eq!(config.file_type(), FileType::Json);
        assert_eq!(config.settings(), &AnalysisSettings::default());
        assert_eq!(config.archive_name(), None);
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config_sections() {
        let toml_content = r#"
[analysis]
name = "cuisines"
version = "2"

[source]
type = "http"
base_url = "https://data.example.com/culinarydb/"
timeout_seconds = 10

[dataset]
recipes = "recipes.csv"
ingredients = "ingredients.csv"
recipe_ingredients = "aliases.csv"

[settings]
graph_kind = "cuisine_ingredient"
top_n = 3
centrality_measures = ["degree", "pagerank"]

[load]
output_path = "./out"

[load.compression]
enabled = true

[monitoring]
enabled = true
log_level = "debug"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.file_type(), FileType::Csv);
        assert_eq!(config.dataset_files().recipes, "recipes.csv");
        // 未覆寫的欄位沿用預設值
        assert_eq!(
            config.dataset_files().compound_ingredients.as_deref(),
            Some("03_Compound_Ingredients.json")
        );
        assert_eq!(config.settings().graph_kind, GraphKind::CuisineIngredient);
        assert_eq!(config.settings().top_n, 3);
        assert_eq!(config.settings().uncommon_threshold, 5);
        assert_eq!(
            config.settings().centrality_measures,
            vec![CentralityMeasure::Degree, CentralityMeasure::PageRank]
        );
        assert_eq!(config.output_formats(), ["json", "csv"]);
        assert_eq!(config.archive_name(), Some(DEFAULT_ARCHIVE_NAME));
        assert!(config.monitoring_enabled());
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CUISINE_NET_TEST_DATA_DIR", "/srv/culinarydb");

        let toml_content = r#"
[analysis]
name = "test"
version = "1.0"

[source]
type = "local"
path = "${CUISINE_NET_TEST_DATA_DIR}"

[load]
output_path = "${CUISINE_NET_TEST_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.source,
            DatasetSource::Local {
                path: "/srv/culinarydb".to_string()
            }
        );
        assert_eq!(config.load.output_path, "${CUISINE_NET_TEST_UNSET_VAR}");

        std::env::remove_var("CUISINE_NET_TEST_DATA_DIR");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[analysis]
name = "test"
version = "1.0"

[source]
type = "http"
base_url = "invalid-url"

[load]
output_path = "./output"
output_formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let bad_format = toml_content
            .replace("invalid-url", "https://example.com")
            .replace("[\"csv\"]", "[\"tsv\"]");
        let config = TomlConfig::from_toml_str(&bad_format).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_source_type_is_rejected() {
        let toml_content = r#"
[analysis]
name = "test"
version = "1.0"

[source]
type = "s3"
bucket = "recipes"

[load]
output_path = "./output"
"#;

        assert!(TomlConfig::from_toml_str(toml_content).is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[analysis]
name = "file-test"
version = "1.0"

[source]
type = "local"
path = "./database"

[load]
output_path = "./output"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.analysis.name, "file-test");
    }
}
