use crate::network::{CentralityMeasure, GraphKind};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extensions, validate_path, validate_positive_number, validate_range, validate_url,
    Validate,
};
use serde::{Deserialize, Serialize};

/// 資料集來源：本機目錄或 HTTP 基底網址
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DatasetSource {
    Local { path: String },
    Http {
        base_url: String,
        timeout_seconds: Option<u64>,
    },
}

impl DatasetSource {
    pub fn describe(&self) -> String {
        match self {
            DatasetSource::Local { path } => format!("local directory {}", path),
            DatasetSource::Http { base_url, .. } => format!("HTTP {}", base_url),
        }
    }
}

impl Validate for DatasetSource {
    fn validate(&self) -> Result<()> {
        match self {
            DatasetSource::Local { path } => validate_path("source.path", path),
            DatasetSource::Http { base_url, .. } => validate_url("source.base_url", base_url),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetFiles {
    #[serde(default = "default_recipes_file")]
    pub recipes: String,
    #[serde(default = "default_ingredients_file")]
    pub ingredients: String,
    #[serde(default = "default_compound_file")]
    pub compound_ingredients: Option<String>,
    #[serde(default = "default_relations_file")]
    pub recipe_ingredients: String,
}

fn default_recipes_file() -> String {
    "01_Recipe_Details.json".to_string()
}

fn default_ingredients_file() -> String {
    "02_Ingredients.json".to_string()
}

fn default_compound_file() -> Option<String> {
    Some("03_Compound_Ingredients.json".to_string())
}

fn default_relations_file() -> String {
    "04_Recipe-Ingredients_Aliases.json".to_string()
}

impl Default for DatasetFiles {
    fn default() -> Self {
        Self {
            recipes: default_recipes_file(),
            ingredients: default_ingredients_file(),
            compound_ingredients: default_compound_file(),
            recipe_ingredients: default_relations_file(),
        }
    }
}

impl DatasetFiles {
    /// 以相同檔名但不同副檔名建立檔案設定 (例如 csv)
    pub fn with_extension(extension: &str) -> Self {
        let swap = |name: String| match name.rsplit_once('.') {
            Some((stem, _)) => format!("{}.{}", stem, extension),
            None => format!("{}.{}", name, extension),
        };
        let defaults = Self::default();
        Self {
            recipes: swap(defaults.recipes),
            ingredients: swap(defaults.ingredients),
            compound_ingredients: defaults.compound_ingredients.map(swap),
            recipe_ingredients: swap(defaults.recipe_ingredients),
        }
    }

    pub fn all(&self) -> Vec<&str> {
        let mut files = vec![self.recipes.as_str(), self.ingredients.as_str()];
        // 空字串表示不讀取複合食材檔
        if let Some(compound) = self.compound_ingredients.as_deref().filter(|c| !c.trim().is_empty()) {
            files.push(compound);
        }
        files.push(self.recipe_ingredients.as_str());
        files
    }
}

impl Validate for DatasetFiles {
    fn validate(&self) -> Result<()> {
        validate_file_extensions("source.files", &self.all(), &["json", "csv"])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub uncommon_threshold: usize,
    pub similarity_threshold: f64,
    pub top_n: usize,
    pub graph_kind: GraphKind,
    pub min_edge_weight: u32,
    pub centrality_measures: Vec<CentralityMeasure>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            uncommon_threshold: 5,
            similarity_threshold: 0.5,
            top_n: 10,
            graph_kind: GraphKind::Cooccurrence,
            min_edge_weight: 1,
            centrality_measures: CentralityMeasure::ALL.to_vec(),
        }
    }
}

impl Validate for AnalysisSettings {
    fn validate(&self) -> Result<()> {
        validate_positive_number("settings.uncommon_threshold", self.uncommon_threshold, 1)?;
        validate_range(
            "settings.similarity_threshold",
            self.similarity_threshold,
            0.0,
            1.0,
        )?;
        validate_positive_number("settings.top_n", self.top_n, 1)?;
        validate_positive_number("settings.min_edge_weight", self.min_edge_weight as usize, 1)?;
        Ok(())
    }
}
