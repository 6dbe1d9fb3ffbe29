pub mod dataset;

pub use dataset::DatasetLoader;

use crate::domain::model::Record;
use crate::utils::error::{AnalysisError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum FileType {
    #[default]
    Json,
    Csv,
}

impl FileType {
    pub fn from_extension(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        extension.parse()
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileType::Json => "json",
            FileType::Csv => "csv",
        }
    }
}

impl FromStr for FileType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(FileType::Json),
            "csv" => Ok(FileType::Csv),
            other => Err(AnalysisError::UnsupportedFileType {
                file_type: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// 目標欄位 ← 來源欄位
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    pub field: String,
    pub key: String,
    pub required: bool,
}

impl FieldMapping {
    pub fn required(field: &str, key: &str) -> Self {
        Self {
            field: field.to_string(),
            key: key.to_string(),
            required: true,
        }
    }

    pub fn optional(field: &str, key: &str) -> Self {
        Self {
            field: field.to_string(),
            key: key.to_string(),
            required: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DataLoader {
    file_type: FileType,
    field_map: Option<Vec<FieldMapping>>,
}

impl DataLoader {
    pub fn new(file_type: FileType) -> Self {
        Self {
            file_type,
            field_map: None,
        }
    }

    pub fn with_field_map(mut self, field_map: Vec<FieldMapping>) -> Self {
        self.field_map = Some(field_map);
        self
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn load_records(&self, bytes: &[u8]) -> Result<Vec<Record>> {
        let raw = match self.file_type {
            FileType::Json => Self::parse_json(bytes)?,
            FileType::Csv => Self::parse_csv(bytes)?,
        };
        tracing::debug!("Parsed {} {} records", raw.len(), self.file_type);

        match &self.field_map {
            None => Ok(raw),
            Some(field_map) => raw
                .into_iter()
                .enumerate()
                .map(|(index, record)| Self::map_fields(field_map, record, index))
                .collect(),
        }
    }

    pub fn load_entities<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<Vec<T>> {
        self.load_records(bytes)?
            .into_iter()
            .map(|record| {
                let object: serde_json::Map<String, serde_json::Value> =
                    record.data.into_iter().collect();
                serde_json::from_value(serde_json::Value::Object(object)).map_err(Into::into)
            })
            .collect()
    }

    fn parse_json(bytes: &[u8]) -> Result<Vec<Record>> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        let items = match value {
            serde_json::Value::Array(items) => items,
            other => {
                return Err(AnalysisError::ProcessingError {
                    message: format!(
                        "Expected a JSON array of objects, found {}",
                        json_kind(&other)
                    ),
                })
            }
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                serde_json::Value::Object(obj) => Ok(Record {
                    data: obj.into_iter().collect(),
                }),
                other => Err(AnalysisError::ProcessingError {
                    message: format!("Record {} is a {}, expected an object", index, json_kind(&other)),
                }),
            })
            .collect()
    }

    fn parse_csv(bytes: &[u8]) -> Result<Vec<Record>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(bytes);
        let headers = reader.headers()?.clone();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let data: HashMap<String, serde_json::Value> = headers
                .iter()
                .zip(row.iter())
                .map(|(header, value)| {
                    (
                        header.to_string(),
                        serde_json::Value::String(value.to_string()),
                    )
                })
                .collect();
            records.push(Record { data });
        }

        Ok(records)
    }

    fn map_fields(field_map: &[FieldMapping], mut record: Record, index: usize) -> Result<Record> {
        let mut data = HashMap::with_capacity(field_map.len());
        for mapping in field_map {
            match record.data.remove(&mapping.key) {
                Some(value) => {
                    data.insert(mapping.field.clone(), value);
                }
                None if mapping.required => {
                    return Err(AnalysisError::MissingFieldError {
                        key: mapping.key.clone(),
                        index,
                    });
                }
                None => {
                    data.insert(mapping.field.clone(), serde_json::Value::Null);
                }
            }
        }
        Ok(Record { data })
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// 四個資料檔的預設欄位對應
pub mod fields {
    use super::FieldMapping;

    pub fn recipes() -> Vec<FieldMapping> {
        vec![
            FieldMapping::required("recipe_id", "Recipe ID"),
            FieldMapping::required("title", "Title"),
            FieldMapping::required("source", "Source"),
            FieldMapping::required("cuisine", "Cuisine"),
        ]
    }

    pub fn ingredients() -> Vec<FieldMapping> {
        vec![
            FieldMapping::required("entity_id", "Entity ID"),
            FieldMapping::required("category", "Category"),
            FieldMapping::required("synonyms", "Ingredient Synonyms"),
            FieldMapping::required("aliased_name", "Aliased Ingredient Name"),
        ]
    }

    pub fn compound_ingredients() -> Vec<FieldMapping> {
        vec![
            FieldMapping::required("aliased_name", "Compound Ingredient Name"),
            FieldMapping::required("synonyms", "Compound Ingredient Synonyms"),
            FieldMapping::required("entity_id", "entity_id"),
            FieldMapping::required("constituents", "Contituent Ingredients"),
            FieldMapping::required("category", "Category"),
        ]
    }

    pub fn recipe_ingredients() -> Vec<FieldMapping> {
        vec![
            FieldMapping::required("recipe_id", "Recipe ID"),
            FieldMapping::required("entity_id", "Entity ID"),
            FieldMapping::optional("original_name", "Original Ingredient Name"),
            FieldMapping::optional("aliased_name", "Aliased Ingredient Name"),
        ]
    }
}
