use super::{fields, DataLoader, FileType};
use crate::config::settings::DatasetFiles;
use crate::domain::model::{CompoundIngredient, Dataset, Ingredient, Recipe, RecipeIngredient};
use crate::domain::ports::Storage;
use crate::utils::error::Result;

/// 透過 Storage 讀取四個資料檔並組成已連結的 Dataset
pub struct DatasetLoader<'a, S: Storage> {
    storage: &'a S,
    files: &'a DatasetFiles,
    file_type: FileType,
}

impl<'a, S: Storage> DatasetLoader<'a, S> {
    pub fn new(storage: &'a S, files: &'a DatasetFiles, file_type: FileType) -> Self {
        Self {
            storage,
            files,
            file_type,
        }
    }

    pub async fn load(&self) -> Result<Dataset> {
        let recipes: Vec<Recipe> = self
            .load_file(&self.files.recipes, fields::recipes())
            .await?;
        tracing::info!("🍲 Loaded {} recipes", recipes.len());

        let ingredients: Vec<Ingredient> = self
            .load_file(&self.files.ingredients, fields::ingredients())
            .await?;
        tracing::info!("🥕 Loaded {} ingredients", ingredients.len());

        let compound_ingredients = self.load_compound_ingredients().await?;

        let relations: Vec<RecipeIngredient> = self
            .load_file(&self.files.recipe_ingredients, fields::recipe_ingredients())
            .await?;
        tracing::info!("🔗 Loaded {} recipe-ingredient relations", relations.len());

        let mut dataset = Dataset::new(recipes, ingredients, compound_ingredients, relations);
        dataset.link_ingredients();
        Ok(dataset)
    }

    async fn load_compound_ingredients(&self) -> Result<Vec<CompoundIngredient>> {
        let path = match self.files.compound_ingredients.as_deref() {
            Some(path) if !path.trim().is_empty() => path,
            _ => return Ok(Vec::new()),
        };

        match self.load_file(path, fields::compound_ingredients()).await {
            Ok(compounds) => {
                let compounds: Vec<CompoundIngredient> = compounds;
                tracing::info!("🧂 Loaded {} compound ingredients", compounds.len());
                Ok(compounds)
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("⚠️ Compound ingredient file '{}' not found, skipping", path);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn load_file<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        field_map: Vec<super::FieldMapping>,
    ) -> Result<Vec<T>> {
        tracing::debug!("Reading dataset file: {}", path);
        let bytes = self.storage.read_file(path).await?;
        DataLoader::new(self.file_type)
            .with_field_map(field_map)
            .load_entities(&bytes)
    }
}
