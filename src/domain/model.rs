use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// 原始資料列，欄位名稱對應到 JSON 值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(deserialize_with = "de::id")]
    pub recipe_id: String,
    #[serde(default, deserialize_with = "de::text")]
    pub title: String,
    #[serde(default, deserialize_with = "de::text")]
    pub source: String,
    #[serde(default, deserialize_with = "de::text")]
    pub cuisine: String,
    /// 組成食譜的食材 entity id，連結前為空
    #[serde(default, deserialize_with = "de::list")]
    pub ingredients: Vec<String>,
}

impl Recipe {
    /// 從關聯表中收集屬於此食譜的食材 id
    pub fn match_ingredients(&mut self, relations: &[RecipeIngredient]) {
        self.ingredients = relations
            .iter()
            .filter(|relation| relation.recipe_id == self.recipe_id)
            .map(|relation| relation.entity_id.clone())
            .collect();
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : {} ({}) from {}",
            self.recipe_id, self.title, self.cuisine, self.source
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(deserialize_with = "de::id")]
    pub entity_id: String,
    #[serde(default, deserialize_with = "de::text")]
    pub aliased_name: String,
    #[serde(default, deserialize_with = "de::list")]
    pub synonyms: Vec<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub category: String,
    #[serde(default, deserialize_with = "de::optional_text")]
    pub original_name: Option<String>,
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : {} ({}) Category: {}",
            self.entity_id,
            self.aliased_name,
            self.synonyms.join(", "),
            self.category
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompoundIngredient {
    #[serde(flatten)]
    pub ingredient: Ingredient,
    #[serde(default, deserialize_with = "de::list")]
    pub constituents: Vec<String>,
}

impl fmt::Display for CompoundIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Constituents: {}",
            self.ingredient,
            self.constituents.join(", ")
        )
    }
}

/// 食譜與食材的關聯
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    #[serde(deserialize_with = "de::id")]
    pub recipe_id: String,
    #[serde(deserialize_with = "de::id")]
    pub entity_id: String,
    #[serde(default, deserialize_with = "de::optional_text")]
    pub original_name: Option<String>,
    #[serde(default, deserialize_with = "de::optional_text")]
    pub aliased_name: Option<String>,
}

/// 已解析出食材名稱的食譜，供分析使用
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeProfile {
    pub recipe_id: String,
    pub title: String,
    pub cuisine: String,
    pub ingredients: Vec<String>,
}

impl RecipeProfile {
    pub fn ingredient_set(&self) -> HashSet<&str> {
        self.ingredients.iter().map(String::as_str).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub recipes: Vec<Recipe>,
    pub ingredients: Vec<Ingredient>,
    pub compound_ingredients: Vec<CompoundIngredient>,
    pub relations: Vec<RecipeIngredient>,
}

impl Dataset {
    pub fn new(
        recipes: Vec<Recipe>,
        ingredients: Vec<Ingredient>,
        compound_ingredients: Vec<CompoundIngredient>,
        relations: Vec<RecipeIngredient>,
    ) -> Self {
        Self {
            recipes,
            ingredients,
            compound_ingredients,
            relations,
        }
    }

    /// 依 recipe id 分組關聯，一次填入所有食譜的食材清單
    pub fn link_ingredients(&mut self) {
        let mut by_recipe: HashMap<&str, Vec<String>> = HashMap::new();
        for relation in &self.relations {
            by_recipe
                .entry(relation.recipe_id.as_str())
                .or_default()
                .push(relation.entity_id.clone());
        }

        for recipe in &mut self.recipes {
            if let Some(entity_ids) = by_recipe.remove(recipe.recipe_id.as_str()) {
                recipe.ingredients = entity_ids;
            }
        }
    }

    pub fn ingredients_for_recipe(&self, recipe_id: &str) -> Vec<&RecipeIngredient> {
        self.relations
            .iter()
            .filter(|relation| relation.recipe_id == recipe_id)
            .collect()
    }

    /// 食材在前、複合食材在後，同一 id 以第一筆為準
    fn named_entities(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients
            .iter()
            .chain(self.compound_ingredients.iter().map(|c| &c.ingredient))
    }

    /// entity id → 名稱，與 ingredient_name 相同的解析規則
    fn name_index(&self) -> HashMap<&str, &str> {
        let mut names = HashMap::new();
        for ingredient in self.named_entities() {
            names
                .entry(ingredient.entity_id.as_str())
                .or_insert(ingredient.aliased_name.as_str());
        }
        names
    }

    fn non_empty(name: &str) -> Option<&str> {
        Some(name).filter(|name| !name.trim().is_empty())
    }

    pub fn ingredient_name(&self, entity_id: &str) -> Option<&str> {
        self.named_entities()
            .find(|ingredient| ingredient.entity_id == entity_id)
            .and_then(|ingredient| Self::non_empty(&ingredient.aliased_name))
    }

    pub fn profiles(&self) -> Vec<RecipeProfile> {
        let names = self.name_index();
        let resolve = |entity_id: &str| {
            names
                .get(entity_id)
                .and_then(|name| Self::non_empty(name))
                .map(str::to_string)
        };

        let mut relations_by_recipe: HashMap<&str, Vec<&RecipeIngredient>> = HashMap::new();
        for relation in &self.relations {
            relations_by_recipe
                .entry(relation.recipe_id.as_str())
                .or_default()
                .push(relation);
        }

        self.recipes
            .iter()
            .map(|recipe| {
                let mut seen = HashSet::new();
                let mut ingredients = Vec::new();

                let resolved: Vec<String> = match relations_by_recipe.get(recipe.recipe_id.as_str()) {
                    Some(relations) => relations
                        .iter()
                        .map(|relation| {
                            resolve(relation.entity_id.as_str())
                                .or_else(|| relation.aliased_name.clone())
                                .unwrap_or_else(|| relation.entity_id.clone())
                        })
                        .collect(),
                    // 沒有關聯資料時退回食譜本身的 entity id 清單
                    None => recipe
                        .ingredients
                        .iter()
                        .map(|entity_id| resolve(entity_id.as_str()).unwrap_or_else(|| entity_id.clone()))
                        .collect(),
                };

                for name in resolved {
                    let name = name.trim();
                    if !name.is_empty() && seen.insert(name.to_string()) {
                        ingredients.push(name.to_string());
                    }
                }

                RecipeProfile {
                    recipe_id: recipe.recipe_id.clone(),
                    title: recipe.title.clone(),
                    cuisine: recipe.cuisine.clone(),
                    ingredients,
                }
            })
            .collect()
    }
}

/// 來源資料的欄位可能是數字、字串或逗號分隔字串，在此統一轉換
pub(crate) mod de {
    use super::*;
    use serde_json::Value;

    fn value_to_string(value: Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => Some(other.to_string()),
        }
    }

    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let value = Value::deserialize(deserializer)?;
        value_to_string(value)
            .map(|s| s.trim().to_string())
            .ok_or_else(|| serde::de::Error::custom("identifier cannot be null"))
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value_to_string(value).unwrap_or_default())
    }

    pub fn optional_text<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value_to_string(value).filter(|s| !s.trim().is_empty()))
    }

    pub fn list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let items: Vec<String> = match value {
            Value::Null => Vec::new(),
            Value::Array(values) => values.into_iter().filter_map(value_to_string).collect(),
            Value::String(s) => s.split(',').map(str::to_string).collect(),
            other => value_to_string(other).into_iter().collect(),
        };

        Ok(items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn relation(recipe_id: &str, entity_id: &str) -> RecipeIngredient {
        RecipeIngredient {
            recipe_id: recipe_id.to_string(),
            entity_id: entity_id.to_string(),
            ..Default::default()
        }
    }

    fn ingredient(entity_id: &str, name: &str) -> Ingredient {
        Ingredient {
            entity_id: entity_id.to_string(),
            aliased_name: name.to_string(),
            ..Default::default()
        }
    }

    fn recipe(recipe_id: &str, title: &str, cuisine: &str) -> Recipe {
        Recipe {
            recipe_id: recipe_id.to_string(),
            title: title.to_string(),
            source: "AllRecipes".to_string(),
            cuisine: cuisine.to_string(),
            ingredients: Vec::new(),
        }
    }

    #[test]
    fn test_recipe_display() {
        let r = recipe("1", "Pad Thai", "Thai");
        assert_eq!(r.to_string(), "1 : Pad Thai (Thai) from AllRecipes");
    }

    #[test]
    fn test_ingredient_display() {
        let mut i = ingredient("10", "rice noodle");
        i.synonyms = vec!["rice stick".to_string(), "pho noodle".to_string()];
        i.category = "Cereal".to_string();
        assert_eq!(
            i.to_string(),
            "10 : rice noodle (rice stick, pho noodle) Category: Cereal"
        );
    }

    #[test]
    fn test_match_ingredients_keeps_relation_order() {
        let relations = vec![relation("1", "30"), relation("2", "5"), relation("1", "7")];
        let mut r = recipe("1", "Pad Thai", "Thai");
        r.match_ingredients(&relations);
        assert_eq!(r.ingredients, vec!["30", "7"]);
    }

    #[test]
    fn test_link_ingredients_leaves_unmatched_recipes() {
        let mut lonely = recipe("3", "Toast", "British");
        lonely.ingredients = vec!["99".to_string()];
        let mut dataset = Dataset::new(
            vec![recipe("1", "Pad Thai", "Thai"), lonely],
            vec![],
            vec![],
            vec![relation("1", "30"), relation("1", "7")],
        );

        dataset.link_ingredients();

        assert_eq!(dataset.recipes[0].ingredients, vec!["30", "7"]);
        assert_eq!(dataset.recipes[1].ingredients, vec!["99"]);
        assert_eq!(dataset.ingredients_for_recipe("1").len(), 2);
        assert!(dataset.ingredients_for_recipe("3").is_empty());
    }

    #[test]
    fn test_ingredient_name_falls_back_to_compounds() {
        let dataset = Dataset::new(
            vec![],
            vec![ingredient("1", "garlic")],
            vec![CompoundIngredient {
                ingredient: ingredient("900", "garam masala"),
                constituents: vec!["cumin".to_string()],
            }],
            vec![],
        );

        assert_eq!(dataset.ingredient_name("1"), Some("garlic"));
        assert_eq!(dataset.ingredient_name("900"), Some("garam masala"));
        assert_eq!(dataset.ingredient_name("2"), None);
    }

    #[test]
    fn test_profiles_resolve_names_and_deduplicate() {
        let mut unknown = relation("1", "77");
        unknown.aliased_name = Some("fish sauce".to_string());
        let dataset = Dataset::new(
            vec![recipe("1", "Pad Thai", "Thai")],
            vec![ingredient("30", " rice noodle "), ingredient("7", "egg")],
            vec![],
            vec![
                relation("1", "30"),
                relation("1", "7"),
                relation("1", "30"),
                unknown,
                relation("1", "55"),
            ],
        );

        let profiles = dataset.profiles();
        assert_eq!(profiles.len(), 1);
        assert_eq!(
            profiles[0].ingredients,
            vec!["rice noodle", "egg", "fish sauce", "55"]
        );
    }

    #[test]
    fn test_blank_ingredient_alias_does_not_fall_through_to_compound() {
        let mut aliased = relation("1", "5");
        aliased.aliased_name = Some("tomato salsa".to_string());
        let dataset = Dataset::new(
            vec![recipe("1", "Nachos", "Mexican"), recipe("2", "Tacos", "Mexican")],
            vec![ingredient("5", "  ")],
            vec![CompoundIngredient {
                ingredient: ingredient("5", "salsa"),
                constituents: vec!["tomato".to_string()],
            }],
            vec![aliased, relation("2", "5")],
        );

        assert_eq!(dataset.ingredient_name("5"), None);

        let profiles = dataset.profiles();
        assert_eq!(profiles[0].ingredients, vec!["tomato salsa"]);
        assert_eq!(profiles[1].ingredients, vec!["5"]);
    }

    #[test]
    fn test_deserialize_numeric_ids_and_comma_lists() {
        let value = json!({
            "entity_id": 12,
            "aliased_name": "coriander",
            "synonyms": "cilantro, chinese parsley,",
            "category": "Herb",
            "original_name": null
        });
        let parsed: Ingredient = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.entity_id, "12");
        assert_eq!(parsed.synonyms, vec!["cilantro", "chinese parsley"]);
        assert_eq!(parsed.original_name, None);
    }

    #[test]
    fn test_deserialize_compound_with_array_constituents() {
        let value = json!({
            "entity_id": "c1",
            "aliased_name": "curry powder",
            "synonyms": [],
            "category": "Spice",
            "constituents": ["turmeric", "cumin"]
        });
        let parsed: CompoundIngredient = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.ingredient.aliased_name, "curry powder");
        assert_eq!(parsed.constituents, vec!["turmeric", "cumin"]);
    }
}
