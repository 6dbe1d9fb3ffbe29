use crate::domain::model::RecipeProfile;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientCount {
    pub ingredient: String,
    pub count: usize,
}

/// 統計所有食譜中的食材出現次數，依首次出現順序
pub fn ingredient_frequency(profiles: &[RecipeProfile]) -> Vec<IngredientCount> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<IngredientCount> = Vec::new();

    for ingredient in profiles.iter().flat_map(|p| p.ingredients.iter()) {
        let name = ingredient.trim();
        if name.is_empty() {
            continue;
        }
        match positions.get(name) {
            Some(&pos) => counts[pos].count += 1,
            None => {
                positions.insert(name, counts.len());
                counts.push(IngredientCount {
                    ingredient: name.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts
}

/// 出現次數少於 `threshold` 的食材
pub fn detect_uncommon_ingredients(profiles: &[RecipeProfile], threshold: usize) -> Vec<IngredientCount> {
    ingredient_frequency(profiles)
        .into_iter()
        .filter(|entry| entry.count < threshold)
        .collect()
}

fn mentions_any(profile: &RecipeProfile, needles: &[String]) -> bool {
    profile.ingredients.iter().any(|ingredient| {
        let ingredient = ingredient.to_lowercase();
        needles.iter().any(|needle| ingredient.contains(needle.as_str()))
    })
}

fn lowercase_needles<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names
        .iter()
        .map(|name| name.as_ref().trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

/// 至少有一項食材包含 `names` 其中之一的食譜（不分大小寫）
pub fn filter_recipes_with_ingredients<'a, S: AsRef<str>>(
    profiles: &'a [RecipeProfile],
    names: &[S],
) -> Vec<&'a RecipeProfile> {
    let needles = lowercase_needles(names);
    profiles
        .iter()
        .filter(|profile| mentions_any(profile, &needles))
        .collect()
}

/// 沒有任何食材包含 `names` 的食譜
pub fn exclude_recipes_with_ingredients<'a, S: AsRef<str>>(
    profiles: &'a [RecipeProfile],
    names: &[S],
) -> Vec<&'a RecipeProfile> {
    let needles = lowercase_needles(names);
    profiles
        .iter()
        .filter(|profile| !mentions_any(profile, &needles))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, ingredients: &[&str]) -> RecipeProfile {
        RecipeProfile {
            recipe_id: id.to_string(),
            title: format!("Recipe {}", id),
            cuisine: "Test".to_string(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn sample() -> Vec<RecipeProfile> {
        vec![
            profile("1", &["salt", "garlic", "saffron"]),
            profile("2", &["salt", "garlic"]),
            profile("3", &["salt", "Sichuan Pepper"]),
        ]
    }

    #[test]
    fn test_frequency_first_seen_order() {
        let counts = ingredient_frequency(&sample());
        let names: Vec<&str> = counts.iter().map(|c| c.ingredient.as_str()).collect();
        assert_eq!(names, vec!["salt", "garlic", "saffron", "Sichuan Pepper"]);
        assert_eq!(counts[0].count, 3);
        assert_eq!(counts[1].count, 2);
    }

    #[test]
    fn test_detect_uncommon_ingredients_threshold() {
        let uncommon = detect_uncommon_ingredients(&sample(), 2);
        let names: Vec<&str> = uncommon.iter().map(|c| c.ingredient.as_str()).collect();
        assert_eq!(names, vec!["saffron", "Sichuan Pepper"]);

        // 預設門檻 5 時所有食材都算少見
        assert_eq!(detect_uncommon_ingredients(&sample(), 5).len(), 4);
        assert!(detect_uncommon_ingredients(&[], 5).is_empty());
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let profiles = sample();
        let hits = filter_recipes_with_ingredients(&profiles, &["pepper"]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].recipe_id, "3");

        let hits = filter_recipes_with_ingredients(&profiles, &["SAFF", "sichuan"]);
        let ids: Vec<&str> = hits.iter().map(|p| p.recipe_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_exclude_is_complement_of_filter() {
        let profiles = sample();
        let kept = exclude_recipes_with_ingredients(&profiles, &["saffron"]);
        let ids: Vec<&str> = kept.iter().map(|p| p.recipe_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_empty_names() {
        let profiles = sample();
        let none: [&str; 0] = [];
        assert!(filter_recipes_with_ingredients(&profiles, &none).is_empty());
        assert_eq!(exclude_recipes_with_ingredients(&profiles, &none).len(), 3);
    }
}
