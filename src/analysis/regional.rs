use crate::domain::model::RecipeProfile;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionalPopularity {
    /// 菜系 → 熱門食材，次數多者在前
    pub popular_by_region: BTreeMap<String, Vec<String>>,
    /// 所有菜系都用到的食材中最熱門者
    pub common_to_all_regions: Vec<String>,
}

fn top_by_count(counts: &HashMap<&str, usize>, top_n: usize) -> Vec<String> {
    let mut entries: Vec<(&str, usize)> = counts.iter().map(|(name, count)| (*name, *count)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    entries
        .into_iter()
        .take(top_n)
        .map(|(name, _)| name.to_string())
        .collect()
}

pub fn detect_common_and_popular_ingredients(
    profiles: &[RecipeProfile],
    top_n: usize,
) -> RegionalPopularity {
    let mut by_region: BTreeMap<&str, HashMap<&str, usize>> = BTreeMap::new();
    let mut overall: HashMap<&str, usize> = HashMap::new();

    for profile in profiles {
        let region = by_region.entry(profile.cuisine.as_str()).or_default();
        for ingredient in &profile.ingredients {
            *region.entry(ingredient.as_str()).or_insert(0) += 1;
            *overall.entry(ingredient.as_str()).or_insert(0) += 1;
        }
    }

    let popular_by_region = by_region
        .iter()
        .map(|(region, counts)| (region.to_string(), top_by_count(counts, top_n)))
        .collect();

    let mut regions = by_region.values();
    let shared: HashSet<&str> = match regions.next() {
        Some(first) => {
            let mut shared: HashSet<&str> = first.keys().copied().collect();
            for counts in regions {
                shared.retain(|name| counts.contains_key(name));
            }
            shared
        }
        None => HashSet::new(),
    };

    let common_counts: HashMap<&str, usize> = overall
        .into_iter()
        .filter(|(name, _)| shared.contains(name))
        .collect();

    RegionalPopularity {
        popular_by_region,
        common_to_all_regions: top_by_count(&common_counts, top_n),
    }
}
