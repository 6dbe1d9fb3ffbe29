use crate::domain::model::RecipeProfile;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

/// 標題 → (相似食譜標題 → 共同食材數)
pub type SimilarRecipes = BTreeMap<String, BTreeMap<String, usize>>;

pub fn jaccard_similarity<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// 相似度不低於 `threshold` 的食譜配對，回傳 `(i, j, 相似度, 共同食材數)`，`i < j`
pub fn similar_pairs(profiles: &[RecipeProfile], threshold: f64) -> Vec<(usize, usize, f64, usize)> {
    let sets: Vec<HashSet<&str>> = profiles.iter().map(RecipeProfile::ingredient_set).collect();
    let mut pairs = Vec::new();

    for i in 0..sets.len() {
        for j in (i + 1)..sets.len() {
            let similarity = jaccard_similarity(&sets[i], &sets[j]);
            if similarity >= threshold {
                let shared = sets[i].intersection(&sets[j]).count();
                pairs.push((i, j, similarity, shared));
            }
        }
    }

    pairs
}

pub fn find_similar_recipes(profiles: &[RecipeProfile], threshold: f64) -> SimilarRecipes {
    let mut similar = SimilarRecipes::new();

    for (i, j, _, shared) in similar_pairs(profiles, threshold) {
        let first = &profiles[i].title;
        let second = &profiles[j].title;
        similar
            .entry(first.clone())
            .or_default()
            .insert(second.clone(), shared);
        similar
            .entry(second.clone())
            .or_default()
            .insert(first.clone(), shared);
    }

    similar
}

/// 至少出現在一組相似配對中的食譜，維持輸入順序
pub fn detect_common_recipes(profiles: &[RecipeProfile], threshold: f64) -> Vec<&RecipeProfile> {
    let members: BTreeSet<usize> = similar_pairs(profiles, threshold)
        .into_iter()
        .flat_map(|(i, j, _, _)| [i, j])
        .collect();
    members.into_iter().map(|i| &profiles[i]).collect()
}

/// 以食材名稱建立的 TF-IDF 索引，每道食譜一個稀疏向量
#[derive(Debug, Clone)]
pub struct TfIdfIndex {
    vectors: Vec<HashMap<usize, f64>>,
}

impl TfIdfIndex {
    pub fn build(profiles: &[RecipeProfile]) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();
        let mut term_counts: Vec<HashMap<usize, usize>> = Vec::with_capacity(profiles.len());

        for profile in profiles {
            let mut counts: HashMap<usize, usize> = HashMap::new();
            for ingredient in &profile.ingredients {
                let term = ingredient.trim().to_lowercase();
                if term.is_empty() {
                    continue;
                }
                let next = vocabulary.len();
                let id = *vocabulary.entry(term).or_insert(next);
                if id == document_frequency.len() {
                    document_frequency.push(0);
                }
                *counts.entry(id).or_insert(0) += 1;
            }
            for id in counts.keys() {
                document_frequency[*id] += 1;
            }
            term_counts.push(counts);
        }

        // 平滑 idf: ln((1 + n) / (1 + df)) + 1
        let n = profiles.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectors = term_counts
            .into_iter()
            .map(|counts| {
                let mut vector: HashMap<usize, f64> = counts
                    .into_iter()
                    .map(|(id, tf)| (id, tf as f64 * idf[id]))
                    .collect();
                let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
                if norm > f64::EPSILON {
                    for weight in vector.values_mut() {
                        *weight /= norm;
                    }
                }
                vector
            })
            .collect();

        Self { vectors }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn cosine_similarity(&self, a: usize, b: usize) -> f64 {
        let (Some(va), Some(vb)) = (self.vectors.get(a), self.vectors.get(b)) else {
            return 0.0;
        };
        let (small, large) = if va.len() <= vb.len() { (va, vb) } else { (vb, va) };
        small
            .iter()
            .filter_map(|(id, w)| large.get(id).map(|other| w * other))
            .sum()
    }

    /// 與 `index` 最相似的 `k` 道食譜，分數由高到低，同分依索引
    pub fn most_similar(&self, index: usize, k: usize) -> Vec<(usize, f64)> {
        if index >= self.vectors.len() {
            return Vec::new();
        }
        let mut scored: Vec<(usize, f64)> = (0..self.vectors.len())
            .filter(|&other| other != index)
            .map(|other| (other, self.cosine_similarity(index, other)))
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(k);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(title: &str, ingredients: &[&str]) -> RecipeProfile {
        RecipeProfile {
            recipe_id: title.to_lowercase(),
            title: title.to_string(),
            cuisine: "Test".to_string(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_jaccard_similarity() {
        let a: HashSet<&str> = ["rice", "egg", "soy sauce"].into_iter().collect();
        let b: HashSet<&str> = ["rice", "egg", "peas", "carrot"].into_iter().collect();
        assert!((jaccard_similarity(&a, &b) - 2.0 / 5.0).abs() < 1e-12);
        assert_eq!(jaccard_similarity(&a, &a), 1.0);

        let empty: HashSet<&str> = HashSet::new();
        assert_eq!(jaccard_similarity(&empty, &empty), 0.0);
    }

    #[test]
    fn test_find_similar_recipes_is_symmetric() {
        let profiles = vec![
            profile("Fried Rice", &["rice", "egg", "soy sauce"]),
            profile("Egg Rice", &["rice", "egg"]),
            profile("Salad", &["lettuce", "tomato"]),
        ];

        let similar = find_similar_recipes(&profiles, 0.5);
        assert_eq!(similar.len(), 2);
        assert_eq!(similar["Fried Rice"]["Egg Rice"], 2);
        assert_eq!(similar["Egg Rice"]["Fried Rice"], 2);
        assert!(!similar.contains_key("Salad"));
    }

    #[test]
    fn test_detect_common_recipes_input_order() {
        let profiles = vec![
            profile("Salad", &["lettuce", "tomato"]),
            profile("Fried Rice", &["rice", "egg", "soy sauce"]),
            profile("Greek Salad", &["lettuce", "tomato", "feta"]),
            profile("Egg Rice", &["rice", "egg"]),
        ];

        let common = detect_common_recipes(&profiles, 0.5);
        let titles: Vec<&str> = common.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Salad", "Fried Rice", "Greek Salad", "Egg Rice"]);

        assert!(detect_common_recipes(&profiles, 0.9).is_empty());
    }

    #[test]
    fn test_tfidf_most_similar() {
        let profiles = vec![
            profile("Fried Rice", &["rice", "egg", "soy sauce"]),
            profile("Egg Rice", &["rice", "egg"]),
            profile("Salad", &["lettuce", "tomato"]),
        ];
        let index = TfIdfIndex::build(&profiles);
        assert_eq!(index.len(), 3);

        let top = index.most_similar(0, 2);
        assert_eq!(top[0].0, 1);
        assert!(top[0].1 > 0.5);
        assert_eq!(top[1], (2, 0.0));

        assert!((index.cosine_similarity(1, 1) - 1.0).abs() < 1e-9);
        assert!(index.most_similar(10, 2).is_empty());
    }

    #[test]
    fn test_tfidf_cosine_matches_smooth_idf() {
        let profiles = vec![
            profile("First", &["a", "b"]),
            profile("Second", &["A", "c"]),
        ];
        let index = TfIdfIndex::build(&profiles);

        // idf(a) = 1，idf(b) = idf(c) = ln(3 / 2) + 1
        let rare = (1.5f64).ln() + 1.0;
        let expected = 1.0 / (1.0 + rare * rare);
        assert!((index.cosine_similarity(0, 1) - expected).abs() < 1e-9);
        assert!((index.cosine_similarity(0, 1) - 0.336097).abs() < 1e-6);
        assert_eq!(index.cosine_similarity(0, 5), 0.0);
    }
}
