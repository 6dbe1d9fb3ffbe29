pub mod frequency;
pub mod regional;
pub mod similarity;

pub use frequency::{
    detect_uncommon_ingredients, exclude_recipes_with_ingredients, filter_recipes_with_ingredients,
    ingredient_frequency, IngredientCount,
};
pub use regional::{detect_common_and_popular_ingredients, RegionalPopularity};
pub use similarity::{
    detect_common_recipes, find_similar_recipes, jaccard_similarity, SimilarRecipes, TfIdfIndex,
};
