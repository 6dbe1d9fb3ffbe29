use super::{GraphKind, IngredientGraph, NodeData, NodeKind};
use crate::analysis::similarity::similar_pairs;
use crate::domain::model::RecipeProfile;
use petgraph::graph::NodeIndex;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildOptions {
    pub min_edge_weight: u32,
    pub similarity_threshold: f64,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            min_edge_weight: 1,
            similarity_threshold: 0.5,
        }
    }
}

/// 以 (kind, key) 去重的節點註冊表，保留首次出現順序
struct NodeRegistry {
    graph: IngredientGraph,
    index: HashMap<(NodeKind, String), NodeIndex>,
}

impl NodeRegistry {
    fn new() -> Self {
        Self {
            graph: IngredientGraph::new_undirected(),
            index: HashMap::new(),
        }
    }

    fn node(&mut self, kind: NodeKind, key: &str, label: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(&(kind, key.to_string())) {
            return idx;
        }
        let idx = self.graph.add_node(NodeData {
            key: key.to_string(),
            label: label.to_string(),
            kind,
        });
        self.index.insert((kind, key.to_string()), idx);
        idx
    }

    fn finish(mut self, weights: BTreeMap<(NodeIndex, NodeIndex), u32>, min_edge_weight: u32) -> IngredientGraph {
        for ((a, b), weight) in weights {
            if weight >= min_edge_weight {
                self.graph.add_edge(a, b, weight);
            }
        }
        self.graph
    }
}

fn ordered(a: NodeIndex, b: NodeIndex) -> (NodeIndex, NodeIndex) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

pub fn build_graph(kind: GraphKind, profiles: &[RecipeProfile], options: &BuildOptions) -> IngredientGraph {
    let graph = match kind {
        GraphKind::Cooccurrence => cooccurrence(profiles, options),
        GraphKind::CuisineIngredient => cuisine_ingredient(profiles, options),
        GraphKind::RecipeSimilarity => recipe_similarity(profiles, options),
    };
    tracing::debug!(
        "Built {:?} graph: {} nodes, {} edges",
        kind,
        graph.node_count(),
        graph.edge_count()
    );
    graph
}

/// 同一道食譜中出現的食材兩兩相連，權重為共同出現的食譜數
fn cooccurrence(profiles: &[RecipeProfile], options: &BuildOptions) -> IngredientGraph {
    let mut registry = NodeRegistry::new();
    let mut weights: BTreeMap<(NodeIndex, NodeIndex), u32> = BTreeMap::new();

    for profile in profiles {
        let nodes: Vec<NodeIndex> = profile
            .ingredients
            .iter()
            .map(|name| registry.node(NodeKind::Ingredient, name, name))
            .collect();

        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                if nodes[i] == nodes[j] {
                    continue;
                }
                *weights.entry(ordered(nodes[i], nodes[j])).or_insert(0) += 1;
            }
        }
    }

    registry.finish(weights, options.min_edge_weight)
}

fn cuisine_ingredient(profiles: &[RecipeProfile], options: &BuildOptions) -> IngredientGraph {
    let mut registry = NodeRegistry::new();
    let mut weights: BTreeMap<(NodeIndex, NodeIndex), u32> = BTreeMap::new();

    for profile in profiles {
        let cuisine = profile.cuisine.trim();
        if cuisine.is_empty() {
            continue;
        }
        let cuisine_node = registry.node(NodeKind::Cuisine, cuisine, cuisine);
        for name in &profile.ingredients {
            let ingredient_node = registry.node(NodeKind::Ingredient, name, name);
            *weights
                .entry(ordered(cuisine_node, ingredient_node))
                .or_insert(0) += 1;
        }
    }

    registry.finish(weights, options.min_edge_weight)
}

fn recipe_similarity(profiles: &[RecipeProfile], options: &BuildOptions) -> IngredientGraph {
    let mut registry = NodeRegistry::new();
    let nodes: Vec<NodeIndex> = profiles
        .iter()
        .map(|profile| registry.node(NodeKind::Recipe, &profile.recipe_id, &profile.title))
        .collect();

    let mut weights: BTreeMap<(NodeIndex, NodeIndex), u32> = BTreeMap::new();
    for (i, j, _, shared) in similar_pairs(profiles, options.similarity_threshold) {
        if nodes[i] == nodes[j] {
            continue;
        }
        let entry = weights.entry(ordered(nodes[i], nodes[j])).or_insert(0);
        *entry = (*entry).max(shared as u32);
    }

    registry.finish(weights, options.min_edge_weight)
}
