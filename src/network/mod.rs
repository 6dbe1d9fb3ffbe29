pub mod builder;
pub mod centrality;
pub mod community;
pub mod snapshot;

pub use builder::{build_graph, BuildOptions};
pub use snapshot::GraphSnapshot;

use crate::domain::model::RecipeProfile;
use crate::utils::error::Result;
use petgraph::graph::UnGraph;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    #[default]
    Ingredient,
    Recipe,
    Cuisine,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    pub key: String,
    pub label: String,
    pub kind: NodeKind,
}

/// 無向加權圖，邊權重為共同出現次數
pub type IngredientGraph = UnGraph<NodeData, u32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum GraphKind {
    /// 出現在同一道食譜的食材互相連結
    #[default]
    Cooccurrence,
    /// 菜系連到它使用的食材
    CuisineIngredient,
    /// 食材組合相似的食譜互相連結
    RecipeSimilarity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum CentralityMeasure {
    Degree,
    Betweenness,
    Closeness,
    Eigenvector,
    #[cfg_attr(feature = "cli", value(name = "pagerank"))]
    PageRank,
}

impl CentralityMeasure {
    pub const ALL: [CentralityMeasure; 5] = [
        CentralityMeasure::Degree,
        CentralityMeasure::Betweenness,
        CentralityMeasure::Closeness,
        CentralityMeasure::Eigenvector,
        CentralityMeasure::PageRank,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CentralityMeasure::Degree => "degree",
            CentralityMeasure::Betweenness => "betweenness",
            CentralityMeasure::Closeness => "closeness",
            CentralityMeasure::Eigenvector => "eigenvector",
            CentralityMeasure::PageRank => "pagerank",
        }
    }

    pub fn compute(&self, graph: &IngredientGraph) -> Vec<f64> {
        match self {
            CentralityMeasure::Degree => centrality::degree(graph),
            CentralityMeasure::Betweenness => centrality::betweenness(graph),
            CentralityMeasure::Closeness => centrality::closeness(graph),
            CentralityMeasure::Eigenvector => centrality::eigenvector(graph),
            CentralityMeasure::PageRank => centrality::pagerank(graph),
        }
    }
}

impl fmt::Display for CentralityMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedNode {
    pub label: String,
    pub kind: NodeKind,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DegreeDistribution {
    /// 依節點順序的 (標籤, 度數)
    pub degrees: Vec<(String, usize)>,
    /// histogram[d] = 度數為 d 的節點數
    pub histogram: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
    pub density: f64,
    pub average_degree: f64,
    pub connected_components: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityAssignment {
    pub label: String,
    pub kind: NodeKind,
    pub community: usize,
}

#[derive(Debug, Clone, Default)]
pub struct NetworkAnalysis {
    graph: IngredientGraph,
}

impl NetworkAnalysis {
    pub fn new(graph: IngredientGraph) -> Self {
        Self { graph }
    }

    pub fn from_profiles(kind: GraphKind, profiles: &[RecipeProfile], options: &BuildOptions) -> Self {
        Self::new(build_graph(kind, profiles, options))
    }

    pub fn graph(&self) -> &IngredientGraph {
        &self.graph
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::from_graph(&self.graph)
    }

    /// 從 JSON 快照檔載入圖形
    pub fn load_graph<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read(path)?;
        let snapshot: GraphSnapshot = serde_json::from_slice(&content)?;
        Ok(Self::new(snapshot.into_graph()?))
    }

    pub fn save_graph<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_vec_pretty(&self.snapshot())?;
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn degree_distribution(&self) -> DegreeDistribution {
        let degrees: Vec<(String, usize)> = self
            .graph
            .node_indices()
            .map(|idx| (self.graph[idx].label.clone(), self.graph.neighbors(idx).count()))
            .collect();

        let histogram = match degrees.iter().map(|(_, d)| *d).max() {
            Some(max) => {
                let mut histogram = vec![0; max + 1];
                for (_, degree) in &degrees {
                    histogram[*degree] += 1;
                }
                histogram
            }
            None => Vec::new(),
        };

        DegreeDistribution { degrees, histogram }
    }

    /// 分數最高的前 `n` 個節點，同分時保留節點加入順序
    pub fn top_nodes_by_centrality(&self, measure: CentralityMeasure, n: usize) -> Vec<RankedNode> {
        let scores = measure.compute(&self.graph);
        let mut ranked: Vec<(usize, f64)> = scores.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        ranked
            .into_iter()
            .take(n)
            .map(|(index, score)| {
                let node = &self.graph[petgraph::graph::NodeIndex::new(index)];
                RankedNode {
                    label: node.label.clone(),
                    kind: node.kind,
                    score,
                }
            })
            .collect()
    }

    pub fn communities(&self) -> Vec<usize> {
        community::louvain(&self.graph)
    }

    pub fn community_assignments(&self, communities: &[usize]) -> Vec<CommunityAssignment> {
        self.graph
            .node_indices()
            .map(|idx| &self.graph[idx])
            .zip(communities)
            .map(|(node, community)| CommunityAssignment {
                label: node.label.clone(),
                kind: node.kind,
                community: *community,
            })
            .collect()
    }

    pub fn modularity(&self, communities: &[usize]) -> f64 {
        community::modularity(&self.graph, communities)
    }

    pub fn summary(&self) -> GraphSummary {
        let nodes = self.graph.node_count();
        let edges = self.graph.edge_count();
        let density = if nodes > 1 {
            2.0 * edges as f64 / (nodes * (nodes - 1)) as f64
        } else {
            0.0
        };
        let average_degree = if nodes > 0 {
            2.0 * edges as f64 / nodes as f64
        } else {
            0.0
        };

        GraphSummary {
            nodes,
            edges,
            density,
            average_degree,
            connected_components: petgraph::algo::connected_components(&self.graph),
        }
    }
}
