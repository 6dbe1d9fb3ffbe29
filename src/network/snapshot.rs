use super::{IngredientGraph, NodeData};
use crate::utils::error::{AnalysisError, Result};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub source: usize,
    pub target: usize,
    pub weight: u32,
}

/// 可序列化的圖形快照，節點以插入順序編號
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeData>,
    pub edges: Vec<EdgeSnapshot>,
}

impl GraphSnapshot {
    pub fn from_graph(graph: &IngredientGraph) -> Self {
        Self {
            nodes: graph.node_indices().map(|idx| graph[idx].clone()).collect(),
            edges: graph
                .edge_references()
                .map(|edge| EdgeSnapshot {
                    source: edge.source().index(),
                    target: edge.target().index(),
                    weight: *edge.weight(),
                })
                .collect(),
        }
    }

    pub fn into_graph(self) -> Result<IngredientGraph> {
        let mut graph = IngredientGraph::with_capacity(self.nodes.len(), self.edges.len());
        for node in self.nodes {
            graph.add_node(node);
        }

        let node_count = graph.node_count();
        for edge in self.edges {
            if edge.source >= node_count || edge.target >= node_count {
                return Err(AnalysisError::GraphError {
                    message: format!(
                        "Edge {} -> {} references a node outside 0..{}",
                        edge.source, edge.target, node_count
                    ),
                });
            }
            graph.add_edge(
                NodeIndex::new(edge.source),
                NodeIndex::new(edge.target),
                edge.weight,
            );
        }

        Ok(graph)
    }
}
