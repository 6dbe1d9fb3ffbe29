use super::IngredientGraph;
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, HashMap};

const MAX_PASSES: usize = 100;

/// 一層 Louvain 的加權圖；自環權重另外記錄
struct Level {
    adjacency: Vec<Vec<(usize, f64)>>,
    self_loops: Vec<f64>,
}

impl Level {
    fn from_graph(graph: &IngredientGraph) -> Self {
        let n = graph.node_count();
        let mut adjacency = vec![Vec::new(); n];
        let mut self_loops = vec![0.0; n];
        for edge in graph.edge_references() {
            let (a, b) = (edge.source().index(), edge.target().index());
            let weight = *edge.weight() as f64;
            if a == b {
                self_loops[a] += weight;
            } else {
                adjacency[a].push((b, weight));
                adjacency[b].push((a, weight));
            }
        }
        Self {
            adjacency,
            self_loops,
        }
    }

    fn len(&self) -> usize {
        self.adjacency.len()
    }

    fn strength(&self, v: usize) -> f64 {
        self.adjacency[v].iter().map(|(_, w)| w).sum::<f64>() + 2.0 * self.self_loops[v]
    }

    fn total_weight(&self) -> f64 {
        let edges: f64 = self
            .adjacency
            .iter()
            .flat_map(|neighbors| neighbors.iter().map(|(_, w)| w))
            .sum::<f64>()
            / 2.0;
        edges + self.self_loops.iter().sum::<f64>()
    }

    /// Louvain 第一階段：逐點移動到模組度增益最大的鄰近社群
    fn local_moving(&self) -> (Vec<usize>, bool) {
        let n = self.len();
        let m2 = 2.0 * self.total_weight();
        let mut community: Vec<usize> = (0..n).collect();
        let strength: Vec<f64> = (0..n).map(|v| self.strength(v)).collect();
        let mut totals = strength.clone();
        let mut moved_any = false;

        if m2 <= 0.0 {
            return (community, false);
        }

        for _ in 0..MAX_PASSES {
            let mut moved = false;

            for v in 0..n {
                let own = community[v];
                totals[own] -= strength[v];

                let mut links: BTreeMap<usize, f64> = BTreeMap::new();
                links.insert(own, 0.0);
                for &(w, weight) in &self.adjacency[v] {
                    *links.entry(community[w]).or_insert(0.0) += weight;
                }

                let gain = |c: usize, k_in: f64| k_in - totals[c] * strength[v] / m2;
                let mut best = own;
                let mut best_gain = gain(own, links[&own]);
                for (&c, &k_in) in &links {
                    let g = gain(c, k_in);
                    if g > best_gain {
                        best = c;
                        best_gain = g;
                    }
                }

                totals[best] += strength[v];
                if best != own {
                    community[v] = best;
                    moved = true;
                    moved_any = true;
                }
            }

            if !moved {
                break;
            }
        }

        (renumber(&community), moved_any)
    }

    fn aggregate(&self, community: &[usize]) -> Self {
        let size = community.iter().copied().max().map(|c| c + 1).unwrap_or(0);
        let mut self_loops = vec![0.0; size];
        let mut weights: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); size];

        for v in 0..self.len() {
            let cv = community[v];
            self_loops[cv] += self.self_loops[v];
            for &(w, weight) in &self.adjacency[v] {
                let cw = community[w];
                if cv == cw {
                    // 每條內部邊會從兩端各看到一次
                    self_loops[cv] += weight / 2.0;
                } else {
                    *weights[cv].entry(cw).or_insert(0.0) += weight;
                }
            }
        }

        Self {
            adjacency: weights
                .into_iter()
                .map(|neighbors| neighbors.into_iter().collect())
                .collect(),
            self_loops,
        }
    }
}

fn renumber(labels: &[usize]) -> Vec<usize> {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    labels
        .iter()
        .map(|label| {
            let next = mapping.len();
            *mapping.entry(*label).or_insert(next)
        })
        .collect()
}

/// 確定性的 Louvain 社群偵測
///
/// 節點依索引順序處理；增益相同時留在原社群，其次選編號最小的社群。
/// 每個節點回傳一個社群編號，依首次出現順序從 0 起算。
pub fn louvain(graph: &IngredientGraph) -> Vec<usize> {
    let mut level = Level::from_graph(graph);
    let mut assignment: Vec<usize> = (0..graph.node_count()).collect();

    for depth in 0..MAX_PASSES {
        let (community, moved) = level.local_moving();
        if !moved {
            tracing::debug!("Louvain stopped after {} levels", depth);
            break;
        }
        for node_community in assignment.iter_mut() {
            *node_community = community[*node_community];
        }
        level = level.aggregate(&community);
    }

    renumber(&assignment)
}

/// 加權 Newman 模組度
pub fn modularity(graph: &IngredientGraph, communities: &[usize]) -> f64 {
    let total_weight: f64 = graph.edge_references().map(|e| *e.weight() as f64).sum();
    if total_weight <= 0.0 || communities.len() != graph.node_count() {
        return 0.0;
    }

    let mut internal: HashMap<usize, f64> = HashMap::new();
    let mut degree_sum: HashMap<usize, f64> = HashMap::new();

    for edge in graph.edge_references() {
        let weight = *edge.weight() as f64;
        let (a, b) = (edge.source().index(), edge.target().index());
        let (ca, cb) = (communities[a], communities[b]);
        *degree_sum.entry(ca).or_insert(0.0) += weight;
        *degree_sum.entry(cb).or_insert(0.0) += weight;
        if ca == cb {
            *internal.entry(ca).or_insert(0.0) += weight;
        }
    }

    degree_sum
        .iter()
        .map(|(community, degree)| {
            let inside = internal.get(community).copied().unwrap_or(0.0);
            inside / total_weight - (degree / (2.0 * total_weight)).powi(2)
        })
        .sum()
}
