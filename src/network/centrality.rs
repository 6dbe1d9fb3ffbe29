use super::IngredientGraph;
use petgraph::visit::EdgeRef;
use std::collections::VecDeque;

const MAX_ITERATIONS: usize = 100;
const TOLERANCE: f64 = 1e-6;
const DAMPING: f64 = 0.85;

/// (鄰居, 權重) 列表
pub(crate) fn adjacency(graph: &IngredientGraph) -> Vec<Vec<(usize, f64)>> {
    let mut adjacency = vec![Vec::new(); graph.node_count()];
    for edge in graph.edge_references() {
        let (a, b) = (edge.source().index(), edge.target().index());
        let weight = *edge.weight() as f64;
        adjacency[a].push((b, weight));
        if a != b {
            adjacency[b].push((a, weight));
        }
    }
    adjacency
}

pub fn degree(graph: &IngredientGraph) -> Vec<f64> {
    let n = graph.node_count();
    if n <= 1 {
        return vec![1.0; n];
    }
    let scale = 1.0 / (n - 1) as f64;
    adjacency(graph)
        .iter()
        .map(|neighbors| neighbors.len() as f64 * scale)
        .collect()
}

fn bfs_distances(adjacency: &[Vec<(usize, f64)>], source: usize) -> Vec<Option<usize>> {
    let mut distances = vec![None; adjacency.len()];
    let mut queue = VecDeque::new();
    distances[source] = Some(0);
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        let next = distances[v].unwrap_or(0) + 1;
        for &(w, _) in &adjacency[v] {
            if distances[w].is_none() {
                distances[w] = Some(next);
                queue.push_back(w);
            }
        }
    }

    distances
}

/// Brandes 演算法，以不加權最短路徑計算
pub fn betweenness(graph: &IngredientGraph) -> Vec<f64> {
    let n = graph.node_count();
    let adjacency = adjacency(graph);
    let mut centrality = vec![0.0f64; n];

    for s in 0..n {
        let mut stack = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0f64; n];
        let mut distance: Vec<i64> = vec![-1; n];
        sigma[s] = 1.0;
        distance[s] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(s);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for &(w, _) in &adjacency[v] {
                if distance[w] < 0 {
                    distance[w] = distance[v] + 1;
                    queue.push_back(w);
                }
                if distance[w] == distance[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        let mut delta = vec![0.0f64; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != s {
                centrality[w] += delta[w];
            }
        }
    }

    // 無向圖每對節點會被計算兩次
    let scale = if n > 2 {
        1.0 / ((n - 1) * (n - 2)) as f64
    } else {
        0.5
    };
    centrality.iter().map(|c| c * scale).collect()
}

/// Wasserman-Faust 接近中心性，不連通的圖也能比較
pub fn closeness(graph: &IngredientGraph) -> Vec<f64> {
    let n = graph.node_count();
    let adjacency = adjacency(graph);

    (0..n)
        .map(|u| {
            let distances = bfs_distances(&adjacency, u);
            let reachable: Vec<usize> = distances.iter().flatten().copied().collect();
            let total: usize = reachable.iter().sum();
            let r = reachable.len();
            if total == 0 || n <= 1 {
                return 0.0;
            }
            let closeness = (r - 1) as f64 / total as f64;
            closeness * (r - 1) as f64 / (n - 1) as f64
        })
        .collect()
}

/// 在 (A + I) 上做冪迭代，結果以 L2 正規化
pub fn eigenvector(graph: &IngredientGraph) -> Vec<f64> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }
    let adjacency = adjacency(graph);
    let mut x = vec![1.0 / n as f64; n];

    for _ in 0..MAX_ITERATIONS {
        let last = x.clone();
        for (v, neighbors) in adjacency.iter().enumerate() {
            for &(w, _) in neighbors {
                x[w] += last[v];
            }
        }

        let norm = x.iter().map(|value| value * value).sum::<f64>().sqrt();
        let norm = if norm > 0.0 { norm } else { 1.0 };
        for value in x.iter_mut() {
            *value /= norm;
        }

        let error: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if error < n as f64 * TOLERANCE {
            return x;
        }
    }

    tracing::warn!(
        "⚠️ Eigenvector centrality did not converge after {} iterations",
        MAX_ITERATIONS
    );
    x
}

/// 加權 PageRank；孤立節點將分數平均分給所有節點
pub fn pagerank(graph: &IngredientGraph) -> Vec<f64> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }
    let adjacency = adjacency(graph);
    let strength: Vec<f64> = adjacency
        .iter()
        .map(|neighbors| neighbors.iter().map(|(_, w)| w).sum())
        .collect();
    let uniform = 1.0 / n as f64;
    let mut x = vec![uniform; n];

    for _ in 0..MAX_ITERATIONS {
        let last = x.clone();
        let dangling: f64 = (0..n)
            .filter(|&v| strength[v] <= 0.0)
            .map(|v| last[v])
            .sum::<f64>()
            * DAMPING;

        x = vec![0.0; n];
        for v in 0..n {
            if strength[v] > 0.0 {
                for &(w, weight) in &adjacency[v] {
                    x[w] += DAMPING * last[v] * weight / strength[v];
                }
            }
        }
        for value in x.iter_mut() {
            *value += dangling * uniform + (1.0 - DAMPING) * uniform;
        }

        let error: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if error < n as f64 * TOLERANCE {
            return x;
        }
    }

    tracing::warn!("⚠️ PageRank did not converge after {} iterations", MAX_ITERATIONS);
    x
}
