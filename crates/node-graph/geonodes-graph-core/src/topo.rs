use crate::error::EvalError;
use crate::types::*;
use hashbrown::{HashMap, HashSet};

/// Group nodes into levels: every node only depends on nodes of earlier levels.
/// Nodes keep their declaration order within a level.
pub fn topo_levels(nodes: &[NodeSpec]) -> Result<Vec<Vec<NodeId>>, EvalError> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut indeg = vec![0usize; nodes.len()];
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (i, n) in nodes.iter().enumerate() {
        // several links from the same upstream node count once
        let upstream: HashSet<usize> = n
            .inputs
            .values()
            .filter_map(|link| index.get(link.node_id.as_str()).copied())
            .collect();
        for u in upstream {
            adj[u].push(i);
            indeg[i] += 1;
        }
    }

    let mut current: Vec<usize> = (0..nodes.len()).filter(|&i| indeg[i] == 0).collect();
    let mut levels = Vec::new();
    let mut visited = 0;
    while !current.is_empty() {
        visited += current.len();
        let mut next = Vec::new();
        for &u in &current {
            for &v in &adj[u] {
                indeg[v] -= 1;
                if indeg[v] == 0 {
                    next.push(v);
                }
            }
        }
        next.sort_unstable();
        levels.push(current.iter().map(|&i| nodes[i].id.clone()).collect());
        current = next;
    }

    if visited != nodes.len() {
        return Err(EvalError::Cycle);
    }
    Ok(levels)
}

pub fn topo_order(nodes: &[NodeSpec]) -> Result<Vec<NodeId>, EvalError> {
    Ok(topo_levels(nodes)?.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_topo() {
        let g = GraphSpec {
            nodes: vec![
                NodeSpec::new("math", NodeType::AttributeMath).with_link("Geometry", "sphere", "Geometry"),
                NodeSpec::new("sphere", NodeType::MeshPrimitiveUvSphere),
                NodeSpec::new("line", NodeType::MeshPrimitiveLine),
            ],
        };
        let levels = topo_levels(&g.nodes).unwrap();
        assert_eq!(levels, vec![vec!["sphere".to_string(), "line".to_string()], vec!["math".to_string()]]);
        assert_eq!(topo_order(&g.nodes).unwrap(), vec!["sphere", "line", "math"]);
    }

    #[test]
    fn cycles_are_rejected() {
        let nodes = vec![
            NodeSpec::new("a", NodeType::AttributeFill).with_link("Geometry", "b", "Geometry"),
            NodeSpec::new("b", NodeType::AttributeFill).with_link("Geometry", "a", "Geometry"),
        ];
        assert!(matches!(topo_levels(&nodes), Err(EvalError::Cycle)));
    }
}
