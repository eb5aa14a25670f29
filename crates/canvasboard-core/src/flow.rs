use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

pub type NodeId = String;
pub type EdgeId = String;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FlowError {
    #[error("unknown node '{0}'")]
    UnknownNode(NodeId),
    #[error("edge '{0}' already exists")]
    DuplicateEdge(EdgeId),
    #[error("cannot connect node '{0}' to itself")]
    SelfLoop(NodeId),
}

/// Role of a node in the diagram: sources only emit, sinks only receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Input,
    #[default]
    Default,
    Output,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: NodeId,
    pub position: Point,
    pub label: String,
    #[serde(default)]
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub animated: bool,
}

/// Node/edge diagram keyed by id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlowGraph {
    nodes: BTreeMap<NodeId, FlowNode>,
    edges: BTreeMap<EdgeId, FlowEdge>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &FlowEdge> {
        self.edges.values()
    }

    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &str) -> Option<&FlowEdge> {
        self.edges.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Insert or replace a node.
    pub fn add_node(&mut self, node: FlowNode) {
        self.nodes.insert(node.id.clone(), node);
    }

    fn insert_edge(&mut self, edge: FlowEdge) -> Result<EdgeId, FlowError> {
        for endpoint in [&edge.source, &edge.target] {
            if !self.nodes.contains_key(endpoint) {
                return Err(FlowError::UnknownNode(endpoint.clone()));
            }
        }
        if edge.source == edge.target {
            return Err(FlowError::SelfLoop(edge.source));
        }
        let duplicate = self.edges.contains_key(&edge.id)
            || self
                .edges
                .values()
                .any(|e| e.source == edge.source && e.target == edge.target);
        if duplicate {
            return Err(FlowError::DuplicateEdge(edge.id));
        }
        let id = edge.id.clone();
        self.edges.insert(id.clone(), edge);
        Ok(id)
    }

    /// Connect two existing nodes with an animated edge `e{source}-{target}`.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<EdgeId, FlowError> {
        let id = self.insert_edge(FlowEdge {
            id: format!("e{}-{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
            animated: true,
        })?;
        log::debug!("connected {} -> {} as {}", source, target, id);
        Ok(id)
    }

    /// Reposition a node. Unknown ids and non-finite coordinates are ignored.
    pub fn move_node(&mut self, id: &str, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.position = Point::new(x, y);
                true
            }
            None => false,
        }
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Option<FlowNode> {
        let node = self.nodes.remove(id)?;
        self.edges.retain(|_, e| e.source != id && e.target != id);
        Some(node)
    }

    pub fn remove_edge(&mut self, id: &str) -> Option<FlowEdge> {
        self.edges.remove(id)
    }

    /// True when every map key matches its entry's id, every node sits at a
    /// finite position, and every edge references existing, distinct nodes.
    pub fn is_consistent(&self) -> bool {
        let nodes_ok = self.nodes.iter().all(|(key, n)| {
            *key == n.id && n.position.x.is_finite() && n.position.y.is_finite()
        });
        nodes_ok
            && self.edges.iter().all(|(key, e)| {
                *key == e.id
                    && e.source != e.target
                    && self.nodes.contains_key(&e.source)
                    && self.nodes.contains_key(&e.target)
            })
    }
}

/// Three-step Start → Process → End diagram shown on a fresh editor.
pub fn default_flow() -> FlowGraph {
    let mut graph = FlowGraph::new();
    let nodes = [
        ("1", 50.0, "Start", NodeKind::Input),
        ("2", 200.0, "Process", NodeKind::Default),
        ("3", 350.0, "End", NodeKind::Output),
    ];
    for (id, y, label, kind) in nodes {
        graph.add_node(FlowNode {
            id: id.to_string(),
            position: Point::new(150.0, y),
            label: label.to_string(),
            kind,
        });
    }
    for (source, target) in [("1", "2"), ("2", "3")] {
        graph.edges.insert(
            format!("e{}-{}", source, target),
            FlowEdge {
                id: format!("e{}-{}", source, target),
                source: source.to_string(),
                target: target.to_string(),
                animated: false,
            },
        );
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flow() {
        let graph = default_flow();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.node("1").unwrap().kind, NodeKind::Input);
        assert!(graph.edge("e2-3").is_some());
        assert!(graph.is_consistent());
    }

    #[test]
    fn test_connect_validates_endpoints() {
        let mut graph = default_flow();
        assert_eq!(
            graph.connect("1", "9"),
            Err(FlowError::UnknownNode("9".to_string()))
        );
        assert_eq!(graph.connect("2", "2"), Err(FlowError::SelfLoop("2".to_string())));
        assert!(matches!(graph.connect("1", "2"), Err(FlowError::DuplicateEdge(_))));

        let id = graph.connect("1", "3").unwrap();
        assert_eq!(id, "e1-3");
        assert!(graph.edge(&id).unwrap().animated);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_remove_node_cascades() {
        let mut graph = default_flow();
        assert!(graph.remove_node("2").is_some());
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_consistent());
        assert!(graph.remove_node("2").is_none());
    }

    #[test]
    fn test_move_node() {
        let mut graph = default_flow();
        assert!(graph.move_node("3", 10.0, 20.0));
        assert_eq!(graph.node("3").unwrap().position, Point::new(10.0, 20.0));
        assert!(!graph.move_node("x", 0.0, 0.0));
        assert!(!graph.move_node("3", f64::NAN, 0.0));
        assert_eq!(graph.node("3").unwrap().position, Point::new(10.0, 20.0));
    }

    #[test]
    fn test_mismatched_keys_are_inconsistent() {
        let mut value = serde_json::to_value(default_flow()).unwrap();
        value["nodes"]["3"]["id"] = "9".into();
        let graph: FlowGraph = serde_json::from_value(value).unwrap();
        assert!(!graph.is_consistent());

        let mut value = serde_json::to_value(default_flow()).unwrap();
        value["edges"]["e1-2"]["id"] = "other".into();
        let graph: FlowGraph = serde_json::from_value(value).unwrap();
        assert!(!graph.is_consistent());
    }
}
