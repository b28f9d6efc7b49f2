//! Flow graph snapshots
//!
//! The transport reads the flow graph but never mutates it: each compile
//! payload is built from an immutable [`FlowGraphSnapshot`] taken at
//! dispatch time. Node `params` stay as raw JSON here; the payload builder
//! normalizes and resolves thought nodes on the way out.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::RwLock;

/// Node kind for musical-intent nodes, resolved by the payload builder
pub const THOUGHT_KIND: &str = "thought";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    pub id: String,
    pub kind: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowRuntime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_start_node_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowGraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<FlowNode>,
    #[serde(default)]
    pub edges: Vec<FlowEdge>,
    #[serde(default)]
    pub runtime: FlowRuntime,
}

impl FlowGraphSnapshot {
    /// Entry points for graph traversal: the runtime's active start node if
    /// it names an existing node, otherwise every node without an incoming
    /// edge.
    pub fn start_node_ids(&self) -> Vec<String> {
        if let Some(active) = &self.runtime.active_start_node_id {
            if self.nodes.iter().any(|n| &n.id == active) {
                return vec![active.clone()];
            }
        }
        self.nodes
            .iter()
            .filter(|n| !self.edges.iter().any(|e| e.to == n.id))
            .map(|n| n.id.clone())
            .collect()
    }

    pub fn thought_nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes.iter().filter(|n| n.kind == THOUGHT_KIND)
    }
}

/// Read-only graph access for the scheduler.
pub trait FlowGraphStore: Send + Sync {
    fn snapshot(&self) -> FlowGraphSnapshot;
}

/// Graph store holding one replaceable snapshot in memory.
pub struct InMemoryGraphStore {
    graph: RwLock<FlowGraphSnapshot>,
}

impl InMemoryGraphStore {
    pub fn new(graph: FlowGraphSnapshot) -> Self {
        Self {
            graph: RwLock::new(graph),
        }
    }

    /// Swap in a new graph; subsequent snapshots see the replacement.
    pub fn replace(&self, graph: FlowGraphSnapshot) {
        *self.graph.write().expect("graph lock poisoned") = graph;
    }
}

impl FlowGraphStore for InMemoryGraphStore {
    fn snapshot(&self) -> FlowGraphSnapshot {
        self.graph.read().expect("graph lock poisoned").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: &str, kind: &str) -> FlowNode {
        FlowNode {
            id: id.into(),
            kind: kind.into(),
            params: json!({}),
        }
    }

    #[test]
    fn active_start_node_wins() {
        let graph = FlowGraphSnapshot {
            nodes: vec![node("a", "start"), node("b", THOUGHT_KIND)],
            edges: vec![],
            runtime: FlowRuntime {
                active_start_node_id: Some("b".into()),
            },
        };
        assert_eq!(graph.start_node_ids(), vec!["b".to_string()]);
    }

    #[test]
    fn dangling_active_start_falls_back_to_roots() {
        let graph = FlowGraphSnapshot {
            nodes: vec![node("a", "start"), node("b", THOUGHT_KIND)],
            edges: vec![FlowEdge {
                from: "a".into(),
                to: "b".into(),
            }],
            runtime: FlowRuntime {
                active_start_node_id: Some("gone".into()),
            },
        };
        assert_eq!(graph.start_node_ids(), vec!["a".to_string()]);
    }

    #[test]
    fn thought_nodes_filters_by_kind() {
        let graph = FlowGraphSnapshot {
            nodes: vec![node("a", "start"), node("b", THOUGHT_KIND), node("c", THOUGHT_KIND)],
            edges: vec![],
            runtime: FlowRuntime::default(),
        };
        let ids: Vec<_> = graph.thought_nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn store_replace_is_visible_to_snapshots() {
        let store = InMemoryGraphStore::new(FlowGraphSnapshot::default());
        assert!(store.snapshot().nodes.is_empty());
        store.replace(FlowGraphSnapshot {
            nodes: vec![node("a", THOUGHT_KIND)],
            edges: vec![],
            runtime: FlowRuntime::default(),
        });
        assert_eq!(store.snapshot().nodes.len(), 1);
    }
}
