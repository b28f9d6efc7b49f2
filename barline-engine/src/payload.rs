//! Compile payload builder
//!
//! Walks a flow-graph snapshot and assembles the wire request for one bar.
//! Every thought node is normalized to the canonical schema and style-
//! resolved keyed by its own node id; both views are embedded so the
//! compiler uses resolved values without re-deriving them. Pure aside from
//! reading the supplied snapshot.

use crate::compile::CompileRequest;
use crate::graph::FlowGraphSnapshot;
use barline_music::catalog::Capabilities;
use barline_music::{normalize_thought, resolve, ResolveInput};
use serde_json::{json, Value};
use tracing::warn;

pub fn build_compile_payload(
    snapshot: &FlowGraphSnapshot,
    bar_index: u32,
    beat_start: f64,
    beat_end: f64,
    runtime_state: Option<Value>,
    seed: u32,
    bpm: f64,
    capabilities: &Capabilities,
) -> CompileRequest {
    let nodes: Vec<Value> = snapshot
        .nodes
        .iter()
        .map(|node| {
            if node.kind == crate::graph::THOUGHT_KIND {
                let canon = normalize_thought(&node.params);
                let resolved = resolve(&ResolveInput::for_node(&node.id, &canon, capabilities));
                let params = serde_json::to_value(&canon).unwrap_or_else(|e| {
                    warn!(node_id = %node.id, error = %e, "thought params failed to serialize");
                    node.params.clone()
                });
                json!({
                    "id": node.id,
                    "kind": node.kind,
                    "params": params,
                    "resolved": resolved,
                })
            } else {
                serde_json::to_value(node).unwrap_or(Value::Null)
            }
        })
        .collect();

    CompileRequest {
        seed,
        bpm,
        bar_index,
        beat_start,
        beat_end,
        flow_graph: json!({
            "nodes": nodes,
            "edges": snapshot.edges,
        }),
        runtime_state,
        start_node_ids: snapshot.start_node_ids(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{FlowEdge, FlowNode, FlowRuntime};
    use serde_json::json;

    fn snapshot() -> FlowGraphSnapshot {
        FlowGraphSnapshot {
            nodes: vec![
                FlowNode {
                    id: "start-1".into(),
                    kind: "start".into(),
                    params: json!({}),
                },
                FlowNode {
                    id: "node-1".into(),
                    kind: "thought".into(),
                    params: json!({
                        "styleId": "classical_film",
                        "styleSeed": 12345,
                        "rhythmGrid": "1/8",
                    }),
                },
            ],
            edges: vec![FlowEdge {
                from: "start-1".into(),
                to: "node-1".into(),
            }],
            runtime: FlowRuntime {
                active_start_node_id: Some("start-1".into()),
            },
        }
    }

    #[test]
    fn thought_nodes_carry_canonical_and_resolved_views() {
        let caps = Capabilities::default();
        let req = build_compile_payload(&snapshot(), 0, 0.0, 4.0, None, 7, 80.0, &caps);
        let nodes = req.flow_graph["nodes"].as_array().unwrap();
        let thought = &nodes[1];
        assert_eq!(thought["params"]["style"]["id"], "classical_film");
        assert_eq!(thought["params"]["style"]["seed"], 12345);
        assert_eq!(thought["resolved"]["styleId"], "classical_film");
        assert!(thought["resolved"]["notePatternId"].is_string());
        // non-thought nodes pass through untouched
        assert!(nodes[0].get("resolved").is_none());
    }

    #[test]
    fn resolution_is_keyed_by_node_id() {
        let mut snap = snapshot();
        snap.nodes[1].params = json!({
            "styleId": "classical_film",
            "styleSeed": 12345,
            "moodMode": "auto",
        });
        let mut renamed = snap.clone();
        renamed.nodes[1].id = "node-2".into();
        let caps = Capabilities::default();
        let a = build_compile_payload(&snap, 0, 0.0, 4.0, None, 7, 80.0, &caps);
        let b = build_compile_payload(&renamed, 0, 0.0, 4.0, None, 7, 80.0, &caps);
        assert_eq!(a.flow_graph["nodes"][1]["resolved"]["moodId"], "triumphant");
        assert_eq!(b.flow_graph["nodes"][1]["resolved"]["moodId"], "calm");
    }

    #[test]
    fn payload_building_is_pure() {
        let caps = Capabilities::default();
        let snap = snapshot();
        let a = build_compile_payload(&snap, 2, 8.0, 12.0, Some(json!({"x": 1})), 7, 80.0, &caps);
        let b = build_compile_payload(&snap, 2, 8.0, 12.0, Some(json!({"x": 1})), 7, 80.0, &caps);
        assert_eq!(
            serde_json::to_string(&a.flow_graph).unwrap(),
            serde_json::to_string(&b.flow_graph).unwrap()
        );
        assert_eq!(a.runtime_state, b.runtime_state);
    }

    #[test]
    fn start_nodes_follow_runtime_selection() {
        let caps = Capabilities::default();
        let req = build_compile_payload(&snapshot(), 0, 0.0, 4.0, None, 7, 80.0, &caps);
        assert_eq!(req.start_node_ids, vec!["start-1".to_string()]);
    }
}
