//! Compile service wire contract and HTTP client
//!
//! One request per bar; the scheduler never retries. `runtime_state` is an
//! opaque value threaded unchanged from each response into the next bar's
//! request — the transport only carries it, never inspects it.

use crate::error::{Error, Result};
use barline_common::config::CompileConfig;
use barline_common::events::{Diagnostic, NoteEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// One bar's compile request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileRequest {
    pub seed: u32,
    pub bpm: f64,

    /// Loop-relative bar index within the flow graph's cycle
    pub bar_index: u32,

    /// Loop-relative beat range covered by this bar
    pub beat_start: f64,
    pub beat_end: f64,

    /// Graph view with thought nodes carrying canonical + resolved params
    pub flow_graph: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_state: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub start_node_ids: Vec<String>,
}

/// Compile service response for one bar
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileResponse {
    pub events: Vec<NoteEvent>,
    pub runtime_state: Option<Value>,
    pub debug_trace: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// The external compile operation the scheduler dispatches against.
pub trait CompileService: Send + Sync {
    fn compile(&self, request: CompileRequest)
        -> impl Future<Output = Result<CompileResponse>> + Send;
}

/// HTTP client for a remote compile service.
pub struct HttpCompileService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCompileService {
    pub fn new(config: &CompileConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/compile", config.base_url.trim_end_matches('/')),
        })
    }
}

impl CompileService for HttpCompileService {
    fn compile(
        &self,
        request: CompileRequest,
    ) -> impl Future<Output = Result<CompileResponse>> + Send {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        async move {
            debug!(bar_index = request.bar_index, "sending compile request");
            let response = client.post(&endpoint).json(&request).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(Error::Compile(format!(
                    "compile endpoint returned {status}"
                )));
            }
            let body: CompileResponse = response.json().await?;
            debug!(
                events = body.events.len(),
                diagnostics = body.diagnostics.len(),
                "compile response received"
            );
            Ok(body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_camel_case_and_skips_empty() {
        let req = CompileRequest {
            seed: 42,
            bpm: 80.0,
            bar_index: 3,
            beat_start: 12.0,
            beat_end: 16.0,
            flow_graph: json!({"nodes": [], "edges": []}),
            runtime_state: None,
            start_node_ids: vec![],
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["barIndex"], 3);
        assert_eq!(value["beatStart"], 12.0);
        assert!(value.get("runtimeState").is_none());
        assert!(value.get("startNodeIds").is_none());
    }

    #[test]
    fn response_defaults_missing_fields() {
        let body: CompileResponse = serde_json::from_str(r#"{"events": []}"#).unwrap();
        assert!(body.events.is_empty());
        assert!(body.runtime_state.is_none());
        assert!(body.diagnostics.is_empty());
        assert!(body.debug_trace.is_empty());
    }

    #[test]
    fn response_carries_opaque_runtime_state() {
        let body: CompileResponse = serde_json::from_str(
            r#"{"events": [], "runtimeState": {"voices": {"n1": 3}}}"#,
        )
        .unwrap();
        assert_eq!(body.runtime_state.unwrap()["voices"]["n1"], 3);
    }
}
