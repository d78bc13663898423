//! In-memory transport for tests
//!
//! Queue canned responses per operation name; the last response queued for
//! an operation is replayed once the queue drains.

use crate::client::{ApiRequest, ApiResponse, Client, Transport};
use async_trait::async_trait;
use oscflow_cloud::{CloudError, Result};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct Script {
    responses: HashMap<String, VecDeque<ApiResponse>>,
    requests: Vec<ApiRequest>,
}

/// Transport replaying scripted responses
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue a raw response for `operation`.
    pub fn respond(&self, operation: &str, status: u16, body: impl Into<String>) -> &Self {
        self.script()
            .responses
            .entry(operation.to_string())
            .or_default()
            .push_back(ApiResponse {
                status,
                body: body.into(),
            });
        self
    }

    /// Queue a successful response serialized from `output`.
    pub fn ok<O: Serialize>(&self, operation: &str, output: &O) -> &Self {
        let body = serde_json::to_string(output).unwrap_or_default();
        self.respond(operation, 200, body)
    }

    /// Queue an API error with the given code type and details.
    pub fn fail(&self, operation: &str, status: u16, kind: &str, details: &str) -> &Self {
        let body = serde_json::json!({
            "Errors": [{ "Code": status.to_string(), "Type": kind, "Details": details }],
            "ResponseContext": { "RequestId": "scripted" },
        });
        self.respond(operation, status, body.to_string())
    }

    /// Every request sent so far
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.script().requests.clone()
    }

    /// Requests sent for one operation
    pub fn requests_for(&self, operation: &str) -> Vec<ApiRequest> {
        self.script()
            .requests
            .iter()
            .filter(|r| r.operation == operation)
            .cloned()
            .collect()
    }

    /// Number of calls made to `operation`
    pub fn calls(&self, operation: &str) -> usize {
        self.script()
            .requests
            .iter()
            .filter(|r| r.operation == operation)
            .count()
    }

    /// Client sharing this script
    pub fn client(&self) -> Client {
        Client::new(self.clone())
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut script = self.script();
        let operation = request.operation.clone();
        script.requests.push(request);

        let queue = script
            .responses
            .get_mut(&operation)
            .ok_or_else(|| CloudError::Http(format!("no scripted response for {}", operation)))?;

        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };

        response.ok_or_else(|| CloudError::Http(format!("no scripted response for {}", operation)))
    }
}
