//! Outscale API client
//!
//! Every API call goes through [`Client::execute`], keyed by an
//! [`Operation`](crate::operations::Operation) type. The wire itself sits
//! behind the [`Transport`] trait so tests can replay canned responses.

use crate::models::ErrorResponse;
use crate::operations::Operation;
use async_trait::async_trait;
use oscflow_cloud::{CloudError, ErrorKind, Result, classify};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = concat!("oscflow/", env!("CARGO_PKG_VERSION"));

/// A fully built API request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Operation name (e.g., "ReadSecurityGroups")
    pub operation: String,
    pub method: Method,
    /// Path relative to the endpoint
    pub path: String,
    /// Serialized input
    pub body: serde_json::Value,
}

/// Raw API response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the control plane
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Access key pair
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

/// HTTP transport backed by reqwest
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    credentials: Credentials,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, credentials: Credentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CloudError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = format!("{}{}", self.endpoint, request.path);

        let response = self
            .client
            .request(request.method, &url)
            .basic_auth(
                &self.credentials.access_key,
                Some(&self.credentials.secret_key),
            )
            .json(&request.body)
            .send()
            .await
            .map_err(|e| CloudError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CloudError::Http(e.to_string()))?;

        Ok(ApiResponse { status, body })
    }
}

/// Shared API client handle
///
/// Cheap to clone; inject it into every CRUD call instead of holding it in
/// global state.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Client talking HTTP to `endpoint`
    pub fn http(endpoint: impl Into<String>, credentials: Credentials) -> Result<Self> {
        Ok(Self::new(HttpTransport::new(endpoint, credentials)?))
    }

    /// Build a request for a named operation.
    pub fn new_request<I: Serialize>(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        input: &I,
    ) -> Result<ApiRequest> {
        Ok(ApiRequest {
            operation: operation.to_string(),
            method,
            path: path.to_string(),
            body: serde_json::to_value(input)?,
        })
    }

    /// Send a request and decode its output.
    ///
    /// An empty success body decodes to `O::default()`.
    pub async fn send<O: DeserializeOwned + Default>(&self, request: ApiRequest) -> Result<O> {
        let operation = request.operation.clone();
        tracing::debug!("Calling {} {}", request.method, operation);

        let response = self.transport.send(request).await?;

        if !response.is_success() {
            let error = decode_error(&operation, &response);
            tracing::debug!("{} returned HTTP {}: {}", operation, response.status, error);
            return Err(error);
        }

        if response.body.trim().is_empty() {
            return Ok(O::default());
        }

        serde_json::from_str(&response.body).map_err(|e| CloudError::Api {
            operation,
            kind: ErrorKind::Other,
            message: format!("cannot decode response: {}", e),
        })
    }

    /// Execute `Op`, using a zero-value input when none is given.
    pub async fn execute<Op: Operation>(&self, input: Option<Op::Input>) -> Result<Op::Output> {
        let input = input.unwrap_or_default();
        let request = self.new_request(Op::NAME, Op::METHOD, &Op::path(), &input)?;
        self.send(request).await
    }

    pub async fn call<Op: Operation>(&self, input: Op::Input) -> Result<Op::Output> {
        self.execute::<Op>(Some(input)).await
    }
}

/// Turn an error response into a classified [`CloudError::Api`].
pub fn decode_error(operation: &str, response: &ApiResponse) -> CloudError {
    let parsed: Option<ErrorResponse> = serde_json::from_str(&response.body).ok();

    let mut message = match &parsed {
        Some(body) if !body.errors.is_empty() => body
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; "),
        _ if response.body.trim().is_empty() => format!("HTTP {}", response.status),
        _ => response.body.trim().to_string(),
    };

    if let Some(request_id) = parsed
        .as_ref()
        .and_then(|b| b.response_context.as_ref())
        .and_then(|c| c.request_id.as_deref())
    {
        message.push_str(&format!(" [RequestId: {}]", request_id));
    }

    let kind = match response.status {
        429 | 503 => ErrorKind::Throttled,
        _ => classify(&message),
    };

    CloudError::Api {
        operation: operation.to_string(),
        kind,
        message,
    }
}
