//! HTTP client for an MCP tool runtime.
//!
//! `GET {base}/health` decides connectivity; `POST {base}/tools/execute`
//! runs a [`ToolRequest`] and answers with a [`ToolResult`].

use async_trait::async_trait;
use braid_core::error::{BraidError, BraidResult};
use braid_core::traits::{ToolExecutor, ToolRequest, ToolResult};
use tracing::debug;

use crate::config::HttpBackendConfig;
use crate::http::JsonEndpoint;

/// MCP tool runtime over HTTP.
#[derive(Debug, Clone)]
pub struct HttpToolRuntime {
    endpoint: JsonEndpoint,
}

impl HttpToolRuntime {
    pub fn new(config: &HttpBackendConfig) -> BraidResult<Self> {
        Ok(Self {
            endpoint: JsonEndpoint::new("mcp", config)?,
        })
    }
}

#[async_trait]
impl ToolExecutor for HttpToolRuntime {
    async fn is_connected(&self) -> bool {
        self.endpoint.probe("health").await
    }

    async fn execute(&self, request: ToolRequest) -> BraidResult<ToolResult> {
        debug!(tool = %request.tool, "executing MCP tool");
        let result: ToolResult = self
            .endpoint
            .post("tools/execute", &request)
            .await
            .map_err(|e| match e {
                BraidError::Backend { message, .. } => {
                    BraidError::tool(format!("{} failed: {}", request.tool, message))
                }
                other => other,
            })?;
        Ok(result)
    }
}
