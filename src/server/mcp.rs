//! MCP service wiring.
//!
//! Exposes the scanned files as MCP resources and the dataset-slicing tool
//! over stdio. All domain work happens in [`super::handlers`]; this module
//! only adapts it to the protocol types and maps [`RequestError`]s onto MCP
//! error codes or error-flagged tool results.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    AnnotateAble, CallToolResult, Content, Implementation, ListResourcesResult,
    PaginatedRequestParam, RawResource, ReadResourceRequestParam, ReadResourceResult,
    ResourceContents, ServerCapabilities, ServerInfo,
};
use rmcp::schemars;
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt};
use serde::Deserialize;
use tracing::error;

use crate::error::{RequestError, StoreError};
use crate::store::Hdf5Store;

use super::handlers;

// =============================================================================
// Tool Input
// =============================================================================

/// Input for the `read_dataset_slice` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReadDatasetSliceRequest {
    /// Address of the dataset to read
    #[schemars(
        description = "The HDF5 URI pointing to the dataset (e.g. h5:///path/to/file.h5?path=/dataset)"
    )]
    pub uri: String,

    /// Slice expression applied to the dataset dimensions
    #[schemars(
        description = "NumPy-style slice string (e.g. '0:10', ':', '0:10, 5:15', '...')"
    )]
    pub slice_str: String,
}

// =============================================================================
// Service
// =============================================================================

/// MCP service serving one scanned directory of HDF5 files.
///
/// The file list is fixed at startup and shared immutably; every request
/// opens its own read-only file handle, so the service needs no locking.
#[derive(Clone)]
pub struct H5BridgeService {
    store: Hdf5Store,
    files: Arc<Vec<PathBuf>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl H5BridgeService {
    pub fn new(store: Hdf5Store, files: Vec<PathBuf>) -> Self {
        Self {
            store,
            files: Arc::new(files),
            tool_router: Self::tool_router(),
        }
    }

    /// Files served by this instance.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    #[tool(description = "Read a slice of data from an HDF5 dataset")]
    async fn read_dataset_slice(
        &self,
        Parameters(request): Parameters<ReadDatasetSliceRequest>,
    ) -> Result<CallToolResult, McpError> {
        match handlers::slice_dataset(&self.store, &request.uri, &request.slice_str) {
            Ok(json) => Ok(CallToolResult::success(vec![Content::text(json)])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(format!(
                "Error: {e}"
            ))])),
        }
    }

    /// Serve MCP over stdio until the peer disconnects.
    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self
            .serve((tokio::io::stdin(), tokio::io::stdout()))
            .await?;
        service.waiting().await?;
        Ok(())
    }
}

#[tool_handler]
impl ServerHandler for H5BridgeService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Exposes HDF5 files as resources addressed by h5:// URIs. Read a resource to \
                 inspect a group, dataset, or link; use the read_dataset_slice tool with a \
                 NumPy-style slice string to retrieve data."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let resources = handlers::list_resources(&self.files)
            .into_iter()
            .map(|entry| {
                let mut resource = RawResource::new(entry.uri, entry.name);
                resource.description = Some(entry.description);
                resource.mime_type = Some(entry.mime_type.to_string());
                resource.no_annotation()
            })
            .collect();

        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = handlers::read_resource(&self.store, &request.uri).map_err(|e| {
            error!("failed to read resource '{}': {e}", request.uri);
            to_mcp_error(&request.uri, e)
        })?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}

/// Map request failures onto MCP error codes: addressing mistakes are
/// `resource_not_found`, malformed input is `invalid_params`, everything
/// else is internal.
fn to_mcp_error(uri: &str, error: RequestError) -> McpError {
    let message = format!("Failed to read resource '{uri}': {error}");
    match error {
        RequestError::Store(StoreError::FileNotFound(_))
        | RequestError::Store(StoreError::PathNotFound { .. }) => {
            McpError::resource_not_found(message, Some(serde_json::json!({ "uri": uri })))
        }
        RequestError::Uri(_) | RequestError::Slice(_) => McpError::invalid_params(message, None),
        _ => McpError::internal_error(message, None),
    }
}

// =============================================================================
// Tests
// =============================================================================
