use serde_json::{Map, Value};

use super::ToolNode;
use crate::tool::{
    AsyncFnTool, Error as ToolError, FnTool, IntoContent, RegisteredTool,
    SyncTool, Tool,
};

/// [`ToolNode`] builder.
///
/// Tools are kept in registration order; a later tool replaces an
/// earlier one with the same name.
#[derive(Default)]
pub struct ToolNodeBuilder {
    tools: Vec<RegisteredTool>,
}

impl ToolNodeBuilder {
    /// Registers an asynchronous tool.
    #[inline]
    pub fn with_tool<T: Tool>(mut self, tool: T) -> Self {
        self.tools.push(RegisteredTool::from_async(tool));
        self
    }

    /// Registers a synchronous tool.
    #[inline]
    pub fn with_sync_tool<T: SyncTool>(mut self, tool: T) -> Self {
        self.tools.push(RegisteredTool::from_sync(tool));
        self
    }

    /// Registers an already type-erased tool.
    #[inline]
    pub fn with_registered(mut self, tool: RegisteredTool) -> Self {
        self.tools.push(tool);
        self
    }

    /// Registers a synchronous closure as a tool.
    #[inline]
    pub fn with_fn<S, F, O>(self, name: S, f: F) -> Self
    where
        S: Into<String>,
        F: Fn(Map<String, Value>) -> Result<O, ToolError>
            + Send
            + Sync
            + 'static,
        O: IntoContent,
    {
        self.with_sync_tool(FnTool::new(name, f))
    }

    /// Registers an asynchronous closure as a tool.
    #[inline]
    pub fn with_async_fn<S, F, Fut, O>(self, name: S, f: F) -> Self
    where
        S: Into<String>,
        F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, ToolError>> + Send + 'static,
        O: IntoContent,
    {
        self.with_tool(AsyncFnTool::new(name, f))
    }

    /// Builds the node.
    #[inline]
    pub fn build(self) -> ToolNode {
        ToolNode::new(self.tools)
    }
}
