//! Ready-to-use tools and a tool node that bundles them.
//!
//! The crate includes a CLI tool that applies the node to a conversation
//! state stored as JSON. You can also use it as a library to get the
//! built-in tools into your own orchestration loop.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod tools;

use tool_relay_core::ToolNode;

use crate::tools::*;

/// Creates a tool node with every built-in tool registered.
pub fn default_tool_node() -> ToolNode {
    let node = ToolNode::builder().with_sync_tool(EchoTool::new()).build();
    debug!("built-in tools: {:?}", node.tool_names());
    node
}

/// Re-exports of [`tool_relay_core`] crate.
pub mod core {
    pub use tool_relay_core::*;
}

/// Re-exports of [`tool_relay_model`] crate.
pub mod model {
    pub use tool_relay_model::*;
}
