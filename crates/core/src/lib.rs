//! Tool dispatch: finds the pending tool call in a conversation state,
//! runs the matching tool, and appends its result to the conversation.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod error;
mod node;
pub mod runtime;
pub mod tool;

pub use error::Error;
pub use node::{CallCarrier, ToolNode, ToolNodeBuilder, pending_call};
pub use tool::{RegisteredTool, SyncTool, Tool};
