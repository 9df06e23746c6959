//! Data types shared between the tool dispatcher and its collaborators.
//!
//! This crate describes what a conversation looks like when it is handed
//! to the dispatcher: the ordered messages, an optional structured agent
//! output, and the tool call requests either of them may carry.
//!
//! Types in this crate don't define any dispatch behavior. They are the
//! shapes that orchestrators produce and consume, and they serialize to
//! the same JSON layout that the persistence layer stores.

#![deny(missing_docs)]

mod definition;
mod message;
mod state;
mod tool_call;

pub use definition::*;
pub use message::*;
pub use state::*;
pub use tool_call::*;
