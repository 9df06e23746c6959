mod builder;
mod carrier;
#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use tokio::task::spawn_blocking;
use tool_relay_model::{
    ConversationState, Message, ToolCallRequest, ToolDefinition, ToolMessage,
};
use tracing::Instrument;

use crate::Error;
use crate::runtime::block_on_dedicated;
use crate::tool::{Invocable, RegisteredTool};
pub use builder::ToolNodeBuilder;
pub use carrier::{CallCarrier, pending_call};

/// Runs the pending tool call of a conversation state and appends the
/// result as a tool message.
///
/// The registry is fixed at construction and read-only afterwards, so a
/// node can be shared freely between threads and tasks. Each call
/// handles at most one tool call: the first one of the carrier found by
/// [`CallCarrier::locate`]. When there is nothing pending, the state is
/// passed through unchanged.
///
/// Two execution modes are offered, with equal results:
///
/// - [`invoke`](Self::invoke) blocks the calling thread. Async tools are
///   driven on a dedicated runtime, so this mode must not be used from
///   inside a Tokio runtime when the tool is async.
/// - [`ainvoke`](Self::ainvoke) suspends the calling task. Sync tools are
///   moved to the blocking thread pool.
#[derive(Clone, Default)]
pub struct ToolNode {
    tools: HashMap<String, RegisteredTool>,
}

impl ToolNode {
    /// Creates a node from an ordered collection of tools.
    ///
    /// When two tools share a name, the one that comes later wins.
    pub fn new<I: IntoIterator<Item = RegisteredTool>>(tools: I) -> Self {
        let tools = tools.into_iter();
        let mut tool_map = HashMap::with_capacity(tools.size_hint().0);
        for tool in tools {
            let name = tool.name().to_owned();
            if let Some(previous) = tool_map.insert(name, tool) {
                warn!(
                    "tool `{}` registered more than once, keeping the last one",
                    previous.name()
                );
            }
        }
        Self { tools: tool_map }
    }

    /// Returns a builder for a node.
    #[inline]
    pub fn builder() -> ToolNodeBuilder {
        ToolNodeBuilder::default()
    }

    /// Returns whether a tool with this name is registered.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Returns the names of the registered tools, sorted.
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the definitions of the registered tools, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<_> =
            self.tools.values().map(RegisteredTool::definition).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Dispatches the pending tool call of `state`, blocking the current
    /// thread until the tool finishes.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownTool`] if the requested tool is not registered.
    /// - [`Error::NestedRuntime`] if the tool is async and this thread is
    ///   already inside a Tokio runtime.
    /// - [`Error::Tool`] if the tool fails.
    pub fn invoke(
        &self,
        state: &ConversationState,
    ) -> Result<ConversationState, Error> {
        let span = debug_span!("tool node", mode = "blocking");
        let _enter = span.enter();

        let Some((call, tool)) = self.resolve(state)? else {
            return Ok(state.clone());
        };
        let ToolCallRequest {
            name,
            arguments,
            id,
        } = call;

        let result = match &tool.invocable {
            Invocable::Sync(tool) => tool.call(arguments),
            Invocable::Async(tool) => {
                block_on_dedicated(tool.execute(arguments))?
            }
        };
        let content = result.map_err(|source| {
            debug!("tool failed: {source}");
            Error::Tool {
                name: name.clone(),
                source,
            }
        })?;

        Ok(append_result(state, name, id, content))
    }

    /// Dispatches the pending tool call of `state`, suspending the
    /// current task until the tool finishes.
    ///
    /// If a sync tool panics on the blocking thread, the panic is resumed
    /// here, as it would be in [`invoke`](Self::invoke).
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownTool`] if the requested tool is not registered.
    /// - [`Error::Tool`] if the tool fails.
    pub async fn ainvoke(
        &self,
        state: &ConversationState,
    ) -> Result<ConversationState, Error> {
        let span = debug_span!("tool node", mode = "async");
        let resolved = span.in_scope(|| self.resolve(state))?;
        let Some((call, tool)) = resolved else {
            return Ok(state.clone());
        };
        let ToolCallRequest {
            name,
            arguments,
            id,
        } = call;

        let result = match &tool.invocable {
            Invocable::Sync(tool) => {
                let tool = Arc::clone(tool);
                let joined = spawn_blocking(move || tool.call(arguments))
                    .instrument(span.clone())
                    .await;
                match joined {
                    Ok(result) => result,
                    Err(err) if err.is_panic() => {
                        std::panic::resume_unwind(err.into_panic())
                    }
                    Err(err) => return Err(Error::Runtime(io::Error::other(err))),
                }
            }
            Invocable::Async(tool) => {
                tool.execute(arguments).instrument(span.clone()).await
            }
        };
        let content = result.map_err(|source| {
            span.in_scope(|| debug!("tool failed: {source}"));
            Error::Tool {
                name: name.clone(),
                source,
            }
        })?;

        Ok(append_result(state, name, id, content))
    }

    /// Applies [`invoke`](Self::invoke) to each state in order.
    ///
    /// Stops at the first error.
    pub fn batch(
        &self,
        states: &[ConversationState],
    ) -> Result<Vec<ConversationState>, Error> {
        states.iter().map(|state| self.invoke(state)).collect()
    }

    /// Applies [`ainvoke`](Self::ainvoke) to each state in order, one at
    /// a time.
    ///
    /// Stops at the first error.
    pub async fn abatch(
        &self,
        states: &[ConversationState],
    ) -> Result<Vec<ConversationState>, Error> {
        let mut results = Vec::with_capacity(states.len());
        for state in states {
            results.push(self.ainvoke(state).await?);
        }
        Ok(results)
    }

    fn resolve(
        &self,
        state: &ConversationState,
    ) -> Result<Option<(ToolCallRequest, &RegisteredTool)>, Error> {
        let Some(call) = pending_call(state)? else {
            debug!("no pending tool call");
            return Ok(None);
        };
        let Some(tool) = self.tools.get(&call.name) else {
            warn!("tool not found: {}", call.name);
            return Err(Error::UnknownTool(call.name));
        };
        trace!(
            "dispatching `{}` ({:?}) with args: {:?}",
            call.name, call.id, call.arguments
        );
        Ok(Some((call, tool)))
    }
}

fn append_result(
    state: &ConversationState,
    name: String,
    tool_call_id: Option<String>,
    content: String,
) -> ConversationState {
    let mut messages = Vec::with_capacity(state.messages.len() + 1);
    messages.extend(state.messages.iter().cloned());
    messages.push(Message::Tool(ToolMessage {
        id: None,
        content,
        name,
        tool_call_id,
    }));

    ConversationState {
        messages,
        agent_output: state.agent_output.clone(),
        extra: state.extra.clone(),
    }
}
