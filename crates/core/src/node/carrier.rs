use serde_json::{Map, Value};
use tool_relay_model::{
    AgentOutput, AiMessage, ConversationState, Message, ToolCallRequest,
};

use crate::Error;

/// The part of a conversation state that carries pending tool calls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CallCarrier<'a> {
    /// Structured agent output with at least one tool call.
    AgentOutput(&'a AgentOutput),
    /// The last message, an assistant turn with at least one tool call.
    Assistant(&'a AiMessage),
    /// The last message, a raw mapping with a non-empty `"tool_calls"`
    /// list.
    Mapping(&'a Map<String, Value>),
}

impl<'a> CallCarrier<'a> {
    /// Finds the carrier of the pending tool calls in `state`.
    ///
    /// Agent output takes precedence over the last message. Only the last
    /// message is inspected.
    pub fn locate(state: &'a ConversationState) -> Option<Self> {
        if let Some(output) = &state.agent_output {
            if !output.tool_calls.is_empty() {
                return Some(CallCarrier::AgentOutput(output));
            }
        }

        match state.last_message()? {
            Message::Ai(msg) if !msg.tool_calls.is_empty() => {
                Some(CallCarrier::Assistant(msg))
            }
            Message::Raw(map) => match map.get("tool_calls") {
                Some(Value::Array(calls)) if !calls.is_empty() => {
                    Some(CallCarrier::Mapping(map))
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns the first tool call of this carrier.
    pub fn first_call(&self) -> Result<ToolCallRequest, Error> {
        match self {
            CallCarrier::AgentOutput(output) => {
                Ok(output.tool_calls[0].clone())
            }
            CallCarrier::Assistant(msg) => Ok(msg.tool_calls[0].clone()),
            CallCarrier::Mapping(map) => {
                match map.get("tool_calls").and_then(Value::as_array) {
                    Some(calls) if !calls.is_empty() => parse_raw_call(&calls[0]),
                    _ => Err(Error::MalformedRequest(
                        "`tool_calls` is not a non-empty list".to_owned(),
                    )),
                }
            }
        }
    }
}

/// Returns the pending tool call of `state`, if there is one.
///
/// This is what [`ToolNode`](crate::ToolNode) would dispatch, which makes it
/// suitable for routing decisions in an orchestration loop.
pub fn pending_call(
    state: &ConversationState,
) -> Result<Option<ToolCallRequest>, Error> {
    CallCarrier::locate(state)
        .map(|carrier| carrier.first_call())
        .transpose()
}

fn parse_raw_call(entry: &Value) -> Result<ToolCallRequest, Error> {
    let Value::Object(entry) = entry else {
        return Err(Error::MalformedRequest(
            "tool call entry is not a mapping".to_owned(),
        ));
    };

    let name = match entry.get("name") {
        Some(Value::String(name)) => name.clone(),
        _ => {
            return Err(Error::MalformedRequest(
                "tool call entry has no `name`".to_owned(),
            ));
        }
    };
    let arguments = match entry.get("args") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(args)) => args.clone(),
        Some(_) => {
            return Err(Error::MalformedRequest(format!(
                "`args` of tool call `{name}` is not a mapping"
            )));
        }
    };
    let id = match entry.get("id") {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id.clone()),
        Some(other) => Some(other.to_string()),
    };

    Ok(ToolCallRequest {
        name,
        arguments,
        id,
    })
}
