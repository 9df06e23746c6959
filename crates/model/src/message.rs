use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ToolCallRequest;

/// A turn in the conversation.
///
/// Known kinds are serialized as `{"type": <kind>, "data": {...}}`, which
/// is also the layout the persistence layer stores. Any other JSON object
/// is kept as a [`Raw`](Message::Raw) mapping, as is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Message {
    /// The system instructions.
    System(TextMessage),
    /// A user input text.
    Human(TextMessage),
    /// An assistant turn, which may request tool calls.
    Ai(AiMessage),
    /// A tool call result.
    Tool(ToolMessage),
    /// A plain mapping produced by some external collaborator.
    ///
    /// The dispatcher only looks at its `"tool_calls"` key.
    #[serde(untagged)]
    Raw(Map<String, Value>),
}

/// A message that only carries text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMessage {
    /// Identifier assigned once the message is persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The text content.
    pub content: String,
}

/// An assistant message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiMessage {
    /// Identifier assigned once the message is persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The text content.
    #[serde(default)]
    pub content: String,
    /// Tool calls requested in this turn.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,
}

/// The result of calling a tool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolMessage {
    /// Identifier assigned once the message is persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Textual form of the tool output.
    pub content: String,
    /// Name of the tool that produced the output.
    pub name: String,
    /// Identifier of the originating tool call request.
    #[serde(default)]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Creates a system message.
    #[inline]
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::System(TextMessage {
            id: None,
            content: content.into(),
        })
    }

    /// Creates a user message.
    #[inline]
    pub fn human<S: Into<String>>(content: S) -> Self {
        Self::Human(TextMessage {
            id: None,
            content: content.into(),
        })
    }

    /// Creates an assistant message without tool calls.
    #[inline]
    pub fn ai<S: Into<String>>(content: S) -> Self {
        Self::Ai(AiMessage {
            id: None,
            content: content.into(),
            tool_calls: vec![],
        })
    }

    /// Creates an assistant message that requests tool calls.
    #[inline]
    pub fn ai_with_tool_calls<S: Into<String>>(
        content: S,
        tool_calls: impl Into<Vec<ToolCallRequest>>,
    ) -> Self {
        Self::Ai(AiMessage {
            id: None,
            content: content.into(),
            tool_calls: tool_calls.into(),
        })
    }

    /// Returns the short name of this message kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::System(_) => "system",
            Message::Human(_) => "human",
            Message::Ai(_) => "ai",
            Message::Tool(_) => "tool",
            Message::Raw(_) => "raw",
        }
    }

    /// Returns the identifier of this message, if it has one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Message::System(msg) | Message::Human(msg) => msg.id.as_deref(),
            Message::Ai(msg) => msg.id.as_deref(),
            Message::Tool(msg) => msg.id.as_deref(),
            Message::Raw(map) => map.get("id").and_then(Value::as_str),
        }
    }

    /// Replaces the identifier of this message.
    pub fn set_id<S: Into<String>>(&mut self, id: S) {
        let id = id.into();
        match self {
            Message::System(msg) | Message::Human(msg) => msg.id = Some(id),
            Message::Ai(msg) => msg.id = Some(id),
            Message::Tool(msg) => msg.id = Some(id),
            Message::Raw(map) => {
                map.insert("id".to_owned(), Value::String(id));
            }
        }
    }
}
