use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Describes a tool call request from the model.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// The name of the tool to call.
    pub name: String,
    /// The named arguments to pass to the tool.
    #[serde(rename = "args", default)]
    pub arguments: Map<String, Value>,
    /// The identifier that links the tool result back to this request.
    #[serde(default)]
    pub id: Option<String>,
}

impl ToolCallRequest {
    /// Creates a request for the named tool with no arguments.
    #[inline]
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            arguments: Map::new(),
            id: None,
        }
    }

    /// Sets the correlation identifier.
    #[inline]
    pub fn with_id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Adds a named argument.
    #[inline]
    pub fn with_argument<K: Into<String>, V: Into<Value>>(
        mut self,
        key: K,
        value: V,
    ) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }
}

/// Structured output of an agent step, which may request tool calls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentOutput {
    /// Tool calls requested by the agent, in the order it emitted them.
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRequest>,
    /// Free-form reasoning log that came with the output.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log: String,
}

impl AgentOutput {
    /// Creates an agent output with the given tool calls.
    #[inline]
    pub fn with_tool_calls(tool_calls: impl Into<Vec<ToolCallRequest>>) -> Self {
        Self {
            tool_calls: tool_calls.into(),
            log: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_with_defaults() {
        let req: ToolCallRequest =
            serde_json::from_value(json!({ "name": "echo" })).unwrap();
        assert_eq!(req, ToolCallRequest::new("echo"));

        let req: ToolCallRequest = serde_json::from_value(json!({
            "name": "echo",
            "args": { "x": 1 },
            "id": "c1"
        }))
        .unwrap();
        assert_eq!(req.id.as_deref(), Some("c1"));
        assert_eq!(req.arguments.get("x"), Some(&json!(1)));
    }
}
