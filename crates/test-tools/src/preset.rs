use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tool_relay_core::tool::Error as ToolError;

/// What a fake tool does when it is called.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum FakeBehavior {
    /// Returns the value as is.
    #[serde(rename = "return")]
    Return(Value),
    /// Returns the argument with this key, or `null` if it's missing.
    #[serde(rename = "echo")]
    Echo(String),
    /// Fails with an execution error carrying this reason.
    #[serde(rename = "fail")]
    Fail(String),
    /// Panics with this message.
    #[serde(rename = "panic")]
    Panic(String),
}

impl FakeBehavior {
    pub(crate) fn apply(
        &self,
        arguments: &Map<String, Value>,
    ) -> Result<Value, ToolError> {
        match self {
            FakeBehavior::Return(value) => Ok(value.clone()),
            FakeBehavior::Echo(key) => {
                Ok(arguments.get(key).cloned().unwrap_or(Value::Null))
            }
            FakeBehavior::Fail(reason) => {
                Err(ToolError::execution_error().with_reason(reason.clone()))
            }
            FakeBehavior::Panic(message) => panic!("{message}"),
        }
    }
}
