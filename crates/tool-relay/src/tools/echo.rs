use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use tool_relay_core::SyncTool;
use tool_relay_core::tool::Error as ToolError;

#[derive(Deserialize, JsonSchema)]
pub struct EchoToolParameters {
    #[schemars(description = "The value to send back.")]
    x: Value,
}

/// A tool that returns its `x` argument.
///
/// Useful for checking that an orchestration loop wires tool calls and
/// results correctly.
pub struct EchoTool {
    parameter_schema: Value,
}

impl EchoTool {
    /// Creates a new echo tool.
    #[inline]
    pub fn new() -> Self {
        EchoTool {
            parameter_schema: schema_for!(EchoToolParameters).to_value(),
        }
    }
}

impl Default for EchoTool {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SyncTool for EchoTool {
    type Input = EchoToolParameters;
    type Output = Value;

    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Returns the value of `x` unchanged."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn call(&self, input: EchoToolParameters) -> Result<Value, ToolError> {
        Ok(input.x)
    }
}
