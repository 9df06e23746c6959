use std::fmt::{self, Debug};
use std::pin::Pin;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tool_relay_model::ToolDefinition;
use tracing::Instrument;

use super::{Error, IntoContent, SyncTool, Tool, ToolResult};

pub(crate) type BoxedToolFuture =
    Pin<Box<dyn Future<Output = ToolResult> + Send>>;

pub(crate) trait SyncToolObject: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn parameter_schema(&self) -> &Value;

    fn call(&self, arguments: Map<String, Value>) -> ToolResult;
}

pub(crate) trait AsyncToolObject: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn parameter_schema(&self) -> &Value;

    fn execute(&self, arguments: Map<String, Value>) -> BoxedToolFuture;
}

struct SyncToolImpl<T: SyncTool>(T);

impl<T: SyncTool> SyncToolObject for SyncToolImpl<T> {
    #[inline]
    fn name(&self) -> &str {
        self.0.name()
    }

    #[inline]
    fn description(&self) -> &str {
        self.0.description()
    }

    #[inline]
    fn parameter_schema(&self) -> &Value {
        self.0.parameter_schema()
    }

    fn call(&self, arguments: Map<String, Value>) -> ToolResult {
        let input = decode_input::<T::Input>(arguments)?;
        let _enter = debug_span!("tool call", tool = self.0.name()).entered();
        self.0.call(input).map(IntoContent::into_content)
    }
}

struct AsyncToolImpl<T: Tool>(T);

impl<T: Tool> AsyncToolObject for AsyncToolImpl<T> {
    #[inline]
    fn name(&self) -> &str {
        self.0.name()
    }

    #[inline]
    fn description(&self) -> &str {
        self.0.description()
    }

    #[inline]
    fn parameter_schema(&self) -> &Value {
        self.0.parameter_schema()
    }

    fn execute(&self, arguments: Map<String, Value>) -> BoxedToolFuture {
        let input = match decode_input::<T::Input>(arguments) {
            Ok(input) => input,
            Err(err) => return Box::pin(std::future::ready(Err(err))),
        };
        let fut = self.0.execute(input);
        Box::pin(
            async move { fut.await.map(IntoContent::into_content) }
                .instrument(debug_span!("tool execute", tool = self.0.name())),
        )
    }
}

fn decode_input<I: DeserializeOwned>(
    arguments: Map<String, Value>,
) -> Result<I, Error> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|err| Error::invalid_input().with_reason(format!("{err}")))
}

/// The two capabilities a registered tool may have.
#[derive(Clone)]
pub(crate) enum Invocable {
    Sync(Arc<dyn SyncToolObject>),
    Async(Arc<dyn AsyncToolObject>),
}

/// A type-erased tool, ready to be registered in a
/// [`ToolNode`](crate::ToolNode).
#[derive(Clone)]
pub struct RegisteredTool {
    pub(crate) invocable: Invocable,
}

impl RegisteredTool {
    /// Wraps an asynchronous tool.
    #[inline]
    pub fn from_async<T: Tool>(tool: T) -> Self {
        Self {
            invocable: Invocable::Async(Arc::new(AsyncToolImpl(tool))),
        }
    }

    /// Wraps a synchronous tool.
    #[inline]
    pub fn from_sync<T: SyncTool>(tool: T) -> Self {
        Self {
            invocable: Invocable::Sync(Arc::new(SyncToolImpl(tool))),
        }
    }

    /// Returns the name of the tool.
    pub fn name(&self) -> &str {
        match &self.invocable {
            Invocable::Sync(tool) => tool.name(),
            Invocable::Async(tool) => tool.name(),
        }
    }

    /// Returns whether the tool is natively asynchronous.
    #[inline]
    pub fn is_async(&self) -> bool {
        matches!(self.invocable, Invocable::Async(_))
    }

    /// Returns the definition to offer to the model.
    pub fn definition(&self) -> ToolDefinition {
        let (name, description, parameters) = match &self.invocable {
            Invocable::Sync(tool) => {
                (tool.name(), tool.description(), tool.parameter_schema())
            }
            Invocable::Async(tool) => {
                (tool.name(), tool.description(), tool.parameter_schema())
            }
        };
        ToolDefinition {
            name: name.to_owned(),
            description: description.to_owned(),
            parameters: parameters.clone(),
        }
    }
}

impl Debug for RegisteredTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("name", &self.name())
            .field("is_async", &self.is_async())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::future::ready;

    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::tool::ErrorKind;

    static EMPTY_SCHEMA: &Value = &Value::Null;

    #[derive(Deserialize)]
    struct AddInput {
        a: i64,
        b: i64,
    }

    struct AddTool;

    impl SyncTool for AddTool {
        type Input = AddInput;
        type Output = i64;

        fn name(&self) -> &str {
            "add"
        }

        fn description(&self) -> &str {
            "Adds two numbers"
        }

        fn parameter_schema(&self) -> &Value {
            EMPTY_SCHEMA
        }

        fn call(&self, input: AddInput) -> Result<i64, Error> {
            Ok(input.a + input.b)
        }
    }

    struct GreetTool;

    impl Tool for GreetTool {
        type Input = Map<String, Value>;
        type Output = String;

        fn name(&self) -> &str {
            "greet"
        }

        fn description(&self) -> &str {
            "Greets someone"
        }

        fn parameter_schema(&self) -> &Value {
            EMPTY_SCHEMA
        }

        fn execute(
            &self,
            input: Self::Input,
        ) -> impl Future<Output = Result<String, Error>> + Send + 'static {
            let who = input
                .get("who")
                .and_then(Value::as_str)
                .unwrap_or("nobody")
                .to_owned();
            ready(Ok(format!("Hello, {who}!")))
        }
    }

    fn arguments(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_sync_call_decodes_input() {
        let tool = RegisteredTool::from_sync(AddTool);
        let Invocable::Sync(object) = &tool.invocable else {
            unreachable!();
        };
        let result = object.call(arguments(json!({ "a": 1, "b": 2 })));
        assert_eq!(result.unwrap(), "3");

        let err = object.call(arguments(json!({ "a": "x" }))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_async_execute() {
        let tool = RegisteredTool::from_async(GreetTool);
        assert!(tool.is_async());
        let Invocable::Async(object) = &tool.invocable else {
            unreachable!();
        };
        let result = object.execute(arguments(json!({ "who": "Ada" }))).await;
        assert_eq!(result.unwrap(), "Hello, Ada!");
    }

    #[test]
    fn test_definition() {
        let definition = RegisteredTool::from_sync(AddTool).definition();
        assert_eq!(definition.name, "add");
        assert_eq!(definition.description, "Adds two numbers");
        assert_eq!(definition.parameters, Value::Null);
    }
}
