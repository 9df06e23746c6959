use serde_json::{Map, Value, json};

use super::{Error, IntoContent, SyncTool, Tool};

/// A synchronous tool backed by a closure over the raw argument map.
///
/// See [`ToolNodeBuilder::with_fn`](crate::ToolNodeBuilder::with_fn).
pub struct FnTool<F> {
    name: String,
    description: String,
    parameter_schema: Value,
    f: F,
}

impl<F> FnTool<F> {
    /// Creates a tool with the given name and closure.
    #[inline]
    pub fn new<S: Into<String>>(name: S, f: F) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameter_schema: json!({ "type": "object" }),
            f,
        }
    }

    /// Sets the description offered to the model.
    #[inline]
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the parameter schema offered to the model.
    #[inline]
    pub fn with_parameter_schema(mut self, schema: Value) -> Self {
        self.parameter_schema = schema;
        self
    }
}

impl<F, O> SyncTool for FnTool<F>
where
    F: Fn(Map<String, Value>) -> Result<O, Error> + Send + Sync + 'static,
    O: IntoContent,
{
    type Input = Map<String, Value>;
    type Output = O;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[inline]
    fn call(&self, input: Self::Input) -> Result<O, Error> {
        (self.f)(input)
    }
}

/// An asynchronous tool backed by a closure that returns a future.
///
/// See [`ToolNodeBuilder::with_async_fn`](crate::ToolNodeBuilder::with_async_fn).
pub struct AsyncFnTool<F> {
    inner: FnTool<F>,
}

impl<F> AsyncFnTool<F> {
    /// Creates a tool with the given name and closure.
    #[inline]
    pub fn new<S: Into<String>>(name: S, f: F) -> Self {
        Self {
            inner: FnTool::new(name, f),
        }
    }

    /// Sets the description offered to the model.
    #[inline]
    pub fn with_description<S: Into<String>>(self, description: S) -> Self {
        Self {
            inner: self.inner.with_description(description),
        }
    }

    /// Sets the parameter schema offered to the model.
    #[inline]
    pub fn with_parameter_schema(self, schema: Value) -> Self {
        Self {
            inner: self.inner.with_parameter_schema(schema),
        }
    }
}

impl<F, Fut, O> Tool for AsyncFnTool<F>
where
    F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, Error>> + Send + 'static,
    O: IntoContent,
{
    type Input = Map<String, Value>;
    type Output = O;

    fn name(&self) -> &str {
        &self.inner.name
    }

    fn description(&self) -> &str {
        &self.inner.description
    }

    fn parameter_schema(&self) -> &Value {
        &self.inner.parameter_schema
    }

    #[inline]
    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = Result<O, Error>> + Send + 'static {
        (self.inner.f)(input)
    }
}
