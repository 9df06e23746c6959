//! Tool call supports.

mod content;
mod error;
mod func;
mod object;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub use content::IntoContent;
pub use error::{Error, ErrorKind};
pub use func::{AsyncFnTool, FnTool};
pub use object::RegisteredTool;
pub(crate) use object::Invocable;

/// The textual result of a tool call.
pub type ToolResult = Result<String, Error>;

/// An asynchronous tool that can be called by the model.
///
/// Implementations of this trait should be stateless, and may not maintain any
/// internal state.
///
/// The tool can be context-aware, meaning it can access additional information
/// about the current execution context, such as the working directory or the
/// current user. To do this, make the context an immutable state of the tool,
/// which can be set during initialization, and copy it when executing.
pub trait Tool: Send + Sync + 'static {
    /// The type of input that the tool accepts.
    type Input: DeserializeOwned;

    /// The type of value that the tool produces.
    type Output: IntoContent;

    /// Returns the name of the tool.
    fn name(&self) -> &str;

    /// Returns the description of the tool.
    fn description(&self) -> &str;

    /// Returns the parameter schema of the tool.
    fn parameter_schema(&self) -> &Value;

    /// Executes the tool with the given input.
    ///
    /// This method must return a future that is fully independent of `self`.
    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = Result<Self::Output, Error>> + Send + 'static;
}

/// A synchronous tool that can be called by the model.
///
/// The call may block. When dispatched from async code, it runs on a
/// blocking worker thread instead of the calling task.
pub trait SyncTool: Send + Sync + 'static {
    /// The type of input that the tool accepts.
    type Input: DeserializeOwned;

    /// The type of value that the tool produces.
    type Output: IntoContent;

    /// Returns the name of the tool.
    fn name(&self) -> &str;

    /// Returns the description of the tool.
    fn description(&self) -> &str;

    /// Returns the parameter schema of the tool.
    fn parameter_schema(&self) -> &Value;

    /// Calls the tool with the given input.
    fn call(&self, input: Self::Input) -> Result<Self::Output, Error>;
}
