use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::io;

use crate::tool;

/// Errors returned when dispatching a tool call.
#[derive(Debug)]
pub enum Error {
    /// The request names a tool that is not registered.
    UnknownTool(String),
    /// A raw tool call entry could not be read as a request.
    MalformedRequest(String),
    /// Blocking dispatch of an asynchronous tool was attempted from a
    /// thread that already runs inside a Tokio runtime.
    NestedRuntime,
    /// The runtime used to execute the tool failed.
    Runtime(io::Error),
    /// The tool itself failed.
    Tool {
        /// Name of the failed tool.
        name: String,
        /// The error returned by the tool.
        source: tool::Error,
    },
}

impl Error {
    /// Returns the tool error if this error came from the tool itself.
    #[inline]
    pub fn tool_error(&self) -> Option<&tool::Error> {
        match self {
            Error::Tool { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownTool(name) => {
                write!(f, "unknown tool '{name}' requested by model")
            }
            Error::MalformedRequest(reason) => {
                write!(f, "malformed tool call request: {reason}")
            }
            Error::NestedRuntime => f.write_str(
                "cannot block on an async tool from within a running runtime",
            ),
            Error::Runtime(err) => write!(f, "runtime error: {err}"),
            Error::Tool { name, source } => {
                write!(f, "tool '{name}' failed: {source}")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Runtime(err) => Some(err),
            Error::Tool { source, .. } => Some(source),
            _ => None,
        }
    }
}
