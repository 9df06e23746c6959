//! Fake tools for testing purpose.

mod preset;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Map, Value, json};
use tool_relay_core::tool::Error as ToolError;
use tool_relay_core::{SyncTool, Tool};
use tool_relay_model::{ConversationState, Message, ToolCallRequest};

pub use preset::*;

/// A scripted tool that can be registered either as a sync or as an
/// async tool.
///
/// Clones share their call counters, so a clone kept by the test can
/// observe calls made through the registered one.
///
/// # Note
///
/// This type is not optimized for production use. You should only use it
/// for testing.
#[derive(Clone)]
pub struct FakeTool {
    name: String,
    behavior: FakeBehavior,
    delay: Option<Duration>,
    parameter_schema: Value,
    calls: Arc<AtomicUsize>,
    last_arguments: Arc<Mutex<Option<Map<String, Value>>>>,
}

impl FakeTool {
    /// Creates a fake tool with the given behavior.
    #[inline]
    pub fn new<S: Into<String>>(name: S, behavior: FakeBehavior) -> Self {
        Self {
            name: name.into(),
            behavior,
            delay: None,
            parameter_schema: json!({ "type": "object" }),
            calls: Default::default(),
            last_arguments: Default::default(),
        }
    }

    /// Creates a fake tool that returns the argument named `key`.
    #[inline]
    pub fn echo<S: Into<String>>(name: S, key: &str) -> Self {
        Self::new(name, FakeBehavior::Echo(key.to_owned()))
    }

    /// Makes each call take at least `duration`.
    ///
    /// Sync calls sleep the thread, async calls sleep the task.
    #[inline]
    pub fn with_delay(mut self, duration: Duration) -> Self {
        self.delay = Some(duration);
        self
    }

    /// Returns how many times the tool has been called.
    #[inline]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Returns the arguments of the most recent call.
    pub fn last_arguments(&self) -> Option<Map<String, Value>> {
        self.last_arguments
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record(&self, arguments: &Map<String, Value>) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_arguments
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) =
            Some(arguments.clone());
    }
}

impl SyncTool for FakeTool {
    type Input = Map<String, Value>;
    type Output = Value;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "A fake tool"
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn call(&self, input: Self::Input) -> Result<Value, ToolError> {
        self.record(&input);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.behavior.apply(&input)
    }
}

impl Tool for FakeTool {
    type Input = Map<String, Value>;
    type Output = Value;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "A fake tool"
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = Result<Value, ToolError>> + Send + 'static {
        self.record(&input);
        let behavior = self.behavior.clone();
        let delay = self.delay;
        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            behavior.apply(&input)
        }
    }
}

/// Creates a state whose last message is an assistant turn requesting
/// `call`.
#[inline]
pub fn state_with_call(call: ToolCallRequest) -> ConversationState {
    ConversationState::with_messages([
        Message::human("Please help"),
        Message::ai_with_tool_calls("", [call]),
    ])
}
