use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{AgentOutput, Message};

/// The state passed between orchestration steps.
///
/// Keys other than `messages` and `agent_output` are kept in `extra` and
/// travel through the dispatcher untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    /// The conversation so far, oldest first.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Structured output of the last agent step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_output: Option<AgentOutput>,
    /// Any other keys of the state.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConversationState {
    /// Creates a state holding the given messages.
    #[inline]
    pub fn with_messages(messages: impl Into<Vec<Message>>) -> Self {
        Self {
            messages: messages.into(),
            ..Default::default()
        }
    }

    /// Sets the agent output.
    #[inline]
    pub fn with_agent_output(mut self, agent_output: AgentOutput) -> Self {
        self.agent_output = Some(agent_output);
        self
    }

    /// Returns the most recent message.
    #[inline]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_extra_keys_are_kept() {
        let input = json!({
            "messages": [{ "type": "human", "data": { "content": "Hi" } }],
            "thread_id": 3
        });
        let state: ConversationState =
            serde_json::from_value(input.clone()).unwrap();
        assert_eq!(state.messages.len(), 1);
        assert!(state.agent_output.is_none());
        assert_eq!(state.extra.get("thread_id"), Some(&json!(3)));
        assert_eq!(serde_json::to_value(&state).unwrap(), input);
    }

    #[test]
    fn test_plain_mapping_messages() {
        let input = json!({
            "messages": [{
                "tool_calls": [{ "name": "echo", "args": { "x": 1 }, "id": "c1" }]
            }]
        });
        let state: ConversationState =
            serde_json::from_value(input.clone()).unwrap();
        assert!(matches!(state.last_message(), Some(Message::Raw(_))));
        assert!(state.extra.is_empty());
        assert_eq!(serde_json::to_value(&state).unwrap(), input);
    }
}
