use std::time::Duration;

use serde_json::{Map, Value, json};
use tool_relay_model::{AgentOutput, ConversationState, Message, ToolCallRequest};

use super::*;
use crate::tool::Error as ToolError;

fn echo_node() -> ToolNode {
    ToolNode::builder()
        .with_fn("echo", |args: Map<String, Value>| {
            Ok(args.get("x").cloned().unwrap_or(Value::Null))
        })
        .with_async_fn("slow_echo", |args: Map<String, Value>| async move {
            tokio::time::sleep(Duration::from_millis(1)).await;
            Ok::<_, ToolError>(args.get("x").cloned().unwrap_or(Value::Null))
        })
        .with_fn("fail", |_| {
            Err::<String, _>(ToolError::execution_error().with_reason("boom"))
        })
        .build()
}

fn raw_state() -> ConversationState {
    serde_json::from_value(json!({
        "messages": [{
            "tool_calls": [{ "name": "echo", "args": { "x": 1 }, "id": "c1" }]
        }]
    }))
    .unwrap()
}

fn tool_message(state: &ConversationState) -> &ToolMessage {
    match state.messages.last() {
        Some(Message::Tool(msg)) => msg,
        other => panic!("expected a tool message, got {other:?}"),
    }
}

#[test]
fn test_raw_mapping_example() {
    let node = echo_node();
    let output = node.invoke(&raw_state()).unwrap();

    assert_eq!(output.messages.len(), 2);
    let msg = tool_message(&output);
    assert_eq!(msg.content, "1");
    assert_eq!(msg.name, "echo");
    assert_eq!(msg.tool_call_id.as_deref(), Some("c1"));
}

#[test]
fn test_no_pending_call_is_identity() {
    let node = echo_node();
    let states = [
        ConversationState::default(),
        ConversationState::with_messages([
            Message::human("Hi"),
            Message::ai("Hello!"),
        ]),
        ConversationState::with_messages([Message::ai("Hello!")])
            .with_agent_output(AgentOutput::default()),
    ];
    for state in states {
        assert_eq!(node.invoke(&state).unwrap(), state);
    }
}

#[test]
fn test_unknown_tool() {
    let node = echo_node();
    let state = ConversationState::with_messages([Message::ai_with_tool_calls(
        "",
        [ToolCallRequest::new("missing").with_id("c9")],
    )]);
    let err = node.invoke(&state).unwrap_err();
    assert!(matches!(&err, Error::UnknownTool(name) if name == "missing"));
    assert_eq!(err.to_string(), "unknown tool 'missing' requested by model");
}

#[test]
fn test_tool_error_is_propagated() {
    let node = echo_node();
    let state = ConversationState::with_messages([Message::ai_with_tool_calls(
        "",
        [ToolCallRequest::new("fail")],
    )]);
    let err = node.invoke(&state).unwrap_err();
    let tool_err = err.tool_error().unwrap();
    assert_eq!(tool_err.reason(), "boom");
}

#[test]
fn test_blocking_mode_drives_async_tool() {
    let node = echo_node();
    let state = ConversationState::with_messages([Message::ai_with_tool_calls(
        "",
        [ToolCallRequest::new("slow_echo").with_argument("x", "hi")],
    )]);
    let output = node.invoke(&state).unwrap();
    let msg = tool_message(&output);
    assert_eq!(msg.content, "hi");
    assert_eq!(msg.name, "slow_echo");
    assert_eq!(msg.tool_call_id, None);
}

#[test]
fn test_state_is_copied() {
    let node = echo_node();
    let mut state = raw_state();
    state.extra.insert("thread_id".to_owned(), json!(3));
    let before = state.clone();

    let output = node.invoke(&state).unwrap();
    assert_eq!(state, before);
    assert_eq!(output.extra, state.extra);
    assert_eq!(output.agent_output, state.agent_output);
    assert_eq!(&output.messages[..1], &state.messages[..]);
}

#[tokio::test]
async fn test_blocking_mode_inside_runtime() {
    let node = echo_node();
    let state = ConversationState::with_messages([Message::ai_with_tool_calls(
        "",
        [ToolCallRequest::new("slow_echo")],
    )]);
    let result = node.invoke(&state);
    assert!(matches!(result, Err(Error::NestedRuntime)));

    // Sync tools don't need a runtime of their own.
    let output = node.invoke(&raw_state()).unwrap();
    assert_eq!(tool_message(&output).content, "1");
}

#[tokio::test]
async fn test_async_mode() {
    let node = echo_node();
    let output = node.ainvoke(&raw_state()).await.unwrap();
    assert_eq!(tool_message(&output).content, "1");

    let state = ConversationState::with_messages([Message::ai_with_tool_calls(
        "",
        [ToolCallRequest::new("slow_echo").with_argument("x", 1)],
    )]);
    let output = node.ainvoke(&state).await.unwrap();
    assert_eq!(tool_message(&output).content, "1");

    let state = ConversationState::with_messages([Message::human("Hi")]);
    assert_eq!(node.ainvoke(&state).await.unwrap(), state);
}

#[test]
fn test_batch_preserves_order() {
    let node = echo_node();
    let idle = ConversationState::with_messages([Message::human("Hi")]);
    let outputs = node.batch(&[idle.clone(), raw_state()]).unwrap();

    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0], idle);
    assert_eq!(tool_message(&outputs[1]).content, "1");
}

#[test]
fn test_duplicate_names_last_wins() {
    let node = ToolNode::builder()
        .with_fn("echo", |_| Ok("first"))
        .with_fn("echo", |_| Ok("second"))
        .build();
    assert_eq!(node.tool_names(), ["echo"]);

    let output = node.invoke(&raw_state()).unwrap();
    assert_eq!(tool_message(&output).content, "second");
}

#[test]
fn test_definitions() {
    let node = echo_node();
    let names: Vec<_> = node
        .definitions()
        .into_iter()
        .map(|definition| definition.name)
        .collect();
    assert_eq!(names, ["echo", "fail", "slow_echo"]);
    assert!(node.contains("echo"));
    assert!(!node.contains("missing"));
}
