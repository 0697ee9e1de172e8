//! WASM-target tests for taskflow-types.
//!
//! Runs the serde and reducer checks under wasm32-unknown-unknown
//! via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use taskflow_types::chat::*;
use taskflow_types::config::*;
use taskflow_types::task::*;
use taskflow_types::validation::*;
use taskflow_types::TaskflowError;

#[wasm_bindgen_test]
fn chat_message_ids_unique() {
    let a = ChatMessage::user("a");
    let b = ChatMessage::user("a");
    assert_ne!(a.id, b.id);
    assert!(!a.timestamp.is_empty());
}

#[wasm_bindgen_test]
fn reducer_transcript_flow() {
    let s = ChatState::new()
        .reduce(ChatAction::SetLoading(true))
        .reduce(ChatAction::AddMessage(ChatMessage::user("hi")))
        .reduce(ChatAction::AddMessage(ChatMessage::assistant("hello")))
        .reduce(ChatAction::SetLoading(false));
    assert_eq!(s.messages.len(), 2);
    assert!(!s.is_loading);
}

#[wasm_bindgen_test]
fn task_status_toggle() {
    assert_eq!(TaskStatus::Completed.toggled().toggled(), TaskStatus::Completed);
}

#[wasm_bindgen_test]
fn config_default_serializes() {
    let json = serde_json::to_string(&ClientConfig::default()).unwrap();
    let back: ClientConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.api.base_url, DEFAULT_API_BASE);
}

#[wasm_bindgen_test]
fn empty_title_rejected() {
    assert!(matches!(validate_title(""), Err(TaskflowError::Validation { .. })));
}

#[wasm_bindgen_test]
fn email_regex_runs_on_wasm() {
    assert!(validate_email("ada@example.com").is_ok());
    assert!(validate_email("ada").is_err());
}
