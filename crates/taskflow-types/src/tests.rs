#[cfg(test)]
mod tests {
    use crate::chat::*;
    use crate::config::*;
    use crate::error::*;
    use crate::session::*;
    use crate::task::*;
    use crate::user::*;
    use crate::validation::*;
    use serde_json::json;

    fn user() -> User {
        User {
            id: "7".to_string(),
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
            role: None,
            permissions: Vec::new(),
            is_active: Some(true),
            created_at: "2024-01-01T00:00:00".to_string(),
        }
    }

    // ─── User Tests ──────────────────────────────────────────

    #[test]
    fn test_user_integer_id_normalized() {
        let u: User = serde_json::from_value(json!({
            "id": 42,
            "email": "a@b.co",
            "username": "a",
            "is_active": true,
            "created_at": "2024-01-01T00:00:00"
        }))
        .unwrap();
        assert_eq!(u.id, "42");
        assert!(u.role.is_none());
        assert!(u.permissions.is_empty());
    }

    #[test]
    fn test_user_string_id_kept() {
        let u: User = serde_json::from_value(json!({
            "id": "abc-1",
            "email": "a@b.co",
            "username": "a"
        }))
        .unwrap();
        assert_eq!(u.id, "abc-1");
        assert_eq!(u.created_at, "");
    }

    #[test]
    fn test_user_permissions() {
        let mut u = user();
        assert!(!u.has_permission("tasks:write"));
        u.permissions.push("tasks:write".to_string());
        assert!(u.has_permission("tasks:write"));
        assert!(!u.has_permission("tasks:admin"));

        u.role = Some("admin".to_string());
        assert!(u.has_role("admin"));
        assert!(u.has_permission("tasks:admin"));
    }

    // ─── Task Tests ──────────────────────────────────────────

    #[test]
    fn test_task_status_wire_names() {
        assert_eq!(serde_json::to_value(TaskStatus::InProgress).unwrap(), json!("in_progress"));
        let s: TaskStatus = serde_json::from_value(json!("completed")).unwrap();
        assert_eq!(s, TaskStatus::Completed);
        assert!(serde_json::from_value::<TaskStatus>(json!("done")).is_err());
    }

    #[test]
    fn test_task_status_toggle_twice_returns() {
        let start = TaskStatus::Completed;
        assert_eq!(start.toggled(), TaskStatus::Pending);
        assert_eq!(start.toggled().toggled(), start);
        assert_eq!(TaskStatus::Pending.toggled().toggled(), TaskStatus::Pending);
        assert_eq!(TaskStatus::InProgress.toggled(), TaskStatus::Completed);
    }

    #[test]
    fn test_task_deserialize_backend_shape() {
        let t: Task = serde_json::from_value(json!({
            "id": 3,
            "title": "Buy milk",
            "description": null,
            "status": "pending",
            "user_id": 7,
            "created_at": "2024-01-01T00:00:00",
            "updated_at": "2024-01-02T00:00:00"
        }))
        .unwrap();
        assert_eq!(t.id, 3);
        assert_eq!(t.user_id, "7");
        assert!(t.description.is_none());
        assert!(!t.is_completed());
    }

    #[test]
    fn test_task_filter_query_and_matches() {
        let done = TaskFilter::Status(TaskStatus::Completed);
        assert_eq!(TaskFilter::All.query_value(), None);
        assert_eq!(done.query_value(), Some("completed"));

        let t: Task = serde_json::from_value(json!({
            "id": 1, "title": "x", "status": "completed"
        }))
        .unwrap();
        assert!(done.matches(&t));
        assert!(TaskFilter::All.matches(&t));
        assert!(!TaskFilter::Status(TaskStatus::Pending).matches(&t));
        assert_eq!(TaskFilter::all().len(), 4);
    }

    #[test]
    fn test_new_task_defaults_to_pending() {
        let body = serde_json::to_value(NewTask::new("Write report")).unwrap();
        assert_eq!(body, json!({"title": "Write report", "status": "pending"}));

        let body = serde_json::to_value(NewTask::new("a").with_description("b")).unwrap();
        assert_eq!(body["description"], "b");
    }

    #[test]
    fn test_task_patch_omits_absent_fields() {
        let body = serde_json::to_value(TaskPatch::status(TaskStatus::Completed)).unwrap();
        assert_eq!(body, json!({"status": "completed"}));
        assert_eq!(serde_json::to_value(TaskPatch::default()).unwrap(), json!({}));
    }

    // ─── Chat Tests ──────────────────────────────────────────

    #[test]
    fn test_chat_message_constructors() {
        let m = ChatMessage::user("hi");
        assert!(m.is_user());
        assert!(!m.id.is_empty());
        assert!(!m.timestamp.is_empty());

        let a = ChatMessage::assistant("hello");
        assert_eq!(a.sender, Sender::Assistant);
        assert_ne!(m.id, a.id);
    }

    #[test]
    fn test_chat_message_from_reply() {
        let reply: ChatReply = serde_json::from_value(json!({
            "response": "Added 'milk'",
            "conversation_id": "c1",
            "message_id": 99,
            "tool_used": "add_task",
            "actions_taken": ["add_task"]
        }))
        .unwrap();
        let m = ChatMessage::from_reply(&reply);
        assert_eq!(m.id, "99");
        assert_eq!(m.sender, Sender::Assistant);
        assert_eq!(m.content, "Added 'milk'");
        assert_eq!(m.actions_taken, vec!["add_task".to_string()]);
        assert_eq!(m.tool_used.as_deref(), Some("add_task"));
    }

    #[test]
    fn test_history_message_aliases() {
        let h: ConversationHistory = serde_json::from_value(json!({
            "conversation_id": "c1",
            "messages": [
                {"id": "1", "role": "user", "content": "hi", "timestamp": null},
                {"id": 2, "sender": "assistant", "content": "hello", "timestamp": "t"},
                {"id": "3", "sender_type": "agent", "content": "more"}
            ]
        }))
        .unwrap();
        assert_eq!(h.messages.len(), 3);
        assert_eq!(h.messages[0].sender, Sender::User);
        assert_eq!(h.messages[0].timestamp, "");
        assert_eq!(h.messages[1].id, "2");
        assert_eq!(h.messages[2].sender, Sender::Assistant);
    }

    #[test]
    fn test_history_with_system_row_decodes() {
        let h: ConversationHistory = serde_json::from_value(json!({
            "conversation_id": "c1",
            "messages": [
                {"id": 1, "sender_type": "system", "content": "Conversation started", "timestamp": null},
                {"id": 2, "sender_type": "user", "content": "hi", "timestamp": null},
                {"id": 3, "sender_type": "agent", "content": "hello", "timestamp": null}
            ]
        }))
        .unwrap();
        assert_eq!(h.messages.len(), 3);
        assert_eq!(h.messages[0].sender, Sender::System);
        assert!(!h.messages[0].is_user());
        assert_eq!(h.messages[2].sender, Sender::Assistant);
    }

    #[test]
    fn test_chat_request_omits_missing_conversation() {
        let req = ChatRequest { message: "hi".to_string(), conversation_id: None };
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"message": "hi"}));
    }

    #[test]
    fn test_conversation_summary_title_fallback() {
        let c: ConversationSummary = serde_json::from_value(json!({"id": "c1", "title": null})).unwrap();
        assert_eq!(c.display_title(), "Untitled conversation");
    }

    // ─── Reducer Tests ───────────────────────────────────────

    #[test]
    fn test_reducer_initial_state() {
        let s = ChatState::new();
        assert!(s.messages.is_empty());
        assert!(s.current_conversation_id.is_none());
        assert!(!s.is_loading);
        assert!(s.error.is_none());
    }

    #[test]
    fn test_reducer_add_and_clear() {
        let s = ChatState::new()
            .reduce(ChatAction::AddMessage(ChatMessage::user("a")))
            .reduce(ChatAction::AddMessage(ChatMessage::assistant("b")));
        assert_eq!(s.messages.len(), 2);
        let s = s.reduce(ChatAction::ClearMessages);
        assert!(s.messages.is_empty());
    }

    #[test]
    fn test_reducer_set_error_ends_loading() {
        let s = ChatState::new().reduce(ChatAction::SetLoading(true));
        assert!(s.is_loading);
        let s = s.reduce(ChatAction::SetError(Some("boom".to_string())));
        assert!(!s.is_loading);
        assert_eq!(s.error.as_deref(), Some("boom"));
        let s = s.reduce(ChatAction::SetError(None));
        assert!(s.error.is_none());
    }

    #[test]
    fn test_reducer_set_messages_replaces() {
        let s = ChatState::new()
            .reduce(ChatAction::AddMessage(ChatMessage::user("old")))
            .reduce(ChatAction::SetMessages(vec![
                ChatMessage::user("x"),
                ChatMessage::assistant("y"),
                ChatMessage::user("z"),
            ]))
            .reduce(ChatAction::SetCurrentConversation(Some("c9".to_string())));
        assert_eq!(s.messages.len(), 3);
        assert_eq!(s.messages[0].content, "x");
        assert_eq!(s.current_conversation_id.as_deref(), Some("c9"));
    }

    // ─── Session Tests ───────────────────────────────────────

    #[test]
    fn test_session_record_roundtrip_is_single_object() {
        let session = Session::new("tok", user());
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["token"], "tok");
        assert_eq!(json["user"]["username"], "ada");
    }

    #[test]
    fn test_auth_state_accessors() {
        assert!(!AuthState::default().is_resolved());
        assert!(AuthState::Unauthenticated.is_resolved());
        assert!(AuthState::Unauthenticated.session().is_none());

        let s = AuthState::Authenticated(Session::new("t", user()));
        assert!(s.is_authenticated());
        assert_eq!(s.user().unwrap().username, "ada");
    }

    // ─── Config Tests ────────────────────────────────────────

    #[test]
    fn test_config_defaults() {
        let c = ClientConfig::default();
        assert_eq!(c.api.base_url, DEFAULT_API_BASE);
        assert_eq!(c.api.login_encoding, LoginEncoding::Form);
        assert_eq!(c.storage.backend, StorageBackendType::Auto);
        assert_eq!(c.login_route, "/login");
    }

    #[test]
    fn test_config_normalized_base() {
        let mut api = ApiConfig::default();
        api.base_url = "https://todo.example.com/".to_string();
        assert_eq!(api.normalized_base(), "https://todo.example.com");
    }

    #[test]
    fn test_config_serialization() {
        let c = ClientConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let back: ClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    // ─── Error Tests ─────────────────────────────────────────

    #[test]
    fn test_error_status_codes() {
        assert_eq!(TaskflowError::Network("down".into()).status(), 0);
        assert_eq!(TaskflowError::Unauthorized { message: "x".into() }.status(), 401);
        assert_eq!(
            TaskflowError::Http { status: 404, message: "nope".into(), details: None }.status(),
            404
        );
        assert_eq!(TaskflowError::validation("title", "Title is required").status(), 400);
    }

    #[test]
    fn test_error_payload_shape() {
        let e = TaskflowError::Http {
            status: 422,
            message: "Invalid".into(),
            details: Some(json!([{"loc": ["title"]}])),
        };
        let p = e.payload();
        assert_eq!(p.message, "Invalid");
        assert_eq!(p.status, 422);
        assert!(p.details.is_some());

        let p = TaskflowError::Network("offline".into()).payload();
        assert_eq!(p.status, 0);
        assert!(p.message.contains("offline"));
        assert!(serde_json::to_value(&p).unwrap().get("details").is_none());
    }

    #[test]
    fn test_error_from_serde() {
        let err: TaskflowError = serde_json::from_str::<Task>("{").unwrap_err().into();
        assert!(matches!(err, TaskflowError::Serialization(_)));
    }

    #[test]
    fn test_error_is_unauthorized() {
        assert!(TaskflowError::Unauthorized { message: "x".into() }.is_unauthorized());
        assert!(!TaskflowError::Unauthenticated.is_unauthorized());
    }

    // ─── Validation Tests ────────────────────────────────────

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title("  Buy milk ").unwrap(), "Buy milk");
        assert!(matches!(
            validate_title("   "),
            Err(TaskflowError::Validation { ref field, .. }) if field == "title"
        ));
        assert!(validate_title(&"x".repeat(TITLE_MAX)).is_ok());
        assert!(validate_title(&"x".repeat(TITLE_MAX + 1)).is_err());
    }

    #[test]
    fn test_validate_description() {
        assert_eq!(validate_description("  ").unwrap(), None);
        assert_eq!(validate_description(" notes ").unwrap(), Some("notes".to_string()));
        assert!(validate_description(&"x".repeat(DESCRIPTION_MAX + 1)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("ada@example").is_err());
        assert!(validate_email("ada example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("Secret123").is_ok());
        assert!(validate_password("Sh0rt").is_err());
        assert!(validate_password("alllowercase1").is_err());
        assert!(validate_password("NoDigitsHere").is_err());
    }

    #[test]
    fn test_validate_forms() {
        assert!(validate_credentials(&Credentials::new("ada", "pw")).is_ok());
        assert!(validate_credentials(&Credentials::new(" ", "pw")).is_err());
        assert!(validate_credentials(&Credentials::new("ada", "")).is_err());

        let mut reg = Registration {
            username: "ada".into(),
            email: "ada@example.com".into(),
            password: "Secret123".into(),
        };
        assert!(validate_registration(&reg).is_ok());
        reg.email = "nope".into();
        assert!(validate_registration(&reg).is_err());
    }
}
