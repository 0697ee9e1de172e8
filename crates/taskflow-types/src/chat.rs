use serde::{Deserialize, Serialize};
use crate::de::{id_string, string_or_null};

/// Who authored a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    #[serde(alias = "agent")]
    Assistant,
    /// Notices the backend writes into a conversation
    System,
}

/// A single entry in the assistant transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(alias = "role", alias = "sender_type")]
    pub sender: Sender,
    pub content: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub timestamp: String,
    /// Labels for the backend actions this reply performed
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub actions_taken: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_used: Option<String>,
}

impl ChatMessage {
    fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            actions_taken: Vec::new(),
            tool_used: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, content)
    }

    /// Build the assistant entry for a backend reply.
    pub fn from_reply(reply: &ChatReply) -> Self {
        Self {
            id: reply.message_id.clone(),
            actions_taken: reply.actions_taken.clone(),
            tool_used: reply.tool_used.clone(),
            ..Self::assistant(reply.response.clone())
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Body of `POST /api/:userId/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub conversation_id: Option<String>,
}

/// Response of `POST /api/:userId/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub conversation_id: String,
    #[serde(deserialize_with = "id_string")]
    pub message_id: String,
    #[serde(default)]
    pub tool_used: Option<String>,
    #[serde(default)]
    pub actions_taken: Vec<String>,
}

/// Entry of `GET /api/:userId/conversations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub message_count: Option<usize>,
}

impl ConversationSummary {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled conversation")
    }
}

/// Response of `GET /api/:userId/conversations/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationHistory {
    pub conversation_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

// ─── Transcript reducer ──────────────────────────────────────

/// Client-side projection of one conversation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub current_conversation_id: Option<String>,
    pub conversations: Vec<ConversationSummary>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    SetLoading(bool),
    /// Also ends any in-flight loading
    SetError(Option<String>),
    AddMessage(ChatMessage),
    /// Bulk replace, used when a history is loaded
    SetMessages(Vec<ChatMessage>),
    SetCurrentConversation(Option<String>),
    SetConversations(Vec<ConversationSummary>),
    ClearMessages,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action. Pure: the same state and action always give
    /// the same result.
    pub fn reduce(mut self, action: ChatAction) -> Self {
        self.apply(action);
        self
    }

    pub fn apply(&mut self, action: ChatAction) {
        match action {
            ChatAction::SetLoading(loading) => self.is_loading = loading,
            ChatAction::SetError(error) => {
                self.error = error;
                self.is_loading = false;
            }
            ChatAction::AddMessage(message) => self.messages.push(message),
            ChatAction::SetMessages(messages) => self.messages = messages,
            ChatAction::SetCurrentConversation(id) => self.current_conversation_id = id,
            ChatAction::SetConversations(list) => self.conversations = list,
            ChatAction::ClearMessages => self.messages.clear(),
        }
    }
}
