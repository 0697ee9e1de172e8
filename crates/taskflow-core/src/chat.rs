//! Assistant chat: drives the transcript reducer from backend calls.

use std::cell::RefCell;
use std::rc::Rc;

pub use taskflow_types::chat::{ChatAction, ChatState};
use taskflow_types::{
    Result, TaskflowError,
    chat::{ChatMessage, ChatReply, ChatRequest},
    event::AppEvent,
    session::Session,
};

use crate::api::ApiClient;
use crate::event_bus::EventBus;
use crate::session::SessionStore;

/// Shown in the transcript when a send fails
pub const SEND_FAILED_MESSAGE: &str =
    "Sorry, I encountered an error processing your request. Please try again.";

pub struct ChatController {
    api: Rc<ApiClient>,
    session: Rc<SessionStore>,
    event_bus: EventBus,
    state: RefCell<ChatState>,
    /// Token of the session the transcript belongs to
    owner: RefCell<Option<String>>,
}

impl ChatController {
    pub fn new(api: Rc<ApiClient>, session: Rc<SessionStore>, event_bus: EventBus) -> Self {
        Self {
            api,
            session,
            event_bus,
            state: RefCell::new(ChatState::new()),
            owner: RefCell::new(None),
        }
    }

    pub fn state(&self) -> ChatState {
        self.state.borrow().clone()
    }

    /// Reduce locally, then mirror the action to the UI.
    pub fn dispatch(&self, action: ChatAction) {
        self.state.borrow_mut().apply(action.clone());
        self.event_bus.emit(AppEvent::Chat(action));
    }

    /// Forget the transcript and conversation list. Called on sign-out.
    pub fn reset(&self) {
        *self.owner.borrow_mut() = None;
        *self.state.borrow_mut() = ChatState::new();
    }

    /// Bind the controller to `session`. State left by a different
    /// session is dropped so its conversation id is never reused.
    fn adopt(&self, session: &Session) {
        let previous = self.owner.replace(Some(session.token.clone()));
        if previous.is_some_and(|token| token != session.token) {
            log::info!("Session changed, discarding previous chat state");
            self.dispatch(ChatAction::ClearMessages);
            self.dispatch(ChatAction::SetCurrentConversation(None));
            self.dispatch(ChatAction::SetConversations(Vec::new()));
        }
    }

    /// Send one user message. Every attempt that gets past the input and
    /// session checks adds exactly two transcript entries: the user's
    /// message and either the reply or an error notice.
    pub async fn send(&self, text: &str) -> Result<ChatReply> {
        if text.trim().is_empty() {
            return Err(TaskflowError::validation("message", "Message is empty"));
        }
        let snapshot = self.session.require_session().await?;
        self.adopt(&snapshot);

        self.dispatch(ChatAction::AddMessage(ChatMessage::user(text)));
        self.dispatch(ChatAction::SetLoading(true));

        let request = ChatRequest {
            message: text.to_string(),
            conversation_id: self.state.borrow().current_conversation_id.clone(),
        };
        let result = self
            .api
            .send_chat(&snapshot.token, &snapshot.user.id, &request)
            .await;
        let result = self.session.settle(&snapshot, result).await;

        match result {
            Ok(reply) => {
                self.dispatch(ChatAction::AddMessage(ChatMessage::from_reply(&reply)));
                self.dispatch(ChatAction::SetCurrentConversation(Some(
                    reply.conversation_id.clone(),
                )));
                self.dispatch(ChatAction::SetLoading(false));

                let known = self
                    .state
                    .borrow()
                    .conversations
                    .iter()
                    .any(|c| c.id == reply.conversation_id);
                if !known {
                    if let Err(e) = self.load_conversations().await {
                        log::warn!("Could not refresh conversation list: {}", e);
                    }
                }
                Ok(reply)
            }
            Err(e) => {
                log::error!("Chat send failed: {}", e);
                self.dispatch(ChatAction::AddMessage(ChatMessage::assistant(SEND_FAILED_MESSAGE)));
                self.dispatch(ChatAction::SetError(Some(e.to_string())));
                Err(e)
            }
        }
    }

    pub async fn load_conversations(&self) -> Result<()> {
        let api = &self.api;
        let list = self
            .session
            .authorized(|s| {
                self.adopt(&s);
                async move { api.conversations(&s.token, &s.user.id).await }
            })
            .await?;
        log::debug!("Loaded {} conversations", list.len());
        self.dispatch(ChatAction::SetConversations(list));
        Ok(())
    }

    /// Replace the transcript with a stored conversation.
    pub async fn open_conversation(&self, id: &str) -> Result<()> {
        self.dispatch(ChatAction::SetLoading(true));
        let api = &self.api;
        let result = self
            .session
            .authorized(|s| {
                self.adopt(&s);
                async move { api.conversation(&s.token, &s.user.id, id).await }
            })
            .await;

        match result {
            Ok(history) => {
                self.dispatch(ChatAction::SetMessages(history.messages));
                self.dispatch(ChatAction::SetCurrentConversation(Some(history.conversation_id)));
                self.dispatch(ChatAction::SetError(None));
                Ok(())
            }
            Err(e) => {
                log::warn!("Could not open conversation {}: {}", id, e);
                self.dispatch(ChatAction::SetError(Some(e.to_string())));
                Err(e)
            }
        }
    }

    pub fn new_conversation(&self) {
        self.dispatch(ChatAction::ClearMessages);
        self.dispatch(ChatAction::SetCurrentConversation(None));
        self.dispatch(ChatAction::SetError(None));
    }
}
