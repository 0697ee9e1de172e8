//! UI-level state that drives rendering.
//! This is a read-only projection of the core services' state,
//! updated each frame by draining the EventBus. Form buffers live
//! here too since only the panels touch them.

use taskflow_types::chat::ChatState;
use taskflow_types::event::AppEvent;
use taskflow_types::session::AuthState;
use taskflow_types::task::{Task, TaskFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

/// Text typed into the login / registration form
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub username: String,
    pub email: String,
    pub password: String,
    pub error: Option<String>,
    /// A login or registration request is in flight
    pub pending: bool,
}

/// The task currently open in the edit form
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub id: i64,
    pub title: String,
    pub description: String,
}

impl TaskDraft {
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
        }
    }
}

/// State visible to UI panels
pub struct UiState {
    pub auth: AuthState,
    pub auth_form: AuthForm,
    pub tasks: Vec<Task>,
    pub filter: TaskFilter,
    pub tasks_loading: bool,
    /// Filter of the fetch that set `tasks_loading`
    loading_filter: Option<TaskFilter>,
    pub task_error: Option<String>,
    /// New-task form
    pub new_title: String,
    pub new_description: String,
    pub editing: Option<TaskDraft>,
    pub chat: ChatState,
    pub chat_input: String,
    /// Whether the assistant panel is open
    pub show_chat: bool,
    /// Whether settings panel is open
    pub show_settings: bool,
    /// Status line text
    pub status_text: String,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            auth: AuthState::Unknown,
            auth_form: AuthForm::default(),
            tasks: Vec::new(),
            filter: TaskFilter::All,
            tasks_loading: false,
            loading_filter: None,
            task_error: None,
            new_title: String::new(),
            new_description: String::new(),
            editing: None,
            chat: ChatState::new(),
            chat_input: String::new(),
            show_chat: true,
            show_settings: false,
            status_text: "Ready".to_string(),
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<AppEvent>) {
        for event in events {
            match event {
                AppEvent::SessionChanged { state } => {
                    self.auth_form.pending = false;
                    match &state {
                        AuthState::Authenticated(session) => {
                            self.auth_form.error = None;
                            self.auth_form.password.clear();
                            self.status_text = format!("Signed in as {}", session.user.username);
                        }
                        AuthState::Unauthenticated => {
                            if self.auth.is_authenticated() {
                                self.status_text = "Signed out".to_string();
                            }
                            self.clear_user_data();
                        }
                        AuthState::Unknown => {}
                    }
                    self.auth = state;
                }
                AppEvent::AuthFailed { message } => {
                    self.auth_form.pending = false;
                    self.auth_form.error = Some(message);
                }
                AppEvent::TasksLoading { filter } => {
                    self.tasks_loading = true;
                    self.loading_filter = Some(filter);
                    self.status_text = "Loading tasks...".to_string();
                }
                AppEvent::TasksLoaded { filter, tasks } => {
                    if self.loading_filter == Some(filter) {
                        self.tasks_loading = false;
                        self.loading_filter = None;
                    }
                    if filter == self.filter {
                        self.status_text = format!("{} task(s)", tasks.len());
                        self.tasks = tasks;
                        self.tasks_loading = false;
                        self.loading_filter = None;
                    }
                }
                AppEvent::TaskError { message } => {
                    self.tasks_loading = false;
                    self.loading_filter = None;
                    if let Some(m) = &message {
                        self.status_text = format!("Error: {}", m);
                    }
                    self.task_error = message;
                }
                AppEvent::Chat(action) => self.chat.apply(action),
                AppEvent::Error { message } => {
                    self.status_text = format!("Error: {}", message);
                }
            }
        }
    }

    /// Drop everything that belonged to the previous user.
    fn clear_user_data(&mut self) {
        self.tasks.clear();
        self.tasks_loading = false;
        self.loading_filter = None;
        self.task_error = None;
        self.editing = None;
        self.chat = ChatState::new();
        self.chat_input.clear();
    }

    pub fn username(&self) -> Option<&str> {
        self.auth.user().map(|u| u.username.as_str())
    }

    pub fn is_busy(&self) -> bool {
        self.tasks_loading || self.chat.is_loading || self.auth_form.pending
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
