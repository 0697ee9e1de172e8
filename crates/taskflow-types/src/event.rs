use crate::chat::ChatAction;
use crate::session::AuthState;
use crate::task::{Task, TaskFilter};

/// Events emitted by the core services.
/// UI subscribes to these for reactive updates.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Session resolved, created or cleared
    SessionChanged { state: AuthState },

    /// Login or registration was rejected; the session is unchanged
    AuthFailed { message: String },

    /// A task fetch for this filter started
    TasksLoading { filter: TaskFilter },

    /// Fresh task list from the backend
    TasksLoaded { filter: TaskFilter, tasks: Vec<Task> },

    /// A task operation failed (`None` clears the banner)
    TaskError { message: Option<String> },

    /// A transcript reducer action, mirrored for the UI's copy
    Chat(ChatAction),

    /// Anything else worth surfacing in the status line
    Error { message: String },
}
