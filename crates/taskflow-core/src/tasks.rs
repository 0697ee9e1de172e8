//! Task board: list, filter and mutate the signed-in user's tasks.
//!
//! There is no optimistic update: every successful mutation is followed
//! by a full re-fetch, so the list is briefly stale but always ends up
//! matching the backend.

use std::cell::RefCell;
use std::rc::Rc;

use taskflow_types::{
    Result, TaskflowError,
    event::AppEvent,
    session::Session,
    task::{NewTask, Task, TaskFilter, TaskPatch},
    validation::{validate_description, validate_title},
};

use crate::api::ApiClient;
use crate::event_bus::EventBus;
use crate::session::SessionStore;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskListState {
    pub tasks: Vec<Task>,
    pub filter: TaskFilter,
    pub loading: bool,
    /// Shown inline until the next success or an explicit dismiss
    pub error: Option<String>,
}

pub struct TaskBoard {
    api: Rc<ApiClient>,
    session: Rc<SessionStore>,
    event_bus: EventBus,
    state: RefCell<TaskListState>,
    /// Token of the session the list was fetched with
    owner: RefCell<Option<String>>,
}

impl TaskBoard {
    pub fn new(api: Rc<ApiClient>, session: Rc<SessionStore>, event_bus: EventBus) -> Self {
        Self {
            api,
            session,
            event_bus,
            state: RefCell::new(TaskListState::default()),
            owner: RefCell::new(None),
        }
    }

    /// Start from `filter` instead of `All`, e.g. when the board is
    /// rebuilt under a filter the user already picked.
    pub fn with_filter(self, filter: TaskFilter) -> Self {
        self.state.borrow_mut().filter = filter;
        self
    }

    pub fn state(&self) -> TaskListState {
        self.state.borrow().clone()
    }

    pub fn filter(&self) -> TaskFilter {
        self.state.borrow().filter
    }

    // ─── Queries ─────────────────────────────────────────────

    /// Replace the list with the backend's answer for the current filter.
    pub async fn fetch_tasks(&self) -> Result<()> {
        let filter = self.filter();
        self.state.borrow_mut().loading = true;
        self.event_bus.emit(AppEvent::TasksLoading { filter });

        let api = &self.api;
        let result = self
            .session
            .authorized(|s| {
                self.adopt(&s);
                async move { api.get_tasks(&s.token, filter).await }
            })
            .await;

        match result {
            Ok(tasks) => {
                if self.filter() != filter {
                    // A newer fetch for the new filter is on its way.
                    log::debug!("Dropping task list for stale filter {:?}", filter);
                    return Ok(());
                }
                {
                    let mut state = self.state.borrow_mut();
                    state.tasks = tasks.clone();
                    state.loading = false;
                    state.error = None;
                }
                self.event_bus.emit(AppEvent::TasksLoaded { filter, tasks });
                self.event_bus.emit(AppEvent::TaskError { message: None });
                Ok(())
            }
            Err(e) => Err(self.record_error(e)),
        }
    }

    pub async fn set_filter(&self, filter: TaskFilter) -> Result<()> {
        self.state.borrow_mut().filter = filter;
        self.fetch_tasks().await
    }

    // ─── Mutations ───────────────────────────────────────────

    /// Create a task. A blank title is rejected before any request.
    pub async fn create_task(&self, title: &str, description: &str) -> Result<Task> {
        let task = self.validated(title, description).map(|(title, description)| NewTask {
            description,
            ..NewTask::new(title)
        })?;

        let api = &self.api;
        let created = self
            .session
            .authorized(|s| async move { api.create_task(&s.token, &task).await })
            .await
            .map_err(|e| self.record_error(e))?;

        log::info!("Created task {}", created.id);
        self.refresh_after_mutation().await;
        Ok(created)
    }

    /// Flip a task between completed and pending.
    pub async fn toggle_completion(&self, id: i64) -> Result<Task> {
        let snapshot = self
            .session
            .require_session()
            .await
            .map_err(|e| self.record_error(e))?;
        self.adopt(&snapshot);

        let current = self
            .state
            .borrow()
            .tasks
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.status);
        let Some(status) = current else {
            return Err(self.record_error(TaskflowError::Other(format!("Task {} not found", id))));
        };

        let patch = TaskPatch::status(status.toggled());
        self.apply_patch(id, patch).await
    }

    /// Edit title and description. Validated like creation.
    pub async fn update_task(&self, id: i64, title: &str, description: &str) -> Result<Task> {
        let (title, description) = self.validated(title, description)?;
        let patch = TaskPatch {
            title: Some(title),
            description,
            status: None,
        };
        self.apply_patch(id, patch).await
    }

    pub async fn delete_task(&self, id: i64) -> Result<()> {
        let api = &self.api;
        self.session
            .authorized(|s| async move { api.delete_task(&s.token, id).await })
            .await
            .map_err(|e| self.record_error(e))?;

        log::info!("Deleted task {}", id);
        self.refresh_after_mutation().await;
        Ok(())
    }

    pub fn clear_error(&self) {
        self.state.borrow_mut().error = None;
        self.event_bus.emit(AppEvent::TaskError { message: None });
    }

    /// Drop the list of the previous user. The filter is kept.
    pub fn reset(&self) {
        *self.owner.borrow_mut() = None;
        let mut state = self.state.borrow_mut();
        state.tasks.clear();
        state.loading = false;
        state.error = None;
    }

    // ─── Internals ───────────────────────────────────────────

    fn adopt(&self, session: &Session) {
        let previous = self.owner.replace(Some(session.token.clone()));
        if previous.is_some_and(|token| token != session.token) {
            log::info!("Session changed, discarding previous task list");
            let mut state = self.state.borrow_mut();
            state.tasks.clear();
            state.error = None;
        }
    }

    async fn apply_patch(&self, id: i64, patch: TaskPatch) -> Result<Task> {
        let api = &self.api;
        let updated = self
            .session
            .authorized(|s| async move { api.update_task(&s.token, id, &patch).await })
            .await
            .map_err(|e| self.record_error(e))?;

        log::info!("Updated task {}", id);
        self.refresh_after_mutation().await;
        Ok(updated)
    }

    fn validated(&self, title: &str, description: &str) -> Result<(String, Option<String>)> {
        let title = validate_title(title).map_err(|e| self.record_error(e))?;
        let description = validate_description(description).map_err(|e| self.record_error(e))?;
        Ok((title, description))
    }

    /// The mutation itself succeeded; a failed refresh only shows up in
    /// the list's error banner.
    async fn refresh_after_mutation(&self) {
        if let Err(e) = self.fetch_tasks().await {
            log::warn!("Task list refresh failed: {}", e);
        }
    }

    fn record_error(&self, e: TaskflowError) -> TaskflowError {
        let message = e.to_string();
        {
            let mut state = self.state.borrow_mut();
            state.loading = false;
            state.error = Some(message.clone());
        }
        self.event_bus.emit(AppEvent::TaskError { message: Some(message) });
        e
    }
}
