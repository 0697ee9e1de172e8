//! Main egui application: composes all panels and runs core operations.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};
use gloo_timers::callback::Interval;

use taskflow_core::api::ApiClient;
use taskflow_core::chat::ChatController;
use taskflow_core::event_bus::EventBus;
use taskflow_core::guard::{Access, Guard};
use taskflow_core::ports::{HttpPort, StoragePort};
use taskflow_core::session::SessionStore;
use taskflow_core::tasks::TaskBoard;
use taskflow_platform::http::FetchHttp;
use taskflow_platform::storage::open_storage;
use taskflow_types::config::{ClientConfig, CONFIG_STORAGE_KEY};
use taskflow_types::event::AppEvent;
use taskflow_types::task::TaskFilter;
use taskflow_ui::panels::auth::{self, AuthIntent};
use taskflow_ui::panels::chat::{self, ChatIntent};
use taskflow_ui::panels::settings::{self, SaveFeedback, SettingsAction};
use taskflow_ui::panels::tasks::{self, TaskIntent};
use taskflow_ui::panels::access;
use taskflow_ui::state::UiState;
use taskflow_ui::theme;

const TASK_REFRESH_MS: u32 = 30_000;

/// Read the persisted config. Anything unreadable falls back to defaults.
pub async fn load_config(storage: &dyn StoragePort) -> ClientConfig {
    match storage.get(CONFIG_STORAGE_KEY).await {
        Ok(Some(data)) => match serde_json::from_slice::<ClientConfig>(&data) {
            Ok(config) => {
                log::info!("Config restored from storage");
                config
            }
            Err(e) => {
                log::warn!("Ignoring unreadable config: {}", e);
                ClientConfig::default()
            }
        },
        Ok(None) => ClientConfig::default(),
        Err(e) => {
            log::warn!("Could not read config: {}", e);
            ClientConfig::default()
        }
    }
}

/// Core services wired to one API config
struct Services {
    session: Rc<SessionStore>,
    board: Rc<TaskBoard>,
    chat: Rc<ChatController>,
}

impl Services {
    fn build(
        config: &ClientConfig,
        storage: Rc<dyn StoragePort>,
        event_bus: &EventBus,
        filter: TaskFilter,
    ) -> Self {
        let http: Rc<dyn HttpPort> = Rc::new(FetchHttp::new());
        let api = Rc::new(ApiClient::new(http, config.api.clone()));
        let session = Rc::new(SessionStore::new(api.clone(), storage, event_bus.clone()));
        let board = Rc::new(
            TaskBoard::new(api.clone(), session.clone(), event_bus.clone()).with_filter(filter),
        );
        let chat = Rc::new(ChatController::new(api, session.clone(), event_bus.clone()));
        Self { session, board, chat }
    }
}

/// The main application state
pub struct TaskflowApp {
    ui_state: UiState,
    /// Edited in the settings panel
    config: ClientConfig,
    /// What the services were built with
    active_config: ClientConfig,
    config_store: Rc<dyn StoragePort>,
    session_store: Rc<dyn StoragePort>,
    event_bus: EventBus,
    services: Services,
    guard: Guard,
    last_access: Access,
    was_authenticated: bool,
    refresh_timer: Option<Interval>,
    save_feedback: Rc<RefCell<Option<SaveFeedback>>>,
    first_frame: bool,
}

impl TaskflowApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: ClientConfig,
        config_store: Rc<dyn StoragePort>,
    ) -> Self {
        let event_bus = EventBus::new();
        let session_store = open_storage(&config.storage.backend);
        let services =
            Services::build(&config, session_store.clone(), &event_bus, TaskFilter::All);
        let guard = Guard::authenticated().redirect_to(config.login_route.clone());

        Self::restore_session(&cc.egui_ctx, services.session.clone());

        Self {
            ui_state: UiState::new(),
            active_config: config.clone(),
            config,
            config_store,
            session_store,
            event_bus,
            services,
            guard,
            last_access: Access::Loading,
            was_authenticated: false,
            refresh_timer: None,
            save_feedback: Rc::new(RefCell::new(None)),
            first_frame: true,
        }
    }

    /// Run a core operation on the browser's event loop, then repaint.
    fn spawn<F>(ctx: &egui::Context, fut: F)
    where
        F: Future<Output = ()> + 'static,
    {
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            fut.await;
            ctx.request_repaint();
        });
    }

    fn restore_session(ctx: &egui::Context, session: Rc<SessionStore>) {
        Self::spawn(ctx, async move {
            session.restore().await;
        });
    }

    /// Persist the edited config (async) and rewire the services if the
    /// API settings changed.
    fn save_config(&mut self, ctx: &egui::Context) {
        let json = match serde_json::to_vec(&self.config) {
            Ok(json) => json,
            Err(e) => {
                *self.save_feedback.borrow_mut() = Some(SaveFeedback {
                    message: format!("Could not save: {}", e),
                    success: false,
                });
                return;
            }
        };

        let storage = self.config_store.clone();
        let feedback = self.save_feedback.clone();
        let reload_needed = self.config.storage != self.active_config.storage;
        Self::spawn(ctx, async move {
            let fb = match storage.set(CONFIG_STORAGE_KEY, &json).await {
                Ok(()) => {
                    log::info!("Config saved to storage");
                    let message = if reload_needed {
                        "Saved. Reload to switch storage."
                    } else {
                        "Saved"
                    };
                    SaveFeedback { message: message.to_string(), success: true }
                }
                Err(e) => {
                    log::warn!("Config save failed: {}", e);
                    SaveFeedback { message: format!("Could not save: {}", e), success: false }
                }
            };
            *feedback.borrow_mut() = Some(fb);
        });

        if self.config.api != self.active_config.api {
            log::info!("API settings changed; reconnecting to {}", self.config.api.normalized_base());
            self.services = Services::build(
                &self.config,
                self.session_store.clone(),
                &self.event_bus,
                self.ui_state.filter,
            );
            self.refresh_timer = None;
            // Fetch again once the new session store has restored
            self.was_authenticated = false;
            Self::restore_session(ctx, self.services.session.clone());
        }
        if self.config.login_route != self.active_config.login_route {
            self.guard = Guard::authenticated().redirect_to(self.config.login_route.clone());
        }
        self.active_config = ClientConfig {
            storage: self.active_config.storage.clone(),
            ..self.config.clone()
        };
    }

    /// React to sign-in / sign-out transitions seen in the UI state.
    fn sync_session(&mut self, ctx: &egui::Context) {
        let authenticated = self.ui_state.auth.is_authenticated();
        if authenticated && !self.was_authenticated {
            self.on_signed_in(ctx);
        } else if !authenticated && self.was_authenticated {
            self.refresh_timer = None;
            self.services.board.reset();
            self.services.chat.reset();
        }
        self.was_authenticated = authenticated;

        let access = self.guard.evaluate(&self.ui_state.auth);
        if access != self.last_access {
            if let Access::RedirectToLogin { redirect_to } = &access {
                log::debug!("Redirecting to {}", redirect_to);
            }
            self.last_access = access;
        }
    }

    fn on_signed_in(&mut self, ctx: &egui::Context) {
        let board = self.services.board.clone();
        let chat = self.services.chat.clone();
        Self::spawn(ctx, async move {
            if let Err(e) = board.fetch_tasks().await {
                log::warn!("Initial task fetch failed: {}", e);
            }
            if let Err(e) = chat.load_conversations().await {
                log::warn!("Could not load conversations: {}", e);
            }
        });

        let board = self.services.board.clone();
        let ctx = ctx.clone();
        self.refresh_timer = Some(Interval::new(TASK_REFRESH_MS, move || {
            let board = board.clone();
            Self::spawn(&ctx, async move {
                if let Err(e) = board.fetch_tasks().await {
                    log::error!("Background task refresh failed: {}", e);
                }
            });
        }));
    }

    // ─── Intent dispatch ─────────────────────────────────────

    fn dispatch_auth(&self, intent: AuthIntent, ctx: &egui::Context) {
        let session = self.services.session.clone();
        let event_bus = self.event_bus.clone();
        Self::spawn(ctx, async move {
            let result = match &intent {
                AuthIntent::Login(credentials) => session.login(credentials).await,
                AuthIntent::Register(registration) => session.register(registration).await,
            };
            if let Err(e) = result {
                log::warn!("Authentication failed: {}", e);
                event_bus.emit(AppEvent::AuthFailed { message: e.to_string() });
            }
        });
    }

    fn dispatch_logout(&self, ctx: &egui::Context) {
        let session = self.services.session.clone();
        let event_bus = self.event_bus.clone();
        Self::spawn(ctx, async move {
            if let Err(e) = session.logout().await {
                event_bus.emit(AppEvent::Error { message: e.to_string() });
            }
        });
    }

    fn dispatch_task(&self, intent: TaskIntent, ctx: &egui::Context) {
        let board = self.services.board.clone();
        if intent == TaskIntent::DismissError {
            board.clear_error();
            return;
        }
        Self::spawn(ctx, async move {
            let result = match intent {
                TaskIntent::Refresh => board.fetch_tasks().await,
                TaskIntent::SetFilter(filter) => board.set_filter(filter).await,
                TaskIntent::Create { title, description } => {
                    board.create_task(&title, &description).await.map(|_| ())
                }
                TaskIntent::Toggle(id) => board.toggle_completion(id).await.map(|_| ()),
                TaskIntent::Update { id, title, description } => {
                    board.update_task(id, &title, &description).await.map(|_| ())
                }
                TaskIntent::Delete(id) => board.delete_task(id).await,
                TaskIntent::DismissError => Ok(()),
            };
            // Already shown in the board's error banner
            if let Err(e) = result {
                log::warn!("Task operation failed: {}", e);
            }
        });
    }

    fn dispatch_chat(&self, intent: ChatIntent, ctx: &egui::Context) {
        let chat = self.services.chat.clone();
        if intent == ChatIntent::NewConversation {
            chat.new_conversation();
            return;
        }
        Self::spawn(ctx, async move {
            let result = match intent {
                ChatIntent::Send(text) => chat.send(&text).await.map(|_| ()),
                ChatIntent::OpenConversation(id) => chat.open_conversation(&id).await,
                ChatIntent::LoadConversations => chat.load_conversations().await,
                ChatIntent::NewConversation => Ok(()),
            };
            if let Err(e) = result {
                log::warn!("Chat operation failed: {}", e);
            }
        });
    }
}

impl eframe::App for TaskflowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            self.first_frame = false;
        }

        // Drain events from the core services
        let events = self.event_bus.drain();
        if !events.is_empty() {
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }
        self.sync_session(ctx);

        if self.ui_state.is_busy() {
            ctx.request_repaint();
        }

        // ── Top bar ──────────────────────────────────────────
        let mut logout_clicked = false;
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("TaskFlow")
                        .strong()
                        .color(theme::ACCENT)
                        .size(16.0),
                );
                ui.separator();
                ui.label(
                    RichText::new(&self.ui_state.status_text)
                        .color(theme::TEXT_SECONDARY)
                        .small(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .selectable_label(self.ui_state.show_settings, "Settings")
                        .clicked()
                    {
                        self.ui_state.show_settings = !self.ui_state.show_settings;
                    }
                    if let Some(name) = self.ui_state.username().map(String::from) {
                        if ui.button("Sign out").clicked() {
                            logout_clicked = true;
                        }
                        if ui
                            .selectable_label(self.ui_state.show_chat, "Assistant")
                            .clicked()
                        {
                            self.ui_state.show_chat = !self.ui_state.show_chat;
                        }
                        ui.label(RichText::new(name).color(theme::TEXT_PRIMARY));
                    }
                });
            });
        });
        if logout_clicked {
            self.dispatch_logout(ctx);
        }

        // ── Settings side panel ──────────────────────────────
        if self.ui_state.show_settings {
            let feedback = self.save_feedback.borrow().clone();
            let mut action = SettingsAction::None;
            SidePanel::right("settings_panel")
                .min_width(280.0)
                .max_width(350.0)
                .show(ctx, |ui| {
                    action = settings::settings_panel(ui, &mut self.config, feedback.as_ref());
                });
            match action {
                SettingsAction::SaveClicked => self.save_config(ctx),
                SettingsAction::Changed => *self.save_feedback.borrow_mut() = None,
                SettingsAction::None => {}
            }
        }

        // ── Main content (guarded) ───────────────────────────
        match self.last_access.clone() {
            Access::Granted => {
                if self.ui_state.show_chat {
                    let mut chat_intent = None;
                    SidePanel::right("chat_panel")
                        .min_width(320.0)
                        .default_width(380.0)
                        .show(ctx, |ui| {
                            chat_intent = chat::chat_panel(ui, &mut self.ui_state);
                        });
                    if let Some(intent) = chat_intent {
                        self.dispatch_chat(intent, ctx);
                    }
                }

                let mut task_intent = None;
                CentralPanel::default().show(ctx, |ui| {
                    task_intent = tasks::tasks_panel(ui, &mut self.ui_state);
                });
                if let Some(intent) = task_intent {
                    self.dispatch_task(intent, ctx);
                }
            }
            Access::RedirectToLogin { .. } => {
                let mut auth_intent = None;
                CentralPanel::default().show(ctx, |ui| {
                    auth_intent = auth::auth_panel(ui, &mut self.ui_state);
                });
                if let Some(intent) = auth_intent {
                    self.dispatch_auth(intent, ctx);
                }
            }
            blocked => {
                CentralPanel::default().show(ctx, |ui| {
                    access::blocked_view(ui, &blocked);
                });
            }
        }
    }
}
