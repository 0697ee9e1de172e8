//! Settings panel: backend URL, login encoding, storage mode.
//! Changes apply only through the explicit Save button.

use egui::{self, RichText, Vec2};
use taskflow_types::config::{ClientConfig, LoginEncoding, StorageBackendType, DEFAULT_API_BASE};
use crate::theme::*;

/// What the caller should do after rendering the settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    /// Nothing changed
    None,
    /// A field was edited but not saved yet
    Changed,
    /// The user clicked the explicit Save button
    SaveClicked,
}

/// Save feedback passed in from the app layer
#[derive(Clone)]
pub struct SaveFeedback {
    pub message: String,
    pub success: bool,
}

/// Render the settings panel. Returns an action for the caller to handle.
pub fn settings_panel(
    ui: &mut egui::Ui,
    config: &mut ClientConfig,
    save_feedback: Option<&SaveFeedback>,
) -> SettingsAction {
    let mut changed = false;
    let mut save_clicked = false;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Settings").color(TEXT_PRIMARY));
            ui.separator();

            // ── Backend Section ──────────────────────────────
            ui.label(RichText::new("Backend").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("API Base URL").color(TEXT_SECONDARY).small());
            if ui
                .add(egui::TextEdit::singleline(&mut config.api.base_url).hint_text(DEFAULT_API_BASE))
                .changed()
            {
                changed = true;
            }

            ui.add_space(4.0);

            ui.label(RichText::new("Login encoding").color(TEXT_SECONDARY).small());
            egui::ComboBox::from_id_salt("login_encoding")
                .selected_text(config.api.login_encoding.label())
                .show_ui(ui, |ui| {
                    for enc in LoginEncoding::all() {
                        if ui
                            .selectable_value(&mut config.api.login_encoding, *enc, enc.label())
                            .changed()
                        {
                            changed = true;
                        }
                    }
                });

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            // ── Storage Section ──────────────────────────────
            ui.label(RichText::new("Session storage").color(ACCENT).strong());
            ui.add_space(2.0);

            egui::ComboBox::from_id_salt("storage_backend")
                .selected_text(storage_label(&config.storage.backend))
                .show_ui(ui, |ui| {
                    for backend in storage_options() {
                        let label = storage_label(&backend);
                        if ui
                            .selectable_value(&mut config.storage.backend, backend, label)
                            .changed()
                        {
                            changed = true;
                        }
                    }
                });

            ui.add_space(4.0);
            ui.label(
                RichText::new(storage_description(&config.storage.backend))
                    .color(TEXT_SECONDARY)
                    .small()
                    .italics(),
            );
            ui.label(
                RichText::new("Backend changes take effect after a reload.")
                    .color(WARNING)
                    .small(),
            );

            // ── Save Button ──────────────────────────────────
            ui.add_space(16.0);
            ui.separator();
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let btn = ui.add(
                    egui::Button::new(
                        RichText::new("Save Settings")
                            .color(TEXT_PRIMARY)
                            .strong(),
                    )
                    .fill(ACCENT)
                    .corner_radius(PANEL_ROUNDING)
                    .min_size(Vec2::new(120.0, 28.0)),
                );
                if btn.clicked() {
                    save_clicked = true;
                }

                if let Some(fb) = save_feedback {
                    let color = if fb.success { SUCCESS } else { ERROR };
                    ui.label(
                        RichText::new(&fb.message)
                            .color(color)
                            .small(),
                    );
                }
            });
        });

    if save_clicked {
        SettingsAction::SaveClicked
    } else if changed {
        SettingsAction::Changed
    } else {
        SettingsAction::None
    }
}

pub fn storage_label(backend: &StorageBackendType) -> &'static str {
    match backend {
        StorageBackendType::Auto => "Auto-detect",
        StorageBackendType::Memory => "Memory",
        StorageBackendType::LocalStorage => "localStorage",
        StorageBackendType::SessionStorage => "sessionStorage",
    }
}

pub fn storage_description(backend: &StorageBackendType) -> &'static str {
    match backend {
        StorageBackendType::Auto => "Uses localStorage when the browser allows it, memory otherwise.",
        StorageBackendType::Memory => "Volatile. You are signed out on every reload.",
        StorageBackendType::LocalStorage => "Persistent and shared by every tab of this site.",
        StorageBackendType::SessionStorage => "Kept for this tab only; other tabs sign in separately.",
    }
}

pub fn storage_options() -> [StorageBackendType; 4] {
    [
        StorageBackendType::Auto,
        StorageBackendType::LocalStorage,
        StorageBackendType::SessionStorage,
        StorageBackendType::Memory,
    ]
}
