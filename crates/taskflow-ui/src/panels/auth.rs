//! Login / registration form.

use egui::{self, RichText, Vec2};
use taskflow_types::user::{Credentials, Registration};
use crate::state::{AuthMode, UiState};
use crate::theme::*;

/// A submitted form
#[derive(Debug, Clone)]
pub enum AuthIntent {
    Login(Credentials),
    Register(Registration),
}

/// Render the auth form. Returns an intent when the user submits.
pub fn auth_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<AuthIntent> {
    let mut submitted = None;
    let form = &mut state.auth_form;

    ui.vertical_centered(|ui| {
        ui.add_space(48.0);
        egui::Frame::default()
            .fill(BG_SECONDARY)
            .inner_margin(PANEL_PADDING * 2.0)
            .corner_radius(PANEL_ROUNDING)
            .show(ui, |ui| {
                ui.set_max_width(320.0);

                ui.horizontal(|ui| {
                    if ui.selectable_label(form.mode == AuthMode::Login, "Sign in").clicked() {
                        form.mode = AuthMode::Login;
                        form.error = None;
                    }
                    if ui.selectable_label(form.mode == AuthMode::Register, "Create account").clicked() {
                        form.mode = AuthMode::Register;
                        form.error = None;
                    }
                });
                ui.separator();

                ui.label(RichText::new("Username").color(TEXT_SECONDARY).small());
                ui.text_edit_singleline(&mut form.username);

                if form.mode == AuthMode::Register {
                    ui.label(RichText::new("Email").color(TEXT_SECONDARY).small());
                    ui.add(egui::TextEdit::singleline(&mut form.email).hint_text("you@example.com"));
                }

                ui.label(RichText::new("Password").color(TEXT_SECONDARY).small());
                let password = ui.add(egui::TextEdit::singleline(&mut form.password).password(true));
                if form.mode == AuthMode::Register {
                    ui.label(
                        RichText::new("At least 8 characters, with upper and lower case letters and a number")
                            .color(TEXT_SECONDARY)
                            .small()
                            .italics(),
                    );
                }

                if let Some(err) = &form.error {
                    ui.add_space(4.0);
                    ui.label(RichText::new(err).color(ERROR));
                }

                ui.add_space(8.0);
                let label = match form.mode {
                    AuthMode::Login => "Sign in",
                    AuthMode::Register => "Create account",
                };
                let clicked = ui
                    .add_enabled(
                        !form.pending,
                        egui::Button::new(RichText::new(label).color(TEXT_PRIMARY).strong())
                            .fill(ACCENT)
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(120.0, 28.0)),
                    )
                    .clicked();
                let entered = password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                if form.pending {
                    ui.spinner();
                } else if clicked || entered {
                    form.error = None;
                    form.pending = true;
                    submitted = Some(match form.mode {
                        AuthMode::Login => AuthIntent::Login(Credentials::new(
                            form.username.trim(),
                            form.password.clone(),
                        )),
                        AuthMode::Register => AuthIntent::Register(Registration {
                            username: form.username.trim().to_string(),
                            email: form.email.trim().to_string(),
                            password: form.password.clone(),
                        }),
                    });
                }
            });
    });

    submitted
}
