//! Chat panel: the assistant transcript, conversation list and input field.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use taskflow_types::chat::{ChatMessage, Sender};
use crate::state::UiState;
use crate::theme::*;

#[derive(Debug, Clone, PartialEq)]
pub enum ChatIntent {
    Send(String),
    NewConversation,
    OpenConversation(String),
    LoadConversations,
}

/// Render the chat panel. Returns an intent when the user acts.
pub fn chat_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<ChatIntent> {
    let mut intent = None;
    let busy = state.chat.is_loading;

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                // Header
                ui.horizontal(|ui| {
                    ui.heading(RichText::new("Assistant").color(TEXT_PRIMARY).strong());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.small_button("New").clicked() {
                            intent = Some(ChatIntent::NewConversation);
                        }
                        if busy {
                            ui.spinner();
                        }
                    });
                });

                // Conversation picker
                let current = state.chat.current_conversation_id.clone();
                let selected = current
                    .as_deref()
                    .and_then(|id| state.chat.conversations.iter().find(|c| c.id == id))
                    .map(|c| c.display_title().to_string())
                    .unwrap_or_else(|| "New conversation".to_string());
                let combo = egui::ComboBox::from_id_salt("conversation_picker")
                    .selected_text(selected)
                    .width(ui.available_width())
                    .show_ui(ui, |ui| {
                        for conv in &state.chat.conversations {
                            let is_current = current.as_deref() == Some(conv.id.as_str());
                            if ui.selectable_label(is_current, conv.display_title()).clicked() && !is_current {
                                intent = Some(ChatIntent::OpenConversation(conv.id.clone()));
                            }
                        }
                    });
                if combo.response.clicked() {
                    intent = Some(ChatIntent::LoadConversations);
                }

                ui.separator();

                // Messages area
                let available_height = ui.available_height() - 60.0;
                ScrollArea::vertical()
                    .max_height(available_height)
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        if state.chat.messages.is_empty() {
                            ui.label(
                                RichText::new("Ask me to add, list or complete tasks.")
                                    .color(TEXT_SECONDARY)
                                    .italics(),
                            );
                        }
                        for message in &state.chat.messages {
                            render_message(ui, message);
                            ui.add_space(4.0);
                        }
                        if busy {
                            ui.label(RichText::new("Thinking...").color(TEXT_SECONDARY).italics());
                        }
                    });

                if let Some(err) = &state.chat.error {
                    ui.label(RichText::new(err).color(ERROR).small());
                }

                ui.add_space(8.0);

                // Input area
                ui.horizontal(|ui| {
                    let input = egui::TextEdit::singleline(&mut state.chat_input)
                        .hint_text("Type a message...")
                        .desired_width(ui.available_width() - 70.0)
                        .font(egui::FontId::proportional(14.0));

                    let response = ui.add(input);

                    let send_enabled = !state.chat_input.trim().is_empty() && !busy;
                    let send_btn = ui.add_enabled(
                        send_enabled,
                        egui::Button::new(RichText::new("Send").color(TEXT_PRIMARY))
                            .fill(if send_enabled { ACCENT } else { BG_SURFACE })
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(60.0, 0.0)),
                    );

                    // Submit on Enter or button click
                    let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if send_enabled && (entered || send_btn.clicked()) {
                        intent = Some(ChatIntent::Send(state.chat_input.trim().to_string()));
                        state.chat_input.clear();
                        response.request_focus();
                    }
                });
            });
        });

    intent
}

pub fn sender_label(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "You",
        Sender::Assistant => "Assistant",
        Sender::System => "Notice",
    }
}

fn render_message(ui: &mut egui::Ui, message: &ChatMessage) {
    let (label_color, bg) = match message.sender {
        Sender::User => (ACCENT, BG_SECONDARY),
        Sender::Assistant => (SUCCESS, BG_SURFACE),
        Sender::System => (TEXT_SECONDARY, BG_SURFACE),
    };
    let label = sender_label(message.sender);

    egui::Frame::default()
        .fill(bg)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.label(RichText::new(label).color(label_color).strong().small());
            ui.label(RichText::new(&message.content).color(TEXT_PRIMARY));
            for action in &message.actions_taken {
                ui.label(RichText::new(format!("✓ {}", action)).color(SUCCESS).small());
            }
            if let Some(tool) = &message.tool_used {
                ui.label(RichText::new(format!("[{}]", tool)).color(WARNING).small());
            }
        });
}
