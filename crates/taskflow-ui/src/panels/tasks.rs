//! Task board: filter bar, new-task form, list with inline editing.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use taskflow_types::task::{Task, TaskFilter};
use crate::state::{TaskDraft, UiState};
use crate::theme::*;

/// What the user asked the task board to do
#[derive(Debug, Clone, PartialEq)]
pub enum TaskIntent {
    Refresh,
    SetFilter(TaskFilter),
    Create { title: String, description: String },
    Toggle(i64),
    Update { id: i64, title: String, description: String },
    Delete(i64),
    DismissError,
}

/// Render the task board. At most one intent per frame.
pub fn tasks_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<TaskIntent> {
    let mut intent = None;

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.heading(RichText::new("Tasks").color(TEXT_PRIMARY).strong());
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if state.tasks_loading {
                        ui.spinner();
                    } else if ui.small_button("Refresh").clicked() {
                        intent = Some(TaskIntent::Refresh);
                    }
                });
            });

            ui.horizontal(|ui| {
                for filter in TaskFilter::all() {
                    if ui.selectable_label(state.filter == filter, filter.label()).clicked()
                        && state.filter != filter
                    {
                        state.filter = filter;
                        intent = Some(TaskIntent::SetFilter(filter));
                    }
                }
            });

            if let Some(err) = state.task_error.clone() {
                if let Some(i) = error_banner(ui, &err) {
                    intent = Some(i);
                }
            }

            ui.separator();
            if let Some(i) = new_task_form(ui, state) {
                intent = Some(i);
            }
            ui.separator();

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if state.tasks.is_empty() && !state.tasks_loading {
                        ui.label(RichText::new("No tasks yet").color(TEXT_SECONDARY).italics());
                    }
                    for task in &state.tasks {
                        let editing = state.editing.as_mut().filter(|d| d.id == task.id);
                        let row = match editing {
                            Some(draft) => edit_row(ui, draft),
                            None => task_row(ui, task),
                        };
                        match row {
                            Some(RowAction::Intent(i)) => intent = Some(i),
                            Some(RowAction::StartEdit) => {
                                state.editing = Some(TaskDraft::from_task(task));
                            }
                            Some(RowAction::CancelEdit) => state.editing = None,
                            None => {}
                        }
                        ui.add_space(4.0);
                    }
                });
        });

    if matches!(intent, Some(TaskIntent::Update { .. })) {
        state.editing = None;
    }
    intent
}

fn error_banner(ui: &mut egui::Ui, message: &str) -> Option<TaskIntent> {
    let mut intent = None;
    egui::Frame::default()
        .fill(ERROR_BG)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(message).color(ERROR));
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.small_button("Dismiss").clicked() {
                        intent = Some(TaskIntent::DismissError);
                    }
                    if ui.small_button("Retry").clicked() {
                        intent = Some(TaskIntent::Refresh);
                    }
                });
            });
        });
    intent
}

fn new_task_form(ui: &mut egui::Ui, state: &mut UiState) -> Option<TaskIntent> {
    ui.add(
        egui::TextEdit::singleline(&mut state.new_title)
            .hint_text("What needs doing?")
            .desired_width(f32::INFINITY),
    );
    ui.add(
        egui::TextEdit::multiline(&mut state.new_description)
            .hint_text("Description (optional)")
            .desired_rows(2)
            .desired_width(f32::INFINITY),
    );

    let enabled = !state.new_title.trim().is_empty() && !state.tasks_loading;
    let add = ui.add_enabled(
        enabled,
        egui::Button::new(RichText::new("Add task").color(TEXT_PRIMARY))
            .fill(if enabled { ACCENT } else { BG_SURFACE })
            .corner_radius(PANEL_ROUNDING)
            .min_size(Vec2::new(90.0, 0.0)),
    );
    if !add.clicked() {
        return None;
    }

    let title = std::mem::take(&mut state.new_title);
    let description = std::mem::take(&mut state.new_description);
    Some(TaskIntent::Create { title, description })
}

enum RowAction {
    Intent(TaskIntent),
    StartEdit,
    CancelEdit,
}

fn task_row(ui: &mut egui::Ui, task: &Task) -> Option<RowAction> {
    let mut action = None;
    egui::Frame::default()
        .fill(BG_SECONDARY)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                let mut done = task.is_completed();
                if ui.checkbox(&mut done, "").changed() {
                    action = Some(RowAction::Intent(TaskIntent::Toggle(task.id)));
                }

                ui.vertical(|ui| {
                    let mut title = RichText::new(&task.title).color(TEXT_PRIMARY);
                    if task.is_completed() {
                        title = title.strikethrough().color(TEXT_SECONDARY);
                    }
                    ui.label(title);
                    if let Some(desc) = &task.description {
                        ui.label(RichText::new(desc).color(TEXT_SECONDARY).small());
                    }
                    ui.label(
                        RichText::new(task.status.label())
                            .color(status_color(task.status))
                            .small(),
                    );
                });

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.small_button("Delete").clicked() {
                        action = Some(RowAction::Intent(TaskIntent::Delete(task.id)));
                    }
                    if ui.small_button("Edit").clicked() {
                        action = Some(RowAction::StartEdit);
                    }
                });
            });
        });
    action
}

fn edit_row(ui: &mut egui::Ui, draft: &mut TaskDraft) -> Option<RowAction> {
    let mut action = None;
    egui::Frame::default()
        .fill(BG_SURFACE)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.add(egui::TextEdit::singleline(&mut draft.title).desired_width(f32::INFINITY));
            ui.add(
                egui::TextEdit::multiline(&mut draft.description)
                    .desired_rows(2)
                    .desired_width(f32::INFINITY),
            );
            ui.horizontal(|ui| {
                let can_save = !draft.title.trim().is_empty();
                if ui.add_enabled(can_save, egui::Button::new("Save")).clicked() {
                    action = Some(RowAction::Intent(TaskIntent::Update {
                        id: draft.id,
                        title: draft.title.clone(),
                        description: draft.description.clone(),
                    }));
                }
                if ui.button("Cancel").clicked() {
                    action = Some(RowAction::CancelEdit);
                }
            });
        });
    action
}
