//! What a guarded view shows instead of its content.

use egui::{self, RichText};
use taskflow_core::guard::{Access, Denial};
use crate::theme::*;

/// Render the placeholder for a non-granted access decision. `Granted`
/// and `RedirectToLogin` are handled by the caller and draw nothing here.
pub fn blocked_view(ui: &mut egui::Ui, access: &Access) {
    ui.vertical_centered(|ui| {
        ui.add_space(48.0);
        match access {
            Access::Loading => {
                ui.spinner();
            }
            Access::Denied(denial) => {
                ui.label(RichText::new("Access denied").color(ERROR).strong());
                ui.label(RichText::new(denial_message(denial)).color(TEXT_SECONDARY));
            }
            Access::RedirectToLogin { .. } | Access::Granted => {}
        }
    });
}

pub fn denial_message(denial: &Denial) -> String {
    match denial {
        Denial::Role { required, actual } => format!(
            "Requires role {} (you have {})",
            required.join(" or "),
            actual.as_deref().unwrap_or("none")
        ),
        Denial::Permissions { missing } => {
            format!("Missing permission(s): {}", missing.join(", "))
        }
    }
}
