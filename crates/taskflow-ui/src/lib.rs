//! egui panels for the TaskFlow client.
//!
//! Panels never call the core directly: they render [`state::UiState`]
//! and hand back an intent for the app layer to run.

pub mod state;
pub mod theme;
pub mod panels;
