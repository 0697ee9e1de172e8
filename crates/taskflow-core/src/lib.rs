//! TaskFlow core: everything between the UI and the browser.
//!
//! Talks to the outside world only through the traits in [`ports`].

pub mod ports;
pub mod event_bus;
pub mod api;
pub mod token;
pub mod session;
pub mod guard;
pub mod tasks;
pub mod chat;
