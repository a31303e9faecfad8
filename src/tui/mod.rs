//! Terminal interface: plan grid, library manager and history panel.

pub mod app;
pub mod events;
pub mod layout;
pub mod theme;
pub mod views;
pub mod widgets;
