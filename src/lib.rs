/// Promo Tracker - annual promotional calendar planner (TUI Edition)
///
/// Core library providing the month-by-month plan grid for retail chains,
/// a reusable promotion library, archived plan history, and printing.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
