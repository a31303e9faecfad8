pub mod grid;
pub mod history;
pub mod library;
