//! UI building blocks for the stockdesk TUI.

pub mod layout;
pub mod theme;
pub mod widgets;

pub use layout::{centered_fixed, main_layout};
