//! Text rendering utilities.
//!
//! - [`render_markdown`] - Render a report body to styled ratatui Lines
//! - [`plain_lines`] - Preformatted fallback when markdown is disabled
//! - [`wrap_lines`], [`wrap_text`] - Width-aware wrapping
//! - [`visual_width`], [`truncate_to_width`] - Terminal cell measurement

mod markdown;
mod styles;
mod width;
mod wrap;

pub use markdown::{plain_lines, render_markdown};
pub use styles::MarkdownStyles;
pub use width::{truncate_to_width, visual_width};
pub use wrap::{wrap_lines, wrap_text};
