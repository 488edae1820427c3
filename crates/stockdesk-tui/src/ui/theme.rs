//! Theme and styling definitions for the stockdesk TUI.

use ratatui::style::{Color, Modifier, Style};
use stockdesk_engine::{QuotaLevel, StageStatus};

/// Color palette for the TUI.
pub struct Palette;

impl Palette {
    // Base colors
    pub const BG: Color = Color::Rgb(22, 27, 34);
    pub const FG: Color = Color::Rgb(225, 228, 232);
    pub const DIM: Color = Color::Rgb(139, 148, 158);
    pub const SURFACE: Color = Color::Rgb(36, 41, 47);

    // Accent colors
    pub const ACCENT: Color = Color::Rgb(88, 166, 255);
    pub const ACCENT_ALT: Color = Color::Rgb(210, 168, 255);

    // Status bar colors (high contrast)
    pub const STATUS_BG: Color = Color::Rgb(40, 46, 56);
    pub const STATUS_KEY_BG: Color = Color::Rgb(56, 95, 150);

    // Status colors
    pub const SUCCESS: Color = Color::Rgb(86, 211, 100);
    pub const WARNING: Color = Color::Rgb(227, 179, 65);
    pub const ERROR: Color = Color::Rgb(248, 81, 73);

    // Border colors
    pub const BORDER: Color = Color::Rgb(72, 79, 88);
    pub const BORDER_ACTIVE: Color = Color::Rgb(88, 166, 255);
}

/// Status indicator symbols (ASCII only).
pub struct Symbols;

impl Symbols {
    pub const DONE: &'static str = "[ok]";
    pub const ACTIVE: &'static str = "[..]";
    pub const PENDING: &'static str = "[  ]";
    pub const SPINNER: [&'static str; 4] = ["|", "/", "-", "\\"];
}

/// Spinner frame for the given tick.
pub fn spinner(tick: usize) -> &'static str {
    Symbols::SPINNER[tick % Symbols::SPINNER.len()]
}

/// Common styles used throughout the TUI.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Dimmed text for secondary information.
    pub fn dim() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::BG)
    }

    /// Highlighted/selected item.
    pub fn highlight() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn active() -> Style {
        Style::default().fg(Palette::ACCENT).bg(Palette::BG)
    }

    pub fn success() -> Style {
        Style::default().fg(Palette::SUCCESS).bg(Palette::BG)
    }

    pub fn warning() -> Style {
        Style::default().fg(Palette::WARNING).bg(Palette::BG)
    }

    pub fn error() -> Style {
        Style::default().fg(Palette::ERROR).bg(Palette::BG)
    }

    /// Title style.
    pub fn title() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint style (for status bar) - bright on dark for visibility.
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::STATUS_KEY_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint label style - readable on status bar background.
    pub fn key_label() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER)
    }

    pub fn border_active() -> Style {
        Style::default().fg(Palette::BORDER_ACTIVE)
    }

    /// Border of the ticker input while the invalid-input cue is showing.
    pub fn border_invalid() -> Style {
        Style::default()
            .fg(Palette::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the quota display at the given level.
    pub fn quota(level: QuotaLevel) -> Style {
        match level {
            QuotaLevel::Normal => Self::success(),
            QuotaLevel::Warning => Self::warning().add_modifier(Modifier::BOLD),
            QuotaLevel::Empty => Self::error().add_modifier(Modifier::BOLD),
        }
    }

    /// Style for the cached / freshly generated badge.
    pub fn badge(cached: bool) -> Style {
        let color = if cached { Palette::ACCENT_ALT } else { Palette::SUCCESS };
        Style::default()
            .fg(Palette::BG)
            .bg(color)
            .add_modifier(Modifier::BOLD)
    }
}

/// Symbol and style for a loading stage.
pub fn stage_indicator(status: StageStatus) -> (&'static str, Style) {
    match status {
        StageStatus::Done => (Symbols::DONE, Styles::success()),
        StageStatus::Active => (Symbols::ACTIVE, Styles::highlight()),
        StageStatus::Pending => (Symbols::PENDING, Styles::dim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_indicator() {
        let (sym, _) = stage_indicator(StageStatus::Done);
        assert_eq!(sym, "[ok]");
        let (sym, style) = stage_indicator(StageStatus::Pending);
        assert_eq!(sym, "[  ]");
        assert_eq!(style.fg, Some(Palette::DIM));
    }

    #[test]
    fn test_quota_styles_differ_by_level() {
        assert_eq!(Styles::quota(QuotaLevel::Normal).fg, Some(Palette::SUCCESS));
        assert_eq!(Styles::quota(QuotaLevel::Warning).fg, Some(Palette::WARNING));
        assert_eq!(Styles::quota(QuotaLevel::Empty).fg, Some(Palette::ERROR));
    }

    #[test]
    fn test_spinner_cycles() {
        assert_eq!(spinner(0), spinner(4));
        assert_ne!(spinner(0), spinner(1));
    }
}
