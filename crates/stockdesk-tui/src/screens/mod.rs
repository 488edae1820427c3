//! Screen definitions for the stockdesk TUI, one per view section.

pub mod error;
pub mod loading;
pub mod report;
pub mod search;

use crate::ui::centered_fixed;
use crate::ui::theme::Styles;
use crate::ui::widgets::{KeyHint, StatusBar};
use crate::view::ViewState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use stockdesk_engine::{QuickPick, ViewKind};

/// What a screen needs to draw itself.
pub struct ScreenContext<'a> {
    pub state: &'a ViewState,
    pub quick_picks: &'a [QuickPick],
    /// Frame counter for the spinner.
    pub tick: usize,
}

/// Trait for screens that can be rendered.
pub trait Screen {
    fn render(&self, ctx: &ScreenContext<'_>, area: Rect, buf: &mut Buffer);
}

/// Render whichever section is visible, plus the help overlay if open.
pub fn render(ctx: &ScreenContext<'_>, area: Rect, buf: &mut Buffer) {
    match ctx.state.active {
        ViewKind::Search => search::SearchScreen.render(ctx, area, buf),
        ViewKind::Loading => loading::LoadingScreen.render(ctx, area, buf),
        ViewKind::Report => report::ReportScreen.render(ctx, area, buf),
        ViewKind::Error => error::ErrorScreen.render(ctx, area, buf),
    }

    if ctx.state.show_help {
        render_help_overlay(area, buf);
    }
}

/// Status bar with the quota on the right.
fn render_status_bar(
    ctx: &ScreenContext<'_>,
    mode: &str,
    hints: Vec<KeyHint>,
    area: Rect,
    buf: &mut Buffer,
) {
    let bar = StatusBar::new(mode).hints(hints);
    let bar = match ctx.state.quota {
        Some((quota, level)) => bar.right(
            format!("Quota {}/{}", quota.remaining, quota.total),
            Styles::quota(level),
        ),
        None => bar.right("Quota --", Styles::dim()),
    };
    bar.render(area, buf);
}

/// Render the help overlay.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    let help_text = r"
  Search
    Enter             Research the ticker
    F1-F4             Quick pick
    Up/Down           Previous tickers

  Report / error
    j/k or Up/Down    Scroll
    PgUp/PgDn/Home    Page / top
    Esc or n          New search

  Ctrl+C              Quit
  q                   Quit outside search
  ?                   Toggle this help

  [Press any key to close]
";

    let width = 50.min(area.width.saturating_sub(4));
    let height = 20.min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    Paragraph::new(help_text)
        .block(block)
        .style(Styles::default())
        .render(overlay_area, buf);
}
