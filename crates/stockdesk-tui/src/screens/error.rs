//! Error screen.

use super::{render_status_bar, Screen, ScreenContext};
use crate::text::wrap_text;
use crate::ui::theme::Styles;
use crate::ui::widgets::KeyHint;
use crate::ui::{centered_fixed, main_layout};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Shown when a request is rejected or fails.
pub struct ErrorScreen;

impl Screen for ErrorScreen {
    fn render(&self, ctx: &ScreenContext<'_>, area: Rect, buf: &mut Buffer) {
        let (main_area, status_area) = main_layout(area);
        buf.set_style(main_area, Styles::default());

        let width = 60.min(main_area.width);
        let content = centered_fixed(width, box_height(ctx, width), main_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::error())
            .style(Styles::default());

        let mut lines = vec![Line::from("")];
        if let Some(notice) = &ctx.state.error {
            lines.push(Line::from(Span::styled(
                notice.title.clone(),
                Styles::error().add_modifier(ratatui::style::Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(notice.message.clone(), Styles::default())));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Esc or n to start a new search",
            Styles::dim(),
        )));

        Paragraph::new(lines)
            .block(block)
            .centered()
            .wrap(Wrap { trim: true })
            .render(content, buf);

        render_status_bar(
            ctx,
            "Error",
            vec![
                KeyHint::new("Esc", "New search"),
                KeyHint::new("F1-F4", "Quick pick"),
                KeyHint::new("q", "Quit"),
            ],
            status_area,
            buf,
        );
    }
}

/// Box height that fits the wrapped notice, never below nine rows.
fn box_height(ctx: &ScreenContext<'_>, width: u16) -> u16 {
    let inner_width = usize::from(width.saturating_sub(2));
    let notice_rows = ctx.state.error.as_ref().map_or(0, |notice| {
        wrap_text(&notice.title, inner_width).len()
            + 1
            + wrap_text(&notice.message, inner_width).len()
    });
    // Borders, the hint with its blank line, and a blank row above and below.
    u16::try_from(notice_rows + 6).unwrap_or(u16::MAX).max(9)
}
