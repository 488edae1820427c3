//! Report screen: header with badge and notice, scrollable body.

use super::{render_status_bar, Screen, ScreenContext};
use crate::text::{plain_lines, render_markdown, truncate_to_width, wrap_lines};
use crate::ui::main_layout;
use crate::ui::theme::Styles;
use crate::ui::widgets::KeyHint;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use stockdesk_engine::{ReportCard, ReportFormat};

/// The rendered research report.
pub struct ReportScreen;

impl Screen for ReportScreen {
    fn render(&self, ctx: &ScreenContext<'_>, area: Rect, buf: &mut Buffer) {
        let (main_area, status_area) = main_layout(area);
        buf.set_style(main_area, Styles::default());

        if let Some(card) = &ctx.state.report {
            let block = Block::default()
                .title(format!(
                    " {} ",
                    truncate_to_width(&card.heading(), usize::from(main_area.width.saturating_sub(4)))
                ))
                .title_style(Styles::title())
                .borders(Borders::ALL)
                .border_style(Styles::border())
                .style(Styles::default());
            let inner = block.inner(main_area);
            block.render(main_area, buf);

            let (header_area, body_area) = split_inner(card, inner);
            Paragraph::new(header_lines(card)).render(header_area, buf);

            let lines = body_lines(card, body_area.width);
            let max = max_scroll(lines.len(), body_area.height);
            Paragraph::new(lines)
                .scroll((ctx.state.report_scroll.min(max), 0))
                .render(body_area, buf);
        }

        render_status_bar(
            ctx,
            "Report",
            vec![
                KeyHint::new("j/k", "Scroll"),
                KeyHint::new("n", "New search"),
                KeyHint::new("q", "Quit"),
            ],
            status_area,
            buf,
        );
    }
}

/// Scroll limit and page height of the report body for a frame of `area`.
pub fn scroll_bounds(card: &ReportCard, area: Rect) -> (u16, u16) {
    let (main_area, _) = main_layout(area);
    let inner = Block::default().borders(Borders::ALL).inner(main_area);
    let (_, body_area) = split_inner(card, inner);
    let lines = body_lines(card, body_area.width);
    (max_scroll(lines.len(), body_area.height), body_area.height)
}

/// The body as display lines wrapped to `width`.
pub fn body_lines(card: &ReportCard, width: u16) -> Vec<Line<'static>> {
    let lines = match card.format {
        ReportFormat::Markdown => render_markdown(&card.content),
        ReportFormat::Plain => plain_lines(&card.content),
    };
    wrap_lines(lines, usize::from(width))
}

fn header_lines(card: &ReportCard) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        format!(" {} ", card.badge()),
        Styles::badge(card.cached),
    ))];
    if let Some(notice) = &card.notice {
        lines.push(Line::from(Span::styled(notice.clone(), Styles::warning())));
    }
    lines
}

fn split_inner(card: &ReportCard, inner: Rect) -> (Rect, Rect) {
    let header_height = if card.notice.is_some() { 3 } else { 2 };
    let [header, body] =
        Layout::vertical([Constraint::Length(header_height), Constraint::Min(0)]).areas(inner);
    (header, body)
}

fn max_scroll(line_count: usize, height: u16) -> u16 {
    u16::try_from(line_count.saturating_sub(usize::from(height))).unwrap_or(u16::MAX)
}
