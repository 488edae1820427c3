//! Search screen: ticker input, quick picks and the quota line.

use super::{render_status_bar, Screen, ScreenContext};
use crate::ui::theme::Styles;
use crate::ui::widgets::KeyHint;
use crate::ui::{centered_fixed, main_layout};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use stockdesk_engine::QuotaLevel;

/// The search (landing) screen.
pub struct SearchScreen;

impl Screen for SearchScreen {
    fn render(&self, ctx: &ScreenContext<'_>, area: Rect, buf: &mut Buffer) {
        let (main_area, status_area) = main_layout(area);
        buf.set_style(main_area, Styles::default());

        let content = centered_fixed(60.min(main_area.width), 12, main_area);
        let [title_area, input_area, picks_area, quota_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .areas(content);

        Paragraph::new(vec![
            Line::from(Span::styled("stockdesk", Styles::title())),
            Line::from(Span::styled(
                "AI research reports for Taiwan-listed stocks",
                Styles::dim(),
            )),
        ])
        .centered()
        .render(title_area, buf);

        let border_style = if ctx.state.invalid_cue() {
            Styles::border_invalid()
        } else if ctx.state.input_focused {
            Styles::border_active()
        } else {
            Styles::border()
        };
        let block = Block::default()
            .title(" Ticker ")
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Styles::default());
        ctx.state
            .input
            .widget()
            .block(block)
            .focused(ctx.state.input_focused)
            .placeholder("e.g. 2330")
            .render(input_area, buf);

        render_quick_picks(ctx, picks_area, buf);
        render_quota_line(ctx, quota_area, buf);

        render_status_bar(
            ctx,
            "Search",
            vec![
                KeyHint::new("Enter", "Research"),
                KeyHint::new("F1-F4", "Quick pick"),
                KeyHint::new("Ctrl+C", "Quit"),
            ],
            status_area,
            buf,
        );
    }
}

fn render_quick_picks(ctx: &ScreenContext<'_>, area: Rect, buf: &mut Buffer) {
    let mut lines = vec![Line::from(Span::styled("Popular", Styles::dim()))];

    // Two picks per row
    let picks: Vec<_> = ctx.quick_picks.iter().take(4).enumerate().collect();
    for row in picks.chunks(2) {
        let mut spans = Vec::new();
        for (i, (slot, pick)) in row.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("   "));
            }
            spans.push(Span::styled(format!(" F{} ", slot + 1), Styles::key_hint()));
            spans.push(Span::styled(
                format!(" {} {}", pick.ticker, pick.label),
                Styles::default(),
            ));
        }
        lines.push(Line::from(spans));
    }

    Paragraph::new(lines).centered().render(area, buf);
}

fn render_quota_line(ctx: &ScreenContext<'_>, area: Rect, buf: &mut Buffer) {
    let line = match ctx.state.quota {
        Some((quota, level)) => {
            let text = match level {
                QuotaLevel::Empty => "No research requests left today".to_string(),
                QuotaLevel::Warning => "1 research request left today".to_string(),
                QuotaLevel::Normal => format!(
                    "{} of {} research requests left today",
                    quota.remaining, quota.total
                ),
            };
            Line::from(Span::styled(text, Styles::quota(level)))
        }
        None => Line::from(Span::styled("Checking quota...", Styles::dim())),
    };
    Paragraph::new(line).centered().render(area, buf);
}
