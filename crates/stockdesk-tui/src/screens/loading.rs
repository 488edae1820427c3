//! Loading screen: the ticker being researched and the stage list.

use super::{render_status_bar, Screen, ScreenContext};
use crate::ui::theme::{spinner, stage_indicator, Styles};
use crate::ui::widgets::KeyHint;
use crate::ui::{centered_fixed, main_layout};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Shown while a research request is in flight.
pub struct LoadingScreen;

impl Screen for LoadingScreen {
    fn render(&self, ctx: &ScreenContext<'_>, area: Rect, buf: &mut Buffer) {
        let (main_area, status_area) = main_layout(area);
        buf.set_style(main_area, Styles::default());

        let stage_count = ctx.state.progress.as_ref().map_or(0, |p| p.labels().len());
        let height = u16::try_from(stage_count).unwrap_or(u16::MAX).saturating_add(8);
        let content = centered_fixed(56.min(main_area.width), height, main_area);

        let block = Block::default()
            .title(format!(" Researching {} ", ctx.state.loading_ticker))
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(Styles::border_active())
            .style(Styles::default());

        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("  {} ", spinner(ctx.tick)), Styles::highlight()),
                Span::styled("Generating report", Styles::default()),
            ]),
            Line::from(""),
        ];

        if let Some(progress) = &ctx.state.progress {
            for (label, status) in progress.stages() {
                let (symbol, style) = stage_indicator(status);
                lines.push(Line::from(vec![
                    Span::styled(format!("  {symbol} "), style),
                    Span::styled(label.to_string(), style),
                ]));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  New reports take a minute or two;",
            Styles::dim(),
        )));
        lines.push(Line::from(Span::styled(
            "  cached ones return at once.",
            Styles::dim(),
        )));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(content, buf);

        render_status_bar(
            ctx,
            "Loading",
            vec![KeyHint::new("?", "Help"), KeyHint::new("q", "Quit")],
            status_area,
            buf,
        );
    }
}
