//! Report body rendering using pulldown-cmark.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::Style,
    text::{Line, Span},
};

use super::styles::MarkdownStyles;

const TABLE_SEPARATOR: &str = " │ ";
const RULE_WIDTH: usize = 40;

/// Render markdown to styled lines.
///
/// Lines are not wrapped; pass the result through [`super::wrap_lines`].
pub fn render_markdown(input: &str) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(input, options);
    let mut renderer = MarkdownRenderer::new(MarkdownStyles::from_palette());
    renderer.run(parser);

    while renderer.lines.last().is_some_and(|l| l.width() == 0) {
        renderer.lines.pop();
    }
    renderer.lines
}

/// The body as preformatted text, one line per source line.
pub fn plain_lines(input: &str) -> Vec<Line<'static>> {
    let style = MarkdownStyles::from_palette().text;
    input
        .lines()
        .map(|line| Line::from(Span::styled(line.replace('\t', "    "), style)))
        .collect()
}

struct MarkdownRenderer {
    lines: Vec<Line<'static>>,
    styles: MarkdownStyles,
    /// Active inline styles, innermost last.
    style_stack: Vec<Style>,
    current_spans: Vec<Span<'static>>,
    /// Next number per open list; `None` for bullet lists.
    list_stack: Vec<Option<u64>>,
    in_code_block: bool,
    in_blockquote: bool,
    pending_list_marker: Option<String>,
    task_checkbox: Option<bool>,
    in_table_head: bool,
    table_cells: Vec<Vec<Span<'static>>>,
}

impl MarkdownRenderer {
    fn new(styles: MarkdownStyles) -> Self {
        Self {
            lines: Vec::new(),
            styles,
            style_stack: Vec::new(),
            current_spans: Vec::new(),
            list_stack: Vec::new(),
            in_code_block: false,
            in_blockquote: false,
            pending_list_marker: None,
            task_checkbox: None,
            in_table_head: false,
            table_cells: Vec::new(),
        }
    }

    fn run<'a>(&mut self, parser: impl Iterator<Item = Event<'a>>) {
        for event in parser {
            self.handle_event(event);
        }
        self.flush_line();
    }

    #[allow(clippy::too_many_lines)]
    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush_line();
                let style = self.heading_style(level);
                self.style_stack.push(style);
            }
            Event::End(TagEnd::Heading(_)) => {
                self.flush_line();
                self.style_stack.pop();
                self.lines.push(Line::from(""));
            }

            Event::Start(Tag::Emphasis) => self.style_stack.push(self.styles.emphasis),
            Event::Start(Tag::Strong) => self.style_stack.push(self.styles.strong),
            Event::Start(Tag::Strikethrough) => self.style_stack.push(self.styles.strikethrough),
            Event::Start(Tag::Link { .. }) => self.style_stack.push(self.styles.link),
            Event::End(TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link) => {
                self.style_stack.pop();
            }

            Event::Start(Tag::CodeBlock(_)) => {
                self.flush_line();
                self.in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                self.flush_line();
                self.in_code_block = false;
                self.lines.push(Line::from(""));
            }

            Event::Start(Tag::List(start)) => {
                self.flush_line();
                self.list_stack.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.lines.push(Line::from(""));
                }
            }
            Event::Start(Tag::Item) => {
                self.flush_line();
                let indent = "  ".repeat(self.list_stack.len().saturating_sub(1));
                let marker = match self.list_stack.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                self.pending_list_marker = Some(marker);
            }
            Event::End(TagEnd::Item) => {
                self.flush_line();
                self.task_checkbox = None;
            }
            Event::TaskListMarker(checked) => {
                self.task_checkbox = Some(checked);
            }

            Event::Start(Tag::BlockQuote) => {
                self.flush_line();
                self.in_blockquote = true;
            }
            Event::End(TagEnd::BlockQuote) => {
                self.flush_line();
                self.in_blockquote = false;
            }

            // Tables render one row per line with columns separated by a bar.
            Event::Start(Tag::Table(_)) => self.flush_line(),
            Event::End(TagEnd::Table) => self.lines.push(Line::from("")),
            Event::Start(Tag::TableHead) => self.in_table_head = true,
            Event::End(TagEnd::TableHead) => {
                let row = self.take_table_row(true);
                let width = row.width();
                self.lines.push(row);
                self.lines
                    .push(Line::from(Span::styled("─".repeat(width), self.styles.rule)));
                self.in_table_head = false;
            }
            Event::End(TagEnd::TableRow) if !self.in_table_head => {
                let row = self.take_table_row(false);
                self.lines.push(row);
            }
            Event::End(TagEnd::TableCell) => {
                let cell = std::mem::take(&mut self.current_spans);
                self.table_cells.push(cell);
            }

            Event::Rule => {
                self.flush_line();
                self.lines
                    .push(Line::from(Span::styled("─".repeat(RULE_WIDTH), self.styles.rule)));
            }

            Event::End(TagEnd::Paragraph) => {
                self.flush_line();
                if self.list_stack.is_empty() {
                    self.lines.push(Line::from(""));
                }
            }

            Event::Text(text) => self.add_text(&text),
            Event::Code(code) => {
                self.begin_inline();
                self.current_spans
                    .push(Span::styled(code.into_string(), self.styles.code));
            }
            Event::SoftBreak => self.add_text(" "),
            Event::HardBreak => self.flush_line(),

            _ => {}
        }
    }

    fn add_text(&mut self, text: &str) {
        if self.in_code_block {
            for line in text.lines() {
                self.current_spans
                    .push(Span::styled(format!("  {line}"), self.styles.code_block));
                self.flush_line();
            }
            return;
        }

        self.begin_inline();
        let style = self.current_style();
        self.current_spans.push(Span::styled(text.to_string(), style));
    }

    /// Emit the pending list marker and the quote bar before the first
    /// inline span of a line.
    fn begin_inline(&mut self) {
        if let Some(marker) = self.pending_list_marker.take() {
            self.current_spans
                .push(Span::styled(marker, self.styles.list_marker));
            if let Some(checked) = self.task_checkbox.take() {
                let checkbox = if checked { "[x] " } else { "[ ] " };
                self.current_spans
                    .push(Span::styled(checkbox, self.styles.list_marker));
            }
        }

        if self.in_blockquote && self.current_spans.is_empty() {
            self.current_spans
                .push(Span::styled("│ ", self.styles.blockquote));
        }
    }

    fn take_table_row(&mut self, header: bool) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, cell) in std::mem::take(&mut self.table_cells).into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(TABLE_SEPARATOR, self.styles.rule));
            }
            for span in cell {
                let style = if header {
                    span.style.patch(self.styles.strong)
                } else {
                    span.style
                };
                spans.push(Span::styled(span.content, style));
            }
        }
        Line::from(spans)
    }

    fn current_style(&self) -> Style {
        let mut style = self.styles.text;
        for s in &self.style_stack {
            style = style.patch(*s);
        }
        if self.in_table_head {
            style = style.patch(self.styles.strong);
        }
        style
    }

    fn heading_style(&self, level: HeadingLevel) -> Style {
        match level {
            HeadingLevel::H1 => self.styles.h1,
            HeadingLevel::H2 => self.styles.h2,
            _ => self.styles.h3,
        }
    }

    fn flush_line(&mut self) {
        if !self.current_spans.is_empty() {
            let spans = std::mem::take(&mut self.current_spans);
            self.lines.push(Line::from(spans));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Modifier;

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_render_heading() {
        let lines = render_markdown("# Report\n\nBody text.");
        let text = texts(&lines);
        assert_eq!(text[0], "Report");
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert!(text.contains(&"Body text.".to_string()));
    }

    #[test]
    fn test_render_inline_code_and_bold() {
        let lines = render_markdown("Ticker **2330** trades as `TSM`.");
        let spans = &lines[0].spans;
        assert!(spans.iter().any(|s| s.content == "2330"
            && s.style.add_modifier.contains(Modifier::BOLD)));
        assert!(spans.iter().any(|s| s.content == "TSM"));
    }

    #[test]
    fn test_render_bullet_and_ordered_lists() {
        let text = texts(&render_markdown("- alpha\n- beta\n\n3. gamma\n4. delta"));
        assert!(text.contains(&"• alpha".to_string()));
        assert!(text.contains(&"• beta".to_string()));
        assert!(text.contains(&"3. gamma".to_string()));
        assert!(text.contains(&"4. delta".to_string()));
    }

    #[test]
    fn test_list_item_starting_with_code_keeps_marker_first() {
        let lines = render_markdown("- `2330` leads the index\n- plain");
        let text = texts(&lines);
        assert_eq!(text[0], "• 2330 leads the index");
        assert_eq!(text[1], "• plain");
        assert_eq!(lines[0].spans[1].content, "2330");
        assert_eq!(lines[0].spans[1].style, MarkdownStyles::from_palette().code);
    }

    #[test]
    fn test_quote_starting_with_code_keeps_bar() {
        let text = texts(&render_markdown("> `TSM` is the ADR"));
        assert_eq!(text[0], "│ TSM is the ADR");
    }

    #[test]
    fn test_render_nested_list_indents() {
        let text = texts(&render_markdown("- outer\n  - inner"));
        assert!(text.contains(&"  • inner".to_string()));
    }

    #[test]
    fn test_render_checkbox() {
        let text = texts(&render_markdown("- [ ] open\n- [x] done"));
        assert!(text.contains(&"• [ ] open".to_string()));
        assert!(text.contains(&"• [x] done".to_string()));
    }

    #[test]
    fn test_render_table() {
        let md = "| Metric | Value |\n|---|---|\n| EPS | 12.5 |\n| P/E | 18 |";
        let lines = render_markdown(md);
        let text = texts(&lines);
        assert_eq!(text[0], "Metric │ Value");
        assert!(text[1].chars().all(|c| c == '─'));
        assert_eq!(text[2], "EPS │ 12.5");
        assert_eq!(text[3], "P/E │ 18");
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert!(!lines[2].spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_render_rule_and_blockquote() {
        let text = texts(&render_markdown("> Not investment advice.\n\n---\n\nEnd"));
        assert_eq!(text[0], "│ Not investment advice.");
        assert!(text.iter().any(|l| l == &"─".repeat(RULE_WIDTH)));
        assert_eq!(text.last().map(String::as_str), Some("End"));
    }

    #[test]
    fn test_render_code_block() {
        let text = texts(&render_markdown("```\nprice = 1000\n```"));
        assert_eq!(text[0], "  price = 1000");
    }

    #[test]
    fn test_render_empty() {
        assert!(render_markdown("").is_empty());
    }

    #[test]
    fn test_no_trailing_blank_lines() {
        let lines = render_markdown("First.\n\nSecond.");
        assert_eq!(texts(&lines), vec!["First.", "", "Second."]);
    }

    #[test]
    fn test_plain_lines_keep_markup() {
        let text = texts(&plain_lines("# Report\n\n\t**bold**"));
        assert_eq!(text, vec!["# Report", "", "    **bold**"]);
    }
}
