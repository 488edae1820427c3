//! Text wrapping for styled lines.

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use super::width::visual_width;

/// Wrap a plain string to `width` cells.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    textwrap::wrap(text, width)
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect()
}

/// Wrap every line to `width` cells, preserving span styles.
pub fn wrap_lines(lines: Vec<Line<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return lines;
    }

    lines
        .into_iter()
        .flat_map(|line| wrap_line(line, width))
        .collect()
}

fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    let total_width: usize = line.spans.iter().map(|s| visual_width(&s.content)).sum();
    if total_width <= width {
        return vec![line];
    }

    let chars_with_styles: Vec<(char, Style)> = line
        .spans
        .iter()
        .flat_map(|span| span.content.chars().map(move |ch| (ch, span.style)))
        .collect();
    let plain_text: String = chars_with_styles.iter().map(|(ch, _)| ch).collect();

    // textwrap picks the break points; styles are re-attached by walking the
    // original characters in step with each wrapped row.
    let mut result = Vec::new();
    let mut char_idx = 0;

    for wrapped in textwrap::wrap(&plain_text, width) {
        // Whitespace dropped at a break is skipped
        while let Some(&(ch, _)) = chars_with_styles.get(char_idx) {
            if ch.is_whitespace() && !wrapped.starts_with(ch) {
                char_idx += 1;
            } else {
                break;
            }
        }

        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut current: Option<(String, Style)> = None;

        for expected in wrapped.chars() {
            let (ch, style) = chars_with_styles
                .get(char_idx)
                .copied()
                .unwrap_or((expected, Style::default()));
            char_idx += 1;

            match current.as_mut() {
                Some((text, s)) if *s == style => text.push(ch),
                _ => {
                    if let Some((text, s)) = current.take() {
                        spans.push(Span::styled(text, s));
                    }
                    current = Some((ch.to_string(), style));
                }
            }
        }

        if let Some((text, s)) = current {
            spans.push(Span::styled(text, s));
        }
        if !spans.is_empty() {
            result.push(Line::from(spans));
        }
    }

    if result.is_empty() {
        result.push(Line::from(""));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_wrap_text_long() {
        let lines = wrap_text("Revenue grew on strong demand for advanced nodes", 12);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(visual_width(line) <= 12);
        }
    }

    #[test]
    fn test_wrap_line_short_is_untouched() {
        let wrapped = wrap_line(Line::from("Short"), 20);
        assert_eq!(wrapped.len(), 1);
    }

    #[test]
    fn test_wrap_line_preserves_style() {
        let red = Style::default().fg(Color::Red);
        let blue = Style::default().fg(Color::Blue);
        let line = Line::from(vec![
            Span::styled("Gross margin ", red),
            Span::styled("held above fifty percent", blue),
        ]);
        let wrapped = wrap_line(line, 16);

        assert!(wrapped.len() > 1);
        assert_eq!(wrapped[0].spans[0].style, red);
        assert_eq!(wrapped.last().unwrap().spans.last().unwrap().style, blue);
        let rejoined: Vec<String> = wrapped.iter().map(line_text).collect();
        assert_eq!(rejoined.join(" "), "Gross margin held above fifty percent");
    }

    #[test]
    fn test_wrap_line_counts_wide_chars_as_two_cells() {
        // Five CJK characters are ten cells: too wide for eight.
        let wrapped = wrap_line(Line::from("台積電法說會"), 8);
        assert!(wrapped.len() > 1);
        for line in &wrapped {
            assert!(visual_width(&line_text(line)) <= 8);
        }
        let all: String = wrapped.iter().map(line_text).collect();
        assert_eq!(all, "台積電法說會");
    }

    #[test]
    fn test_wrap_lines_zero_width_passthrough() {
        let lines = vec![Line::from("anything at all")];
        assert_eq!(wrap_lines(lines, 0).len(), 1);
    }
}
