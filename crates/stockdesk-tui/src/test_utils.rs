//! Test utilities for rendering screens into buffers.

use crate::screens::{self, ScreenContext};
use crate::view::ViewState;
use ratatui::{buffer::Buffer, layout::Rect};
use stockdesk_engine::Config;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Convert a buffer to text, one row per line with trailing spaces trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}

/// Render `state` at the default size with the default quick picks.
pub fn render_state_buffer(state: &ViewState) -> Buffer {
    let config = Config::default();
    let ctx = ScreenContext {
        state,
        quick_picks: &config.quick_picks,
        tick: 0,
    };
    let area = Rect::new(0, 0, TEST_WIDTH, TEST_HEIGHT);
    let mut buffer = Buffer::empty(area);
    screens::render(&ctx, area, &mut buffer);
    buffer
}

/// Render `state` and return the screen as text.
pub fn render_state(state: &ViewState) -> String {
    buffer_to_string(&render_state_buffer(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_to_string() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "2330", ratatui::style::Style::default());
        buffer.set_string(0, 1, "TSMC", ratatui::style::Style::default());

        assert_eq!(buffer_to_string(&buffer), "2330\nTSMC\n");
    }
}
