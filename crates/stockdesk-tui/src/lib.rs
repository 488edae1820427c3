//! stockdesk-tui: Terminal UI for the stockdesk research client
//!
//! This crate provides the terminal front-end:
//! - [`TuiView`], the controller's view over shared render state
//! - Search, loading, report and error screens
//! - Markdown rendering of report bodies

mod app;
mod event;
mod screens;
#[cfg(test)]
mod test_utils;
pub mod text;
mod ui;
mod view;

pub use app::App;
pub use event::{Action, Event, EventHandler};
pub use stockdesk_engine;
pub use view::{TuiView, ViewState};

use crossterm::{
    cursor::Show as ShowCursor,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use screens::ScreenContext;
use std::io::{self, stdout};
use stockdesk_engine::{Config, HttpClient, ResearchApi, ViewKind};
use tracing::info;

/// Render tick, 4 Hz.
const TICK_RATE_MS: u64 = 250;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI against the backend named in `config`.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit.
pub async fn run_tui(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let client = HttpClient::new(&config.base_url, config.request_timeout())?;
    info!(base_url = %client.base_url(), "Starting TUI");

    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client, config);
    app.refresh_quota();

    let mut events = EventHandler::new(TICK_RATE_MS);
    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    terminal.show_cursor()?;
    info!("TUI exited");

    result
}

async fn run_loop<A: ResearchApi + 'static>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<A>,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            let mut state = app.view().state();

            let bounds = match (&state.active, &state.report) {
                (ViewKind::Report, Some(card)) => Some(screens::report::scroll_bounds(card, area)),
                _ => None,
            };
            if let Some((max, page)) = bounds {
                state.set_max_scroll(max);
                state.report_page = page;
            }

            let ctx = ScreenContext {
                state: &state,
                quick_picks: app.quick_picks(),
                tick: app.tick,
            };
            screens::render(&ctx, area, frame.buffer_mut());
        })?;

        match events.next().await {
            Some(Event::Key(key)) => {
                // Requests run detached; results land in the view state.
                let _ = app.handle_key(key);
            }
            Some(Event::Tick) => app.tick(),
            Some(Event::Resize(_, _)) => {}
            None => break,
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
