//! Terminal run page for dobie
//!
//! Built with Ratatui; drives a `dobie_core::PageState` against a live client.

pub mod app;
mod event;
pub mod ui;
pub mod widgets;

pub use app::{App, AppError, AppResult, DialogFocus, PageExit, TOAST_TTL};
pub use event::{Event, EventHandler};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dobie_client::OrchestratorClient;
use dobie_core::PageState;
use ratatui::prelude::*;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;

const TICK_RATE: Duration = Duration::from_millis(200);

/// Run the page until the user quits or the project is deleted.
///
/// Returns how the page closed and its final state, so the caller can
/// report any notices still pending.
pub async fn run(
    client: Arc<dyn OrchestratorClient>,
    state: PageState,
) -> AppResult<(PageExit, PageState)> {
    // Log lines would corrupt the alternate screen; the guard restores the
    // previous subscriber on drop
    let _guard = tracing::subscriber::set_default(
        tracing_subscriber::registry().with(tracing_subscriber::layer::Identity::new()),
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut events = EventHandler::new(TICK_RATE);
    let mut app = App::new(client, state, events.sender());
    let res = app.run(&mut terminal, &mut events).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map(|exit| (exit, app.state))
}
