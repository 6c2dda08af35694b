//! TUI entry point and event loop.

use std::io;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::info;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::net::{self, ApiEvent};
use crate::tui::app::App;

/// Initialise the terminal, run the interface until the user quits, and
/// restore the terminal even when the loop fails.
pub async fn run_tui(client: ApiClient, config: &ClientConfig) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(base_url = client.base_url(), "tui starting");
    let result = run_app(&mut terminal, &client, config).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("tui exiting");
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    client: &ApiClient,
    config: &ClientConfig,
) -> io::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<ApiEvent>();
    let mut app = App::new(&config.timestamp_format);
    net::dispatch(client, app.start(), &tx);

    loop {
        terminal.draw(|frame| app.render(frame))?;

        while let Ok(event) = rx.try_recv() {
            if let Some(request) = app.apply_event(event) {
                net::dispatch(client, request, &tx);
            }
        }

        if event::poll(config.poll_timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(request) = app.handle_key(key.code, key.modifiers) {
                    net::dispatch(client, request, &tx);
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
