use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::{mpsc, Mutex};

use emusic_rs::api::ApiClient;
use emusic_rs::auth::{self, TokenStore};
use emusic_rs::controller::AppController;
use emusic_rs::logging;
use emusic_rs::model::SessionState;
use emusic_rs::player::{AudioSink, Player, PlayerEvent, RodioSink};
use emusic_rs::view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== e-music client starting ===");

    let api = ApiClient::from_env(TokenStore::new());
    tracing::info!(base_url = %api.base_url(), "Using API server");

    // Console login happens before the TUI takes over the terminal. Both
    // paths can leave us anonymous; gated views prompt later.
    let user = match auth::check_stored_token(&api).await {
        Some(user) => {
            println!("Welcome back, {}!", user.username);
            Some(user)
        }
        None => auth::login_prompt(&api).await?,
    };

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let sink = RodioSink::new(event_tx);
    let player = Arc::new(Mutex::new(Player::new(sink, api.base_url())));

    let mut state = SessionState::new();
    state.user = user;
    let session = Arc::new(Mutex::new(state));

    let controller = AppController::new(session.clone(), player.clone(), api);
    controller.load_home().await;

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, session, player, controller, event_rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("e-music client shutting down");
    Ok(())
}

async fn run_app<S: AudioSink>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: Arc<Mutex<SessionState>>,
    player: Arc<Mutex<Player<S>>>,
    controller: AppController<S>,
    mut player_events: mpsc::UnboundedReceiver<PlayerEvent>,
) -> io::Result<()> {
    loop {
        // Drained streams auto-advance like a manual skip
        while let Ok(event) = player_events.try_recv() {
            controller.handle_player_event(event).await;
        }

        let should_quit = {
            let mut session = session.lock().await;
            session.ui.auto_clear_toast();
            let player = player.lock().await;
            terminal.draw(|f| {
                AppView::render(f, &session, &player);
            })?;
            session.ui.should_quit
        };

        // Short poll keeps the UI responsive to player events and toasts
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                controller.handle_key_event(key).await;
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
