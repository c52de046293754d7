// ============================================================================
// LazyBid - Client TUI du marketplace étudiant
// ============================================================================
// Parcourt et recherche les annonces actives, affiche le détail d'un objet,
// permet d'enchérir et consulte portefeuille et réputation, depuis le terminal
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère événements, résultats et rendering
// 3. Worker thread : les appels API tournent hors de l'UI
// ============================================================================

use std::io;
use std::sync::{mpsc, Arc};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use lazybid::api::ApiClient;
use lazybid::app::{App, InputPurpose};
use lazybid::config::{Cli, Config};
use lazybid::session::Session;
use lazybid::ui::{events::EventHandler, render, Event};
use lazybid::worker::{spawn_worker, AppCommand, AppResult};

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! ne fonctionnent pas une fois le TUI lancé : on log vers
// un fichier avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// tail -f ./logs/lazybid.log
/// RUST_LOG=lazybid=trace cargo run
/// ```
fn init_logging(config: &Config) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(&config.log_dir)
        .context("Échec de la création du répertoire de logs")?;

    let file_appender =
        RollingFileAppender::new(Rotation::DAILY, config.log_dir.clone(), "lazybid.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazybid=debug,info".into()),
        )
        .init();

    info!(log_dir = ?config.log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config();

    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(api_url = %config.api_url, "LazyBid starting up");

    let session = match &config.session_file {
        Some(path) => Session::load(path).unwrap_or_else(|e| {
            warn!(error = ?e, "Failed to load session file, starting anonymous");
            Session::in_memory()
        }),
        None => Session::in_memory(),
    };
    let session = Arc::new(session);

    let client = ApiClient::new(&config, session.clone())?;

    // CONCEPT RUST : mpsc channels
    // - command_tx/rx : l'UI envoie des commandes au worker
    // - result_tx/rx : le worker renvoie les résultats à l'UI
    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    let worker = spawn_worker(Arc::new(client), command_rx, result_tx);

    let mut app = App::new(session);
    let mut commands = app.startup_commands();
    if let Some(item_id) = cli.item_id {
        if app.session().is_authenticated() {
            commands.push(app.open_item(item_id));
        } else {
            warn!(item_id, "Not logged in, ignoring initial item");
        }
    }
    for command in commands {
        send(&command_tx, command);
    }

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &command_tx, &result_rx);

    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    // Fermer le channel de commandes arrête la boucle du worker
    drop(command_tx);
    if worker.join().is_err() {
        error!("Worker thread panicked");
    }

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

fn send(command_tx: &mpsc::Sender<AppCommand>, command: AppCommand) {
    if command_tx.send(command).is_err() {
        error!("Worker thread disconnected, command dropped");
    }
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   1. Appliquer les résultats du worker
//   2. Dessiner l'interface
//   3. Traiter un événement clavier
// App n'est touchée que par ce thread : pas besoin de Mutex
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: &mpsc::Sender<AppCommand>,
    result_rx: &mpsc::Receiver<AppResult>,
) -> Result<()> {
    let mut worker_alive = true;

    while app.is_running() {
        // CONCEPT : Non-blocking receive avec try_recv
        // On vide tout ce qui est arrivé depuis le dernier tour
        loop {
            match result_rx.try_recv() {
                Ok(result) => {
                    for command in app.handle_result(result) {
                        send(command_tx, command);
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    if worker_alive {
                        error!("Worker thread disconnected!");
                        worker_alive = false;
                    }
                    break;
                }
            }
        }

        terminal.draw(|frame| render(frame, app))?;

        match events.next() {
            Ok(event) => handle_event(app, event, command_tx),
            Err(e) => debug!(error = ?e, "Failed to read terminal event"),
        }
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================
// CONCEPT RUST : Pattern matching avec guards
// - La saisie a priorité sur les raccourcis
// - Les raccourcis dépendent de l'écran courant
// ============================================================================

fn handle_event(app: &mut App, event: Event, command_tx: &mpsc::Sender<AppCommand>) {
    use lazybid::ui::events::{
        get_char_from_event, is_backspace_event, is_bid_event, is_down_event, is_enter_event,
        is_escape_event, is_logout_event, is_profile_event, is_quit_event, is_refresh_event,
        is_search_event, is_up_event, is_wallet_event,
    };

    if matches!(event, Event::Tick) {
        return;
    }

    // ========================================
    // Input Mode : la saisie capture toutes les touches
    // ========================================
    if app.is_in_input_mode() {
        if is_escape_event(&event) {
            debug!("User cancelled input");
            // Sur le login, ESC recommence la saisie depuis l'email
            if app.is_on_login() {
                app.start_login();
            } else {
                app.cancel_input();
            }
        } else if is_enter_event(&event) {
            let command = match app.input_purpose {
                Some(InputPurpose::BidAmount) => app.submit_bid_input(),
                Some(InputPurpose::SearchKeyword | InputPurpose::SearchCategory { .. }) => {
                    app.submit_search_input()
                }
                Some(InputPurpose::Email | InputPurpose::Password { .. }) => {
                    app.submit_login_input()
                }
                None => None,
            };
            if let Some(command) = command {
                send(command_tx, command);
            }
        } else if is_backspace_event(&event) {
            app.backspace();
        } else if let Some(c) = get_char_from_event(&event) {
            // 'q' reste un caractère dans un email, sauf ligne vide sur le login
            if is_quit_event(&event) && app.is_on_login() && app.input_buffer.is_empty() {
                handle_quit(app);
            } else {
                app.cancel_quit();
                app.append_char(c);
            }
        }
        return;
    }

    match event {
        Event::Key(_) if is_quit_event(&event) => handle_quit(app),

        // Marketplace
        Event::Key(_) if is_up_event(&event) && app.is_on_marketplace() => {
            app.cancel_quit();
            app.navigate_up();
        }
        Event::Key(_) if is_down_event(&event) && app.is_on_marketplace() => {
            app.cancel_quit();
            app.navigate_down();
        }
        Event::Key(_) if is_enter_event(&event) && app.is_on_marketplace() => {
            app.cancel_quit();
            if let Some(command) = app.open_selected() {
                send(command_tx, command);
            }
        }
        Event::Key(_) if is_refresh_event(&event) && app.is_on_marketplace() => {
            app.cancel_quit();
            info!("User refreshed marketplace");
            let command = app.refresh_marketplace();
            send(command_tx, command);
        }
        Event::Key(_) if is_search_event(&event) && app.is_on_marketplace() => {
            app.cancel_quit();
            app.start_search();
        }
        Event::Key(_) if is_escape_event(&event) && app.is_on_marketplace() => {
            app.cancel_quit();
            if let Some(command) = app.clear_search() {
                info!("User cleared search");
                send(command_tx, command);
            }
        }
        Event::Key(_) if is_wallet_event(&event) && app.is_on_marketplace() => {
            app.cancel_quit();
            let command = app.open_wallet();
            send(command_tx, command);
        }
        Event::Key(_) if is_profile_event(&event) && app.is_on_marketplace() => {
            app.cancel_quit();
            match app.open_own_reputation() {
                Some(command) => send(command_tx, command),
                None => debug!("Identity not resolved, no profile to show"),
            }
        }
        Event::Key(_) if is_logout_event(&event) && app.is_on_marketplace() => {
            app.cancel_quit();
            app.logout();
        }

        // Page détail
        Event::Key(_) if is_escape_event(&event) && app.is_on_item() => {
            app.cancel_quit();
            let command = app.close_item();
            send(command_tx, command);
        }
        Event::Key(_) if is_bid_event(&event) && app.is_on_item() => {
            app.cancel_quit();
            if !app.start_bid_input() {
                debug!("Bid form not available");
            }
        }
        Event::Key(_) if is_refresh_event(&event) && app.is_on_item() => {
            app.cancel_quit();
            if let Some(command) = app.refresh_item() {
                send(command_tx, command);
            }
        }
        Event::Key(_) if is_profile_event(&event) && app.is_on_item() => {
            app.cancel_quit();
            if let Some(command) = app.open_seller_reputation() {
                send(command_tx, command);
            }
        }

        // Portefeuille / réputation
        Event::Key(_) if is_escape_event(&event) && (app.is_on_wallet() || app.is_on_reputation()) => {
            app.cancel_quit();
            app.close_side_screen();
        }
        Event::Key(_) if is_refresh_event(&event) && (app.is_on_wallet() || app.is_on_reputation()) => {
            app.cancel_quit();
            if let Some(command) = app.refresh_side_screen() {
                send(command_tx, command);
            }
        }

        Event::Key(_) => app.cancel_quit(),

        Event::Tick => {}
    }
}

/// Touche 'q' : quit en deux temps pour éviter les quits accidentels
fn handle_quit(app: &mut App) {
    if app.is_awaiting_quit_confirmation() {
        info!("User confirmed quit");
        app.quit();
    } else {
        info!("User requested quit (awaiting confirmation)");
        app.request_quit();
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal (appelé même en cas d'erreur)
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}
