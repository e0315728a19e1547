//! OrderFood TUI - a terminal client for the OrderFood ordering platform.
//!
//! Browse the menu, fill a cart, place orders and review order history
//! from the keyboard. The session survives restarts.

mod app;
mod ui;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use orderfood_core::config::API_URL_ENV;
use orderfood_core::{Config, CredentialStore, Notifier, Route, SessionManager};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file written inside the data directory
const LOG_FILE: &str = "orderfood.log";

/// Environment variables that pre-fill the login form
const EMAIL_ENV: &str = "ORDERFOOD_EMAIL";
const PASSWORD_ENV: &str = "ORDERFOOD_PASSWORD";

/// Terminal client for the OrderFood ordering platform
#[derive(Parser, Debug)]
#[command(name = "orderfood", version, about = "Order food from the terminal")]
struct Cli {
    /// Screen to open on start (/, /cart, /orders, /login, /register)
    #[arg(value_name = "ROUTE", default_value = "/")]
    route: String,

    /// Log in from the command line and exit
    #[arg(long, conflicts_with_all = ["logout", "whoami"])]
    login: bool,

    /// Forget the stored session and exit
    #[arg(long, conflicts_with = "whoami")]
    logout: bool,

    /// Print the stored identity and exit
    #[arg(long)]
    whoami: bool,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the config file
    #[arg(long, env = API_URL_ENV, value_name = "URL")]
    api_url: Option<String>,
}

/// What the command line asked for
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Run { start: Route },
    Login,
    Logout,
    WhoAmI,
}

impl Cli {
    fn action(&self) -> Action {
        if self.login {
            Action::Login
        } else if self.logout {
            Action::Logout
        } else if self.whoami {
            Action::WhoAmI
        } else {
            Action::Run {
                start: Route::from_path(&self.route),
            }
        }
    }
}

/// Initialize the tracing subscriber, logging to a file so the terminal
/// screen stays clean. Keep the returned guard alive until exit.
fn init_tracing(log_dir: &Path) -> Result<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    std::fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Ok(guard)
}

/// Everything the app is built from, resolved from config and environment
struct Setup {
    config: Config,
    config_path: Option<PathBuf>,
    data_dir: PathBuf,
    api_url: Option<String>,
}

impl Setup {
    fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli.config.clone().or_else(|| Config::config_path().ok());
        let config = match config_path {
            Some(ref path) => Config::load_from(path)?,
            None => Config::default(),
        };
        let data_dir = config
            .data_dir()
            .unwrap_or_else(|_| PathBuf::from("./.orderfood"));
        Ok(Self {
            config,
            config_path,
            data_dir,
            api_url: cli.api_url.clone(),
        })
    }

    fn credential_store(&self) -> CredentialStore {
        CredentialStore::open(self.config.credential_backend, &self.data_dir)
    }

    fn session_manager(&self) -> Result<SessionManager> {
        // Notifications have no screen outside the TUI
        let (notifier, _) = Notifier::channel();
        SessionManager::new(&self.api_settings(), self.credential_store(), notifier)
    }

    fn api_settings(&self) -> orderfood_core::api::ApiSettings {
        self.config.api_settings(self.api_url.clone())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let setup = Setup::load(&cli)?;
    let _log_guard = match init_tracing(&setup.data_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {:#}", e);
            None
        }
    };

    match cli.action() {
        Action::Login => cli_login(setup).await,
        Action::Logout => cli_logout(&setup),
        Action::WhoAmI => cli_whoami(&setup),
        Action::Run { start } => run_tui(setup, start).await,
    }
}

// ============================================================================
// Command-line actions
// ============================================================================

async fn cli_login(mut setup: Setup) -> Result<()> {
    let default_email = setup.config.last_email.clone().unwrap_or_default();
    if default_email.is_empty() {
        print!("Email: ");
    } else {
        print!("Email [{}]: ", default_email);
    }
    io::stdout().flush()?;

    let mut email = String::new();
    io::stdin().lock().read_line(&mut email)?;
    let email = match email.trim() {
        "" => default_email,
        typed => typed.to_string(),
    };
    if email.is_empty() {
        bail!("Email and password required");
    }

    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        bail!("Email and password required");
    }

    let sessions = setup.session_manager()?;
    sessions.restore();
    match sessions.login(&email, &password).await {
        Ok(user) => {
            println!("Logged in as {}", user.email);
            setup.config.last_email = Some(user.email);
            if let Some(ref path) = setup.config_path {
                if let Err(e) = setup.config.save_to(path) {
                    warn!(error = %e, "Failed to save config");
                }
            }
            Ok(())
        }
        Err(e) => bail!(e.user_message("Login failed. Please try again.")),
    }
}

fn cli_logout(setup: &Setup) -> Result<()> {
    let sessions = setup.session_manager()?;
    sessions.restore();
    sessions.logout();
    println!("Logged out.");
    Ok(())
}

fn cli_whoami(setup: &Setup) -> Result<()> {
    match setup.credential_store().get()? {
        Some(credential) => println!("{} ({})", credential.user.email, credential.user.id),
        None => println!("Not logged in."),
    }
    Ok(())
}

// ============================================================================
// Terminal UI
// ============================================================================

async fn run_tui(setup: Setup, start: Route) -> Result<()> {
    info!("OrderFood TUI starting");

    let store = setup.credential_store();
    let settings = setup.api_settings();
    let mut app = App::new(setup.config, store, &settings, start)?;
    if let Some(path) = setup.config_path {
        app = app.with_config_path(path);
    }
    app.prefill_login(std::env::var(EMAIL_ENV).ok(), std::env::var(PASSWORD_ENV).ok());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // First frame shows the resolving state, then read the stored session
    let result = match terminal.draw(|f| render(f, &app)) {
        Ok(_) => {
            app.restore_session();
            run_app(&mut terminal, &mut app)
        }
        Err(e) => Err(e.into()),
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("OrderFood TUI shutting down");
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
