// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame, Terminal,
};
use tracing::info;

mod app;
mod config;
mod dashboard;
mod data;
mod events;
mod poller;
mod source;
mod ui;

use app::App;
use config::{Overrides, Settings};
use dashboard::Dashboard;
use data::FlagPolicy;
use ui::{Theme, ThemeMode};

// Minimum terminal size for usable display
const MIN_WIDTH: u16 = 60;
const MIN_HEIGHT: u16 = 14;

#[derive(Parser, Debug)]
#[command(name = "anomaly-dash")]
#[command(about = "Live terminal dashboard for sensor readings and backend anomaly flags")]
struct Args {
    /// Backend base URL [default: http://localhost:5000]
    #[arg(short, long)]
    url: Option<String>,

    /// Refresh interval in milliseconds [default: 1000]
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// Per-request timeout in milliseconds [default: 5000]
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// What to do when there are fewer anomaly flags than data points
    /// (clamp: treat as normal, strict: keep the previous series) [default: clamp]
    #[arg(long)]
    flag_policy: Option<FlagPolicy>,

    /// Color theme: auto, light or dark [default: auto]
    #[arg(long)]
    theme: Option<ThemeMode>,

    /// Config file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write diagnostics [default: anomaly-dash.log]
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.url.clone(),
            interval_ms: self.interval_ms,
            timeout_ms: self.timeout_ms,
            flag_policy: self.flag_policy,
            theme: self.theme,
            log_file: self.log_file.clone(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref(), args.overrides())
        .context("failed to load configuration")?;
    init_logging(&settings)?;

    let backend = settings.backend().context("failed to create HTTP client")?;

    // Polling runs on the runtime; the TUI stays on the main thread
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    info!(
        backend = backend.base_url(),
        interval_ms = settings.interval_ms,
        timeout_ms = settings.timeout_ms,
        flag_policy = %settings.flag_policy,
        "starting"
    );

    let theme = Theme::from_mode(settings.theme);
    let dashboard = Dashboard::mount(Arc::new(backend), settings.poll_settings());

    run_tui(App::new(dashboard, theme))
}

/// Send diagnostics to a file; the terminal belongs to the TUI.
fn init_logging(settings: &Settings) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)
        .with_context(|| format!("failed to open log file {}", settings.log_file.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();

    Ok(())
}

/// Run the TUI until the user quits, then tear the dashboard down
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.shutdown();
    info!("stopped");

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| draw(frame, app))?;

        // State arrives from the poller in the background; just redraw on
        // input or every 100ms
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Check for minimum terminal size
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let top = (area.height / 2).saturating_sub(2);
        let centered = Rect::new(0, top, area.width, 5.min(area.height - top));
        frame.render_widget(paragraph, centered);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Length(3), // Summary cards
        Constraint::Min(8),    // Chart
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    ui::common::render_header(frame, app, chunks[0]);
    ui::cards::render(frame, &app.theme, &app.metrics(), chunks[1]);
    ui::chart::render(frame, app, chunks[2]);
    ui::common::render_status_bar(frame, app, chunks[3]);

    // Render help overlay if active
    if app.show_help {
        ui::common::render_help(frame, app, area);
    }
}
