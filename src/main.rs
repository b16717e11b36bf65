//! chordano - A virtual piano keyboard in the terminal.
//!
//! Shows every keyboard on the stage from above. Clicking a key presses it
//! until the mouse button is lifted; a hand controller hovering over the
//! stage can be moved around and its trigger pulled to press the key below.
//!
//! # Usage
//!
//! ```bash
//! cargo run                            # Default stage: 88 keys plus a 52-key manual
//! cargo run -- --config stage.json     # Keyboards from a config file
//! cargo run -- --write-config stage.json
//! ```

use chordano::app::CONTROLLER_STEP;
use chordano::{ui, App, StageConfig, ToneEngine};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fs::File;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Command-line options for the application.
struct CliOptions {
    /// Stage config to load instead of the default stage.
    config: Option<PathBuf>,
    /// Write the default stage config here and exit.
    write_config: Option<PathBuf>,
    /// Run without opening an audio device.
    mute: bool,
    /// Send logs to this file instead of stderr.
    log: Option<PathBuf>,
}

impl CliOptions {
    /// Parses command-line arguments.
    ///
    /// Supports:
    /// - `--config <path>` or `-c <path>`: Load keyboards from a JSON file
    /// - `--write-config <path>`: Write the default config and exit
    /// - `--mute` or `-m`: Do not open an audio device
    /// - `--log <path>`: Log to a file
    /// - `--help` or `-h`: Print help and exit
    fn parse() -> Result<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut options = Self {
            config: None,
            write_config: None,
            mute: false,
            log: None,
        };
        let mut i = 1;

        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => options.config = Some(path_argument(&args, &mut i)?),
                "--write-config" => options.write_config = Some(path_argument(&args, &mut i)?),
                "--log" => options.log = Some(path_argument(&args, &mut i)?),
                "--mute" | "-m" => options.mute = true,
                "--help" | "-h" => {
                    eprintln!("chordano - Virtual piano keyboard");
                    eprintln!();
                    eprintln!(
                        "Usage: {} [OPTIONS]",
                        args.first().map(String::as_str).unwrap_or("chordano")
                    );
                    eprintln!();
                    eprintln!("Options:");
                    eprintln!("  -c, --config PATH       Load keyboards from a JSON stage config");
                    eprintln!("      --write-config PATH Write the default stage config and exit");
                    eprintln!("  -m, --mute              Run without audio output");
                    eprintln!("      --log PATH          Write logs to a file (filter with RUST_LOG)");
                    eprintln!("  -h, --help              Print this help message");
                    std::process::exit(0);
                }
                other => {
                    anyhow::bail!("Unknown option: {} (use --help for usage)", other);
                }
            }
            i += 1;
        }

        Ok(options)
    }
}

/// Consumes the value following the option at `args[*i]`.
fn path_argument(args: &[String], i: &mut usize) -> Result<PathBuf> {
    let option = &args[*i];
    *i += 1;
    args.get(*i)
        .map(PathBuf::from)
        .with_context(|| format!("{} requires a path argument", option))
}

/// Installs the tracing subscriber.
///
/// Logs go to stderr unless a log file was given. Without `RUST_LOG` only
/// errors are shown on stderr; a log file records `info` and above.
fn init_logging(log: Option<&PathBuf>) -> Result<()> {
    let (writer, default_level) = match log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), "info")
        }
        None => (BoxMakeWriter::new(io::stderr), "error"),
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(log.is_none())
        .init();
    Ok(())
}

/// Main entry point.
fn main() -> Result<()> {
    // Parse CLI options first (before any terminal setup)
    let cli = CliOptions::parse()?;
    init_logging(cli.log.as_ref())?;

    if let Some(path) = &cli.write_config {
        StageConfig::default()
            .save_to_file(path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        eprintln!("Wrote default stage config to {}", path.display());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => StageConfig::load_from_file(path)
            .inspect_err(|e| tracing::error!("Config {} rejected: {}", path.display(), e))
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => StageConfig::default(),
    };

    let audio = if cli.mute {
        ToneEngine::muted()
    } else {
        ToneEngine::new().unwrap_or_else(|e| {
            tracing::warn!("No audio output, continuing muted: {}", e);
            ToneEngine::muted()
        })
    };
    let muted = audio.is_muted();

    let mut app = App::new(&config, audio).context("Failed to build keyboards")?;
    if muted {
        app.set_status("Audio muted");
    }
    tracing::info!("Stage ready with {} keyboards", app.stage().keyboards().len());

    let mut terminal = setup_terminal().context("Failed to setup terminal")?;
    let result = run_app(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;

    if let Err(e) = &result {
        tracing::error!("Application error: {:?}", e);
    }
    result
}

/// Sets up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main application loop.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<ToneEngine>,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let now = Instant::now();
        app.tick(now.duration_since(last_tick));
        last_tick = now;

        terminal.draw(|frame| ui::render(frame, app))?;

        // Short timeout keeps key tilts animating between events
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press && handle_key(app, key.code, key.modifiers)
                    {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                _ => {}
            }
        }
    }

    app.release_all();
    Ok(())
}

/// Handles mouse events.
fn handle_mouse(app: &mut App<ToneEngine>, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some((x, y)) = ui::cell_to_ndc(app.stage_area, mouse.column, mouse.row) {
                app.pointer_down(x, y);
            }
        }
        // Released anywhere, even outside the stage
        MouseEventKind::Up(MouseButton::Left) => app.pointer_up(),
        _ => {}
    }
}

/// Handles key events. Returns true if the app should quit.
fn handle_key(app: &mut App<ToneEngine>, code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Left => app.nudge_controller(-CONTROLLER_STEP, 0.0),
        KeyCode::Right => app.nudge_controller(CONTROLLER_STEP, 0.0),
        KeyCode::Up => app.nudge_controller(0.0, -CONTROLLER_STEP),
        KeyCode::Down => app.nudge_controller(0.0, CONTROLLER_STEP),
        KeyCode::Char(' ') => app.toggle_controller_trigger(),
        KeyCode::Char('r') => {
            app.release_all();
            app.set_status("Released all keys");
        }
        _ => {}
    }
    false
}
