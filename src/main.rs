//! readme-flip: a paged README viewer for the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐ resolve() ┌───────────┐  LoadMsg   ┌──────────┐  draw()  ┌──────────┐
//! │ pager.rs  │ ────────► │ loader.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (index)   │           │ (tokio)   │ (channel)  │ (state)  │          │ (render) │
//! └───────────┘           └───────────┘            └──────────┘          └──────────┘
//!                                                       ▲
//!                                                       │ Dispatcher<App>
//!                                                  ┌──────────┐
//!                                                  │ input.rs │
//!                                                  └──────────┘
//! ```
//!
//! * **`resolver`**: pure URL resolution from template / base / index.
//! * **`pager`**: owns the `ReadmeSource` and flips pages.
//! * **`source/`**: the `DocumentSource` trait with HTTP and file sources.
//! * **`loader`**: runs one fetch at a time, superseding stale ones.
//! * **`render`**: markdown to styled terminal text or HTML.
//! * **`event`** / **`widget/`**: typed UI events, dropdown and sidebar.
//! * **`app`**: owns all application state.
//! * **`ui`**: pure rendering: reads `App` state and draws widgets.
//! * **`input`**: maps terminal events to `UiEvent`s and dispatches them.
//! * **`config`**: TOML file plus CLI overrides.
//! * **`main`**: wires everything together: parse args, set up logging and
//!   the terminal, then run the event loop.

mod app;
mod config;
mod event;
mod input;
mod loader;
mod pager;
mod render;
mod resolver;
mod source;
mod ui;
mod widget;

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self as term_event, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use config::{Config, LoadOptions, Overrides};
use loader::Loader;
use pager::Pager;
use source::SchemeRouter;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// URL template; `{i}` or `{index}` is replaced by the page index
    #[arg(long, value_name = "TEMPLATE")]
    url: Option<String>,

    /// Base URL used when no template is given
    #[arg(long, value_name = "URL")]
    baseurl: Option<String>,

    /// Starting page index; omit to disable paging
    #[arg(short, long)]
    index: Option<String>,

    /// Base for relative document locations
    #[arg(long, value_name = "URL")]
    origin: Option<String>,

    /// Config file (defaults to ./readme-flip.toml when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Refuse to fall back to the built-in README URL
    #[arg(long)]
    strict: bool,

    /// Fetch once and print the document as HTML instead of opening the viewer
    #[arg(long)]
    print: bool,

    /// With --print, write the markdown source instead of HTML
    #[arg(long, requires = "print")]
    raw: bool,

    /// Write logs to this file while the viewer is open
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode, alternate-screen and mouse-capture lifetime via
/// [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Set up `env_logger`.  `RUST_LOG` wins over the configured level.
///
/// In viewer mode logs go to the configured file only; stderr would draw
/// over the alternate screen.
fn init_logging(config: &Config, to_stderr: bool) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(config.log.level).parse_default_env();

    match (&config.log.file, to_stderr) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        (None, true) => {
            builder.target(env_logger::Target::Stderr);
        }
        (None, false) => return Ok(()),
    }

    builder
        .try_init()
        .context("logger already initialised")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();

    // -- configuration -------------------------------------------------------
    let config = Config::load(LoadOptions {
        config_path: cli.config,
        working_dir: None,
        overrides: Overrides {
            url: cli.url,
            baseurl: cli.baseurl,
            index: cli.index,
            origin: cli.origin,
            strict: cli.strict,
            log_file: cli.log_file,
        },
    })?;

    init_logging(&config, cli.print)?;
    if let Some(path) = &config.file {
        info!("using config {}", path.display());
    }

    let (mut loader, rx) = Loader::new(Arc::new(SchemeRouter::new()), config.origin.clone())?;
    let pager = Pager::new(config.source.clone());

    if cli.print {
        return print_once(&loader, &pager, cli.raw);
    }

    install_panic_hook();

    // -- terminal setup (Drop restores on exit or panic) ---------------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(pager, config.sidebar);
    let dispatcher = input::dispatcher();
    app.request_load();

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Hand any pending load request to the loader.
    //   2. Drain load results, dropping superseded ones.
    //   3. Render the UI.
    //   4. Poll for terminal input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        if let Some(url) = app.take_load_request() {
            loader.load(&url);
        }

        while let Ok(msg) = rx.try_recv() {
            if loader.is_current(&msg) {
                app.apply_load(msg);
            } else {
                debug!("dropping result of superseded load {}", msg.generation());
            }
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if term_event::poll(tick_rate)? {
            input::handle_event(&mut app, &dispatcher, term_event::read()?);
        }

        if app.quit {
            break;
        }
    }

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}

/// `--print`: one fetch, output to stdout, failure message on error.
fn print_once(loader: &Loader, pager: &Pager, raw: bool) -> Result<()> {
    let url = pager.load_url();
    let document = loader
        .fetch_now(&url)
        .map_err(|e| anyhow::anyhow!("Failed to load README: {e}"))?;

    let output = if raw {
        document.body
    } else {
        render::to_html(&document.body)
    };

    let mut stdout = io::stdout().lock();
    match stdout.write_all(output.as_bytes()) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other.context("failed to write document"),
    }
}
