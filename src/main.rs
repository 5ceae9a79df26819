use std::io::{self, Write};
use std::process;

use clap::Parser;
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    style::{Attribute, ResetColor, SetAttribute},
    terminal::{disable_raw_mode, enable_raw_mode, LeaveAlternateScreen},
};
use spark_tree::{
    leaf_count, load_seed, mount, seed_data, to_json, Cli, Config, RenderMode, RootHost,
    TerminalSink, TreeError,
};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = Config::from_cli(cli);
    if let Err(e) = run(&config) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // RUST_LOG wins over -v
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    debug!(%level, "logging initialised");
}

fn run(config: &Config) -> Result<(), TreeError> {
    let seed = match &config.seed {
        Some(path) => load_seed(path)?,
        None => seed_data(),
    };
    info!(?config, leaves = leaf_count(&seed), "starting");
    let root = RootHost::new(seed)?;

    match config.mode {
        RenderMode::Inline => {
            let sink = TerminalSink::new(io::stdout(), RenderMode::Inline);
            let handle = mount(&root, sink, config.viewport());
            root.activate();
            handle.unmount();
        }
        RenderMode::Fullscreen => {
            let guard = RawTerminal::enter()?;
            let sink = TerminalSink::new(io::stdout(), RenderMode::Fullscreen);
            let handle = mount(&root, sink, config.viewport());
            root.activate();
            wait_for_quit()?;
            handle.unmount();
            drop(guard);
        }
    }

    info!(changes = root.change_count(), "done");

    if config.dump {
        let json = serde_json::to_string_pretty(&to_json(&root.entries()))?;
        let mut out = io::stdout().lock();
        writeln!(out, "{json}")?;
    }
    Ok(())
}

/// Block until q, Esc or Ctrl-C.
fn wait_for_quit() -> io::Result<()> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let ctrl_c =
                key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
            if ctrl_c || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                return Ok(());
            }
        }
    }
}

/// Raw mode for the lifetime of the value; restores the screen on drop.
struct RawTerminal;

impl RawTerminal {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            SetAttribute(Attribute::Reset),
            ResetColor,
            Show,
            LeaveAlternateScreen
        );
        let _ = disable_raw_mode();
    }
}
