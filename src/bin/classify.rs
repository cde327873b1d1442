//! Command-line classification harness
//!
//! Activates a headless host on a single file, waits for the first
//! classification batch, and prints the resulting decorations.
//!
//! Usage:
//!   classify src/main.js
//!   classify --json --theme light notes/sample.rs
//!   classify --theme light --save-theme demo.ts

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;

use berth::config::ShellConfig;
use berth::syntax::LanguageId;
use berth::{Bootstrap, Container, EditorHost, HostConfig, HostEvent, ResizeBus, SharedEditor};

#[derive(Parser, Debug)]
#[command(name = "classify")]
#[command(about = "Classify a source file and print its decorations")]
struct Args {
    /// File to classify; the file name decides the language
    file: PathBuf,

    /// Theme id to mount with; defaults to the saved shell preference
    #[arg(long)]
    theme: Option<String>,

    /// Persist the chosen theme as the default for later runs
    #[arg(long)]
    save_theme: bool,

    /// Print decorations as pretty JSON instead of one span per line
    #[arg(long)]
    json: bool,

    /// Give up if no batch arrives within this many milliseconds
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,
}

fn main() -> Result<()> {
    berth::tracing::init();
    berth::config_paths::ensure_all_config_dirs();
    let args = Args::parse();

    let code = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let title = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "untitled.js".to_string());
    let language = LanguageId::from_path(&args.file);
    if !language.has_classifier() {
        bail!("no classifier for '{}'", args.file.display());
    }

    let mut prefs = ShellConfig::load();
    let theme = args.theme.unwrap_or_else(|| prefs.theme.clone());
    if args.save_theme {
        prefs.set_theme(&theme).map_err(anyhow::Error::msg)?;
    }

    let mut host = EditorHost::new(SharedEditor::new(), Bootstrap::new(), ResizeBus::new());
    host.activate(
        Container::new(),
        HostConfig {
            theme,
            language,
            title,
            value: Some(code),
            // No reason to sit out the embedding delay on the command line
            initial_highlight_delay: Duration::ZERO,
            ..HostConfig::default()
        },
    )?;

    let deadline = Instant::now() + Duration::from_millis(args.timeout_ms);
    loop {
        host.pump(Instant::now());

        for event in host.take_events() {
            match event {
                HostEvent::DecorationsApplied { version, count } => {
                    tracing::debug!("Batch of {} applied at version {}", count, version);
                    print_decorations(&host, args.json)?;
                    host.deactivate();
                    return Ok(());
                }
                HostEvent::BootstrapFailed(error) => bail!(error),
                _ => {}
            }
        }

        if Instant::now() >= deadline {
            bail!("no classification arrived within {} ms", args.timeout_ms);
        }
        thread::sleep(Duration::from_millis(10));
    }
}

fn print_decorations(host: &EditorHost, json: bool) -> Result<()> {
    let decorations = host.decorations()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&decorations)?);
        return Ok(());
    }

    for decoration in &decorations {
        println!(
            "{}:{}..{}:{}  {}",
            decoration.range.start_line,
            decoration.range.start,
            decoration.range.end_line,
            decoration.range.end,
            decoration.class
        );
    }
    Ok(())
}
