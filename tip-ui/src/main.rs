use std::io::{self, Cursor, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::oneshot;
use tracing::{debug, info};

use tip_core::detect::system_time_zone;
use tip_core::{CountryTable, EnvTimeZone, TipCalculatorState, detect_country};
use tip_data::CountryLoader;
use tip_ui::app::{self, OutputFormat, Session};
use tip_ui::config::{AppConfig, load_config};
use tip_ui::gallery::{Gallery, Move};
use tip_ui::lemonade::Lemonade;
use tip_ui::{dice, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Tip calculator with per-country tipping customs.
///
/// Without a subcommand an interactive calculator session reads commands
/// from stdin. Type `help` inside the session for the command list.
#[derive(Debug, Parser)]
#[command(name = "tiptime", version)]
struct Cli {
    /// Config file (default: `<config dir>/tiptime/config.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Country table CSV replacing the bundled one.
    #[arg(long, global = true)]
    countries: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `tip_core=trace`. Overrides the config.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Run a calculator session.
    Calc {
        /// Command line to run instead of reading stdin. Repeatable; `;`
        /// also separates commands, e.g. `--keys "4 8 0 0; tip 20"`.
        #[arg(short, long)]
        keys: Vec<String>,

        /// Print each screen as one JSON object per line.
        #[arg(long)]
        json: bool,

        /// Skip time zone based country detection.
        #[arg(long)]
        no_detect: bool,
    },

    /// Tap through the lemonade maker.
    Lemonade {
        #[arg(long, default_value_t = 1)]
        taps: u32,
    },

    /// Step through the art gallery, e.g. `gallery next next prev`.
    Gallery {
        /// `next` or `prev`, applied in order.
        moves: Vec<String>,
    },

    /// Roll a six-sided die.
    Roll {
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Calc {
            keys: Vec::new(),
            json: false,
            no_detect: false,
        }
    }
}

// ─── calculator ──────────────────────────────────────────────────────────────

fn load_countries(
    cli: &Cli,
    config: &AppConfig,
) -> Result<CountryTable> {
    match cli.countries.as_ref().or(config.countries_file.as_ref()) {
        Some(path) => CountryLoader::load_from_path(path)
            .with_context(|| format!("Failed to load countries from: {}", path.display())),
        None => CountryLoader::bundled().context("Bundled country table is invalid"),
    }
}

async fn run_calc(
    cli: &Cli,
    config: &AppConfig,
    keys: &[String],
    format: OutputFormat,
    detect: bool,
) -> Result<()> {
    let countries = load_countries(cli, config)?;
    info!(countries = countries.len(), "country table loaded");

    let system_zone = system_time_zone();
    let mut state = TipCalculatorState::new(config.calculator_settings(), countries.clone());
    state.select_default_country(system_zone.as_deref());
    let mut session = Session::new(state);

    let detection = if detect {
        let (tx, rx) = oneshot::channel();
        let timeout = config.detect_timeout();
        let handle = tokio::spawn(async move {
            let country =
                detect_country(&EnvTimeZone, &countries, system_zone.as_deref(), timeout).await;
            if tx.send(country).is_err() {
                debug!("session ended before detection finished");
            }
        });
        session = session.with_detection(rx);
        Some(handle)
    } else {
        None
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if keys.is_empty() {
        app::run(&mut session, io::stdin().lock(), &mut out, format)?;
    } else {
        // Scripted runs see the detected country from the first command on.
        if let Some(handle) = detection {
            handle.await.context("Country detection task failed")?;
        }
        let script = keys
            .iter()
            .flat_map(|line| line.split(';'))
            .collect::<Vec<_>>()
            .join("\n");
        app::run(&mut session, Cursor::new(script), &mut out, format)?;
    }

    Ok(())
}

// ─── demos ───────────────────────────────────────────────────────────────────

fn run_lemonade<W: Write>(
    out: &mut W,
    taps: u32,
) -> Result<()> {
    let mut lemonade = Lemonade::new();
    writeln!(out, "{}", lemonade.step())?;
    for _ in 0..taps {
        let step = lemonade.tap();
        writeln!(out, "{step}")?;
    }
    Ok(())
}

fn run_gallery<W: Write>(
    out: &mut W,
    moves: &[String],
) -> Result<()> {
    let mut gallery = Gallery::new();
    writeln!(out, "{gallery}")?;
    for label in moves {
        let step = Move::parse(label)
            .with_context(|| format!("Unknown gallery move '{label}' (use next or prev)"))?;
        if gallery.apply(step) {
            writeln!(out, "{gallery}")?;
        } else {
            writeln!(out, "{gallery} (no more artworks that way)")?;
        }
    }
    Ok(())
}

fn run_roll<W: Write>(
    out: &mut W,
    count: u32,
) -> Result<()> {
    for _ in 0..count {
        writeln!(out, "{}", dice::roll())?;
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    logging::init_logging(&config.log_level, cli.log_file.as_deref())?;
    if let Some(level) = &cli.log_level {
        logging::set_log_level(level)?;
    }
    debug!(?config, "configuration");

    match cli.command.clone().unwrap_or_default() {
        Command::Calc {
            keys,
            json,
            no_detect,
        } => {
            let format = if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            };
            run_calc(&cli, &config, &keys, format, !no_detect).await
        }
        Command::Lemonade { taps } => run_lemonade(&mut io::stdout().lock(), taps),
        Command::Gallery { moves } => run_gallery(&mut io::stdout().lock(), &moves),
        Command::Roll { count } => run_roll(&mut io::stdout().lock(), count),
    }
}
