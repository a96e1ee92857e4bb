//! boiler-ctl: drive the steam boiler controller over a message transport.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  JsonLinesTransport (replay)      FramedTransport (serve)    │
//! │                                                              │
//! │  ──────────────── Transport trait boundary ───────────────   │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │          BoilerController (pure logic)                 │  │
//! │  │  Mode table · Safety supervisor · Regulation           │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! One transport exchange per tick; the loop ends when the transport
//! reports that the plant closed the channel.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{debug, info};
use tracing_subscriber::EnvFilter;

use steam_boiler::Error;
use steam_boiler::adapters::replay::JsonLinesTransport;
use steam_boiler::app::ports::Transport;
use steam_boiler::app::service::BoilerController;
use steam_boiler::config::BoilerConfig;
use steam_boiler::error::TransportError;
use steam_boiler::wire::FramedTransport;

#[derive(Parser)]
#[command(name = "boiler-ctl")]
#[command(about = "Steam boiler cyclic mode controller", long_about = None)]
struct Cli {
    /// Boiler characteristics (JSON).  Defaults to the reference boiler.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the controller over JSON-lines batches, one tick per line
    Replay {
        /// Script file; reads stdin when omitted
        #[arg(short, long)]
        script: Option<PathBuf>,
    },
    /// Run the controller over length-prefixed binary frames on stdin/stdout
    Serve,
    /// Validate a configuration file and print the effective values
    CheckConfig {
        /// Path to the configuration JSON file
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Replay { script } => {
            let config = load_config(cli.config.as_deref())?;
            let reader: Box<dyn Read> = match script {
                Some(path) => Box::new(
                    File::open(&path)
                        .with_context(|| format!("opening script {}", path.display()))?,
                ),
                None => Box::new(io::stdin()),
            };
            let mut transport = JsonLinesTransport::new(BufReader::new(reader), io::stdout());
            run(&config, &mut transport)
        }
        Commands::Serve => {
            let config = load_config(cli.config.as_deref())?;
            let mut transport = FramedTransport::new(StdioStream::new());
            run(&config, &mut transport)
        }
        Commands::CheckConfig { path } => cmd_check_config(&path),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // stdout carries the outbound batches; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<BoilerConfig> {
    match path {
        Some(path) => BoilerConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display())),
        None => Ok(BoilerConfig::default()),
    }
}

/// Tick until the plant closes the channel.
fn run(config: &BoilerConfig, transport: &mut impl Transport) -> anyhow::Result<()> {
    let mut controller = BoilerController::new(config).context("building controller")?;

    loop {
        match controller.clock(transport) {
            Ok(()) => info!("{}", controller.status_message()),
            Err(Error::Transport(TransportError::Closed)) => {
                debug!("transport closed");
                break;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("tick {}", controller.tick_count() + 1));
            }
        }
    }

    info!(
        "stopped after {} tick(s) in {}",
        controller.tick_count(),
        controller.mode()
    );
    Ok(())
}

fn cmd_check_config(path: &Path) -> anyhow::Result<()> {
    let config = BoilerConfig::load(path)
        .with_context(|| format!("loading configuration {}", path.display()))?;

    let json = serde_json::to_string_pretty(&config)?;
    println!("{json}");
    eprintln!("✓ {} is valid", path.display());
    Ok(())
}

/// stdin/stdout as one duplex byte stream.
struct StdioStream {
    stdin: io::Stdin,
    stdout: io::Stdout,
}

impl StdioStream {
    fn new() -> Self {
        Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
        }
    }
}

impl Read for StdioStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stdin.read(buf)
    }
}

impl Write for StdioStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}
