//! Memory game: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  SysfsBoard / SimBoard   FileSequenceLog   LogEventSink      │
//! │  (PinPort)               (SequenceLog)     (EventSink)       │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │  GameService: InputSampler thread · Fsm thread       │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The async runtime only waits for Ctrl-C; the game itself runs on two
//! plain threads.  The interrupt handler is installed before any pin is
//! touched, so an early Ctrl-C still goes through orderly cleanup.
#![deny(unused_must_use)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use memgame::adapters::console;
use memgame::adapters::log_sink::LogEventSink;
use memgame::adapters::sequence_log::FileSequenceLog;
use memgame::adapters::sim::SimBoard;
use memgame::adapters::sysfs::{SysfsBoard, SysfsPwm};
use memgame::app::ports::PinPort;
use memgame::app::service::GameService;
use memgame::config::{GameConfig, Pinout};
use memgame::game::sequence::SequenceGenerator;
use memgame::pins::{SYSFS_GPIO_ROOT, SYSFS_PWM_ROOT};

/// sysfs PWM line for the buzzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PwmLine {
    chip: u32,
    channel: u32,
}

fn parse_pwm_line(s: &str) -> Result<PwmLine, String> {
    let (chip, channel) = s
        .split_once(':')
        .ok_or_else(|| format!("expected <chip>:<channel>, got {s:?}"))?;
    let chip = chip.trim().parse().map_err(|e| format!("chip: {e}"))?;
    let channel = channel.trim().parse().map_err(|e| format!("channel: {e}"))?;
    Ok(PwmLine { chip, channel })
}

/// Simon-says memory game on GPIO LEDs and buttons
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Pinout file: channel name -> { "Led": pin, "Btn": pin, "Sound"?: hz }
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Optional JSON file overriding timing parameters
    #[arg(short, long)]
    tuning: Option<PathBuf>,

    /// Append-only log of every generated sequence
    #[arg(long, default_value = "debug.log")]
    debug_log: PathBuf,

    /// Run on a simulated board; type channel names on stdin to press buttons
    #[arg(long)]
    simulate: bool,

    /// Buzzer on a sysfs PWM line (bare flag means 0:0)
    #[arg(
        long,
        value_name = "CHIP:CHANNEL",
        num_args = 0..=1,
        default_missing_value = "0:0",
        value_parser = parse_pwm_line
    )]
    buzzer_pwm: Option<PwmLine>,

    /// Fixed RNG seed for reproducible sequences
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "MEMGAME_LOG", default_value = "info")]
    log_level: String,
}

// ── Interrupt ─────────────────────────────────────────────────

#[cfg(unix)]
struct Interrupt(tokio::signal::unix::Signal);

#[cfg(unix)]
impl Interrupt {
    /// Registers the SIGINT handler immediately.
    fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        signal(SignalKind::interrupt()).map(Self)
    }

    async fn wait(&mut self) {
        self.0.recv().await;
    }
}

#[cfg(not(unix))]
struct Interrupt;

#[cfg(not(unix))]
impl Interrupt {
    fn install() -> std::io::Result<Self> {
        Ok(Self)
    }

    async fn wait(&mut self) {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Ctrl-C handler failed: {e}");
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .parse_filters(&args.log_level)
        .format_timestamp_millis()
        .init();

    info!("╔══════════════════════════════════════╗");
    info!("║  memgame v{:<27}║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 1. Interrupt handler first ────────────────────────────
    let mut interrupt = Interrupt::install().context("installing Ctrl-C handler")?;

    // ── 2. Configuration ──────────────────────────────────────
    let pinout = Pinout::load(&args.config)
        .with_context(|| format!("loading pinout {}", args.config.display()))?;
    let config = match &args.tuning {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading tuning {}", path.display()))?,
        None => GameConfig::default(),
    };
    config.validate().context("tuning")?;
    info!("{} channels from {}", pinout.channels().len(), args.config.display());
    if !pinout.has_tones() {
        info!("no channel configures Sound; tones disabled");
    }

    // ── 3. Adapters ───────────────────────────────────────────
    let sequence_log = Arc::new(
        FileSequenceLog::open(&args.debug_log)
            .with_context(|| format!("opening {}", args.debug_log.display()))?,
    );
    let events = Arc::new(LogEventSink::new());

    let board: Arc<dyn PinPort> = if args.simulate {
        let sim = Arc::new(match args.buzzer_pwm {
            Some(_) => SimBoard::with_buzzer(),
            None => SimBoard::new(),
        });
        let channels = pinout.channels().to_vec().into();
        let hold = config.sample_interval() * 5;
        let _console = console::spawn(sim.clone(), channels, hold).context("starting console")?;
        sim
    } else {
        let mut sysfs = SysfsBoard::new(SYSFS_GPIO_ROOT);
        if let Some(line) = args.buzzer_pwm {
            match SysfsPwm::open(SYSFS_PWM_ROOT, line.chip, line.channel) {
                Ok(pwm) => sysfs = sysfs.with_buzzer(pwm),
                Err(e) => warn!("{e}; tones disabled"),
            }
        }
        Arc::new(sysfs)
    };

    // ── 4. Game ───────────────────────────────────────────────
    let mut service = GameService::new(pinout, config, board, sequence_log, events);
    if let Some(seed) = args.seed {
        service = service.with_generator(SequenceGenerator::seeded(seed));
    }
    let game = service.start().context("starting game")?;

    interrupt.wait().await;
    info!("interrupt received");
    game.shutdown();
    info!("memgame stopped");
    Ok(())
}
