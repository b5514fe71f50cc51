//! TouchMouse relay entry point.
//!
//! Reads touch events, turns them into clicks and pointer moves, and sends
//! each one as a small text datagram to a remote listener.
//!
//! # Usage
//!
//! ```text
//! touch-driver | touchmouse --remote 192.168.25.9:2501
//!
//! Options:
//!   --config           <PATH>  Config file [default: platform config dir]
//!   --remote           <ADDR>  Listener host:port
//!   --queue-capacity   <N>     Bounded queue size [default: 256]
//!   --tap-threshold-ms <MS>    Longest press that is still a click [default: 1000]
//!   --velocity-factor  <N>     Drag delta multiplier [default: 4]
//!   --strict-phases            Ignore Move/End without a Begin
//!   --pixels-per-pt    <F>     Input pixel density [default: 1.0]
//!   --log-level        <LVL>   Used when RUST_LOG is unset [default: info]
//!   --print-config             Print the effective config as TOML and exit
//! ```
//!
//! Touch input is read from stdin, one `<begin|move|end|cancel> <x> <y>` line
//! per event.  Every option can also be set through a `TOUCHMOUSE_*`
//! environment variable; command-line values win over the config file.
//!
//! # Architecture overview
//!
//! ```text
//! stdin ─▶ LineTouchSource (OS thread)
//!            │  blocking enqueue
//!            ▼
//!          bounded queue
//!            │
//!            ▼
//!          Dispatcher (Tokio task): classify → encode → UDP send
//! ```

use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use touchmouse::application::dispatch::Dispatcher;
use touchmouse::application::{event_queue, shutdown};
use touchmouse::infrastructure::input_source::{spawn_source, LineTouchSource};
use touchmouse::infrastructure::network::UdpTransport;
use touchmouse::infrastructure::storage::config::{self, RelayConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Relays touch gestures to a remote pointer listener over UDP.
#[derive(Debug, Parser)]
#[command(
    name = "touchmouse",
    about = "Relays touch gestures to a remote pointer listener over UDP",
    version
)]
struct Cli {
    /// Path to a TOML config file.
    ///
    /// Without it the platform config directory is searched, and a missing
    /// file means defaults.
    #[arg(long, env = "TOUCHMOUSE_CONFIG")]
    config: Option<PathBuf>,

    /// Listener address as `host:port`.
    #[arg(long, env = "TOUCHMOUSE_REMOTE")]
    remote: Option<String>,

    #[arg(long, env = "TOUCHMOUSE_QUEUE_CAPACITY")]
    queue_capacity: Option<usize>,

    #[arg(long, env = "TOUCHMOUSE_TAP_THRESHOLD_MS")]
    tap_threshold_ms: Option<u64>,

    #[arg(long, env = "TOUCHMOUSE_VELOCITY_FACTOR")]
    velocity_factor: Option<i32>,

    /// Ignore Move and End samples that arrive without a preceding Begin.
    #[arg(long, env = "TOUCHMOUSE_STRICT_PHASES")]
    strict_phases: bool,

    /// Physical pixels per logical point of the touch surface.
    #[arg(long, env = "TOUCHMOUSE_PIXELS_PER_PT")]
    pixels_per_pt: Option<f32>,

    /// `tracing` filter used when `RUST_LOG` is not set.
    #[arg(long, env = "TOUCHMOUSE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    /// Loads the config file and applies command-line overrides on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    fn load_config(&self) -> anyhow::Result<RelayConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::load_config_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => config::load_config().context("failed to load config")?,
        };
        self.apply_overrides(&mut cfg);
        Ok(cfg)
    }

    fn apply_overrides(&self, cfg: &mut RelayConfig) {
        if let Some(remote) = &self.remote {
            cfg.relay.remote_address = Some(remote.clone());
        }
        if let Some(level) = &self.log_level {
            cfg.relay.log_level = level.clone();
        }
        if let Some(capacity) = self.queue_capacity {
            cfg.queue.capacity = capacity;
        }
        if let Some(ms) = self.tap_threshold_ms {
            cfg.gesture.tap_threshold_ms = ms;
        }
        if let Some(factor) = self.velocity_factor {
            cfg.gesture.velocity_factor = factor;
        }
        if self.strict_phases {
            cfg.gesture.strict_phases = true;
        }
        if let Some(ppp) = self.pixels_per_pt {
            cfg.input.pixels_per_pt = ppp;
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// 1. Parse the CLI and load the config (file, then flags).
/// 2. Initialise `tracing`; `RUST_LOG` wins over the configured level.
/// 3. Validate the config and connect the UDP transport.  Any failure here
///    is fatal and happens before a single touch is read.
/// 4. Start the dispatcher task and the stdin input thread.
/// 5. Run until Ctrl+C or until stdin ends and the queue drains.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = cli.load_config()?;

    if cli.print_config {
        print!("{}", cfg.to_toml()?);
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.relay.log_level)),
        )
        .init();

    cfg.validate().context("invalid configuration")?;
    let remote = cfg.remote_address()?;
    info!("touchmouse starting, remote={remote}");

    let transport = UdpTransport::connect(remote)
        .await
        .with_context(|| format!("failed to set up UDP transport to {remote}"))?;

    // ── Pipeline ──────────────────────────────────────────────────────────────
    let (producer, consumer) = event_queue::bounded(cfg.queue.capacity);
    let (trigger, listener) = shutdown::channel();

    let dispatcher = Dispatcher::new(cfg.gesture_config(), Box::new(transport));
    let mut dispatch_task = tokio::spawn(dispatcher.run(consumer, listener));

    let source = LineTouchSource::new(BufReader::new(io::stdin()), cfg.input.pixels_per_pt);
    // The input thread is left detached: it may be blocked on stdin when the
    // process exits.
    let _input = spawn_source(source, producer).context("failed to start touch input")?;

    let stats = tokio::select! {
        finished = &mut dispatch_task => finished.context("dispatcher task failed")?,
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("received Ctrl+C; shutting down"),
                Err(e) => error!("failed to listen for Ctrl+C signal: {e}; shutting down"),
            }
            trigger.trigger();
            dispatch_task.await.context("dispatcher task failed")?
        }
    };

    info!(
        samples = stats.samples,
        clicks = stats.clicks,
        moves = stats.moves,
        silent = stats.silent,
        send_failures = stats.send_failures,
        "touchmouse stopped"
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cli_without_flags_overrides_nothing() {
        // Arrange
        let cli = Cli::parse_from(["touchmouse"]);
        let mut cfg = RelayConfig::default();

        // Act
        cli.apply_overrides(&mut cfg);

        // Assert
        assert_eq!(cfg, RelayConfig::default());
        assert!(!cli.print_config);
    }

    #[test]
    fn test_cli_flags_override_file_values() {
        // Arrange
        let cli = Cli::parse_from([
            "touchmouse",
            "--remote",
            "10.1.1.1:2501",
            "--queue-capacity",
            "8",
            "--tap-threshold-ms",
            "300",
            "--velocity-factor",
            "2",
            "--strict-phases",
            "--pixels-per-pt",
            "3",
            "--log-level",
            "debug",
        ]);
        let mut cfg = RelayConfig::default();
        cfg.relay.remote_address = Some("file-host:1".to_string());

        // Act
        cli.apply_overrides(&mut cfg);

        // Assert
        assert_eq!(cfg.remote_address().unwrap(), "10.1.1.1:2501");
        assert_eq!(cfg.queue.capacity, 8);
        assert_eq!(cfg.relay.log_level, "debug");
        assert_eq!(cfg.input.pixels_per_pt, 3.0);
        let gesture = cfg.gesture_config();
        assert_eq!(gesture.tap_threshold, Duration::from_millis(300));
        assert_eq!(gesture.velocity_factor, 2);
        assert!(gesture.strict_phases);
    }

    #[test]
    fn test_cli_keeps_file_remote_when_flag_absent() {
        let cli = Cli::parse_from(["touchmouse", "--velocity-factor", "5"]);
        let mut cfg = RelayConfig::default();
        cfg.relay.remote_address = Some("file-host:2501".to_string());

        cli.apply_overrides(&mut cfg);

        assert_eq!(cfg.remote_address().unwrap(), "file-host:2501");
        assert_eq!(cfg.gesture.velocity_factor, 5);
    }

    #[test]
    fn test_cli_config_path_is_parsed() {
        let cli = Cli::parse_from(["touchmouse", "--config", "/tmp/relay.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/relay.toml")));
    }

    #[test]
    fn test_cli_rejects_non_numeric_capacity() {
        let result = Cli::try_parse_from(["touchmouse", "--queue-capacity", "lots"]);
        assert!(result.is_err());
    }
}
