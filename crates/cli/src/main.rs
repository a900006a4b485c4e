//! Memory-to-stream width converter CLI.
//!
//! This binary drives the converter model from the command line. It performs:
//! 1. **Run:** Fill a source store with a counting pattern, stream one transfer, verify the payload.
//! 2. **Check:** Validate a configuration file and print the derived geometry.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

use memstream_core::config::Config;
use memstream_core::sim::{ReadyPattern, Simulator};
use memstream_core::source::MemoryStore;

#[derive(Parser, Debug)]
#[command(
    name = "memstream",
    author,
    version,
    about = "Cycle-accurate memory-to-stream width converter",
    long_about = "Stream a transfer through the converter model, or validate a configuration.\n\nExamples:\n  memstream run --bytes 16\n  memstream run --bytes 6 --src-width 32 --dst-width 8 --ready every:2 --trace\n  memstream check --config converter.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Stream one transfer and print the beats.
    Run {
        /// Bytes to transfer.
        #[arg(short, long)]
        bytes: u64,

        /// JSON configuration file (defaults are used when omitted).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Source word width in bits (overrides the configuration).
        #[arg(long)]
        src_width: Option<u32>,

        /// Output word width in bits (overrides the configuration).
        #[arg(long)]
        dst_width: Option<u32>,

        /// Decouple buffer depth (overrides the configuration).
        #[arg(long)]
        depth: Option<usize>,

        /// Consumer ready pattern: always, never, every:N, stall:AFTER:CYCLES, script:0101.
        #[arg(long, default_value = "always")]
        ready: String,

        /// Print every cycle.
        #[arg(long)]
        trace: bool,

        /// Print a JSON summary instead of the report.
        #[arg(long)]
        json: bool,
    },

    /// Validate a configuration file.
    Check {
        /// JSON configuration file.
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            bytes,
            config,
            src_width,
            dst_width,
            depth,
            ready,
            trace,
            json,
        } => {
            let mut cfg = load_config(config.as_deref());
            if let Some(bits) = src_width {
                cfg.datapath.src_width_bits = bits;
            }
            if let Some(bits) = dst_width {
                cfg.datapath.dst_width_bits = bits;
            }
            if let Some(d) = depth {
                cfg.datapath.buffer_depth = d;
            }
            cfg.general.trace_transfers |= trace;
            cmd_run(&cfg, bytes, &ready, json);
        }
        Commands::Check { config } => cmd_check(&config),
    }
}

/// Loads the configuration file, or the defaults when none is given. Exits on error.
fn load_config(path: Option<&Path>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    match Config::from_file(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error: {}: {e}", path.display());
            process::exit(1);
        }
    }
}

/// Streams one transfer of `bytes` and reports beats, verification, and statistics.
fn cmd_run(config: &Config, bytes: u64, ready: &str, json: bool) {
    let pattern: ReadyPattern = match ready.parse() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    };

    let geometry = match config.validate() {
        Ok(g) => g,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    if bytes > geometry.max_burst_len() {
        eprintln!(
            "error: {bytes} bytes exceeds the maximum burst of {}",
            geometry.max_burst_len()
        );
        process::exit(1);
    }

    let src_bytes = geometry.src_bytes();
    let image_len = usize::try_from(bytes).unwrap_or(usize::MAX).saturating_add(src_bytes);
    let store = MemoryStore::counting(image_len, src_bytes);
    let expected: Vec<u8> = store.image().iter().copied().take(image_len - src_bytes).collect();

    let mut sim = match Simulator::new(config, Box::new(store)) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    info!(strategy = %geometry.strategy(), bytes, ready, "starting transfer");
    let outcome = match sim.run_transfer(bytes, &pattern) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            if config.general.trace_transfers {
                for t in sim.history() {
                    eprintln!("{t}");
                }
            }
            sim.stats().print();
            process::exit(1);
        }
    };
    let payload_ok = outcome.payload() == expected;

    if json {
        let summary = serde_json::json!({
            "strategy": sim.geometry().strategy().to_string(),
            "bytes": bytes,
            "beats": outcome.beats.len(),
            "cycles": outcome.cycles,
            "acks": outcome.acks,
            "stall_cycles": outcome.stall_cycles,
            "payload_ok": payload_ok,
            "beat_data": outcome.beats.iter().map(ToString::to_string).collect::<Vec<_>>(),
        });
        println!("{summary:#}");
    } else {
        println!("{}", sim.geometry());
        println!();
        if config.general.trace_transfers {
            for t in sim.history() {
                println!("{t}");
            }
            println!();
        }
        for (i, beat) in outcome.beats.iter().enumerate() {
            println!("beat {i:>4}  {beat}");
        }
        println!(
            "\n[*] {} bytes in {} beats over {} cycles, {} ack(s)",
            bytes,
            outcome.beats.len(),
            outcome.cycles,
            outcome.acks
        );
        println!("[*] payload {}", if payload_ok { "verified" } else { "MISMATCH" });
        sim.stats().print();
    }

    if !payload_ok {
        process::exit(1);
    }
}

/// Validates a configuration file and prints its geometry.
fn cmd_check(path: &Path) {
    let config = load_config(Some(path));
    match config.validate() {
        Ok(geometry) => {
            println!("{}: ok", path.display());
            println!("{geometry}");
        }
        Err(e) => {
            eprintln!("{}: {e}", path.display());
            process::exit(1);
        }
    }
}
