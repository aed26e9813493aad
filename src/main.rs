use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread;

use anyhow::Context;
use clap::Parser;

use clockface::logging::{init_logging, LoggingConfig};
use clockface::{parse_clock_time, Clock, ClockCommand, ClockConfig, ClockTime};

/// Analog clock with stop/continue, playback rate and manual time controls.
#[derive(Debug, Parser)]
#[command(name = "clockface", version)]
struct Args {
    /// TOML file with appearance overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start time as HH:MM:SS instead of the local time
    #[arg(long, value_parser = parse_time_arg)]
    time: Option<ClockTime>,

    /// Initial playback rate
    #[arg(long)]
    rate: Option<f64>,

    /// Window title
    #[arg(long)]
    title: Option<String>,

    /// Read commands from stdin (stop, continue, rate <x>, set HH:MM:SS)
    #[arg(long)]
    stdin: bool,

    /// Log filter, e.g. "debug" or "clockface=trace"
    #[arg(long)]
    log: Option<String>,
}

fn parse_time_arg(text: &str) -> Result<ClockTime, String> {
    parse_clock_time(text).map_err(|e| e.to_string())
}

fn spawn_stdin_reader(sender: Sender<ClockCommand>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    log::error!("stopped reading stdin: {e}");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<ClockCommand>() {
                Ok(command) => {
                    if sender.send(command).is_err() {
                        break;
                    }
                }
                Err(e) => log::warn!("ignoring stdin line: {e}"),
            }
        }
    });
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    let mut config = match &args.config {
        Some(path) => ClockConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClockConfig::default(),
    };
    if let Some(title) = args.title {
        config.title = title;
    }

    let mut clock = match args.time {
        Some(time) => Clock::starting_at(config, time),
        None => Clock::new(config),
    };
    if let Some(rate) = args.rate {
        clock.apply(ClockCommand::SetRate(rate));
    }

    if args.stdin {
        let (sender, receiver) = mpsc::channel();
        spawn_stdin_reader(sender);
        clock
            .show_with_commands(receiver)
            .context("running clock window")?;
    } else {
        clock.show().context("running clock window")?;
    }
    Ok(())
}
