//! Windward entry point
//!
//! Runs a race or a telemetry replay headlessly, printing status lines.

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};

use windward::datasource::{ParseMode, ReplayNavigationData, TimeRange, parse_timestamp};
use windward::sim::{RaceReplay, SailRace, wind_model};
use windward::{Result, Settings};

/// Ticks between status printouts
const STATUS_INTERVAL: u64 = 100;

#[derive(Debug, Parser)]
#[command(name = "windward", about = "Upwind sailboat racing against a shifting wind")]
struct Cli {
    /// JSON settings file
    #[arg(env = "WINDWARD_CONFIG", short, long, global = true)]
    config: Option<PathBuf>,
    /// Delay between ticks in milliseconds
    #[arg(long, global = true)]
    frame_delay: Option<u64>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sail to the windward mark, tacking on the laylines
    Race {
        /// Recorded wind directions, one per line
        #[arg(long)]
        wind_data: Option<PathBuf>,
        /// Starting wind direction (degrees)
        #[arg(long)]
        wind_direction: Option<f64>,
        /// Oscillation amplitude (degrees)
        #[arg(long)]
        wind_shift_amplitude: Option<f64>,
        /// Baseline drift per tick (degrees)
        #[arg(long)]
        wind_shift_rate: Option<f64>,
        /// Seed for the recorded wind start offset
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Replay recorded navigation telemetry
    Replay {
        /// Telemetry CSV file
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        mark_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        mark_lng: f64,
        /// Skip samples before this RFC3339 time
        #[arg(long, value_parser = parse_timestamp)]
        start: Option<DateTime<FixedOffset>>,
        /// Skip samples after this RFC3339 time
        #[arg(long, value_parser = parse_timestamp)]
        end: Option<DateTime<FixedOffset>>,
        /// Skip malformed rows instead of stopping at the first one
        #[arg(long)]
        lenient: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Cli::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Cli) -> Result<()> {
    let mut settings = Settings::load_or_default(args.config.as_deref())?;
    if let Some(delay) = args.frame_delay {
        settings.frame_delay_ms = delay;
    }

    match args.cmd {
        Command::Race {
            wind_data,
            wind_direction,
            wind_shift_amplitude,
            wind_shift_rate,
            seed,
        } => {
            let wind = &mut settings.wind;
            wind.data_file = wind_data.or(wind.data_file.take());
            wind.direction = wind_direction.unwrap_or(wind.direction);
            wind.amplitude = wind_shift_amplitude.unwrap_or(wind.amplitude);
            wind.shift_rate = wind_shift_rate.unwrap_or(wind.shift_rate);
            wind.seed = seed.or(wind.seed);
            race(&settings)
        }
        Command::Replay {
            csv,
            mark_lat,
            mark_lng,
            start,
            end,
            lenient,
        } => {
            if lenient {
                settings.parse_mode = ParseMode::Lenient;
            }
            let data = ReplayNavigationData::open(&csv, TimeRange::new(start, end), settings.parse_mode)?;
            replay(&settings, mark_lat, mark_lng, &data)
        }
    }
}

fn race(settings: &Settings) -> Result<()> {
    let mut race = SailRace::from_settings(settings, wind_model(&settings.wind)?);
    race.start();

    while !race.is_finished() {
        if race.on_layline() && race.tack_boat() {
            log::info!("Tacked at tick {}", race.time_ticks());
        }
        race.tick();
        if race.time_ticks() % STATUS_INTERVAL == 0 {
            print_lines(&race.status().lines());
        }
        thread::sleep(race.frame_delay());
    }

    print_lines(&race.status().lines());
    Ok(())
}

fn replay(settings: &Settings, mark_lat: f64, mark_lng: f64, data: &ReplayNavigationData) -> Result<()> {
    let mut replay = RaceReplay::from_settings(settings, mark_lat, mark_lng, data)?;
    replay.restart();

    let mut ticks = 0u64;
    while !replay.is_finished() {
        replay.tick();
        ticks += 1;
        if ticks % STATUS_INTERVAL == 0 {
            print_lines(&replay.status().lines());
        }
        thread::sleep(replay.frame_delay());
    }

    print_lines(&replay.status().lines());
    Ok(())
}

fn print_lines(lines: &[String]) {
    println!("{}", lines.join(" | "));
}
