use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand};
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use urania::{BirthData, Body, Engine, EngineSettings, GeoLocation, HouseSystem, Instant, PositionProvider};
use urania_config::AppConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Natal charts, transits and synastry")]
struct Cli {
    /// Settings file (otherwise URANIA_CONFIG or configs/urania.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured house system.
    #[arg(long, global = true)]
    house_system: Option<HouseSystem>,

    /// Swiss Ephemeris data directory; uses the Swiss Ephemeris instead of the
    /// built-in series.
    #[cfg(feature = "swisseph")]
    #[arg(long, global = true)]
    ephemeris_path: Option<PathBuf>,

    /// Compact single-line JSON.
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a natal chart.
    Chart {
        #[command(flatten)]
        birth: BirthArgs,

        /// Also list the aspects between the chart's bodies.
        #[arg(long)]
        aspects: bool,
    },
    /// Transits to a natal chart.
    Transits {
        #[command(flatten)]
        birth: BirthArgs,

        /// Transit moment, RFC 3339 (default: now).
        #[arg(long)]
        at: Option<DateTime<chrono::FixedOffset>>,
    },
    /// Compatibility of two people, each given as a BirthData JSON file.
    Synastry {
        first: PathBuf,
        second: PathBuf,
    },
    /// Position of one body at a moment.
    Position {
        body: Body,

        /// RFC 3339 moment (default: now).
        #[arg(long, conflicts_with = "jd")]
        at: Option<DateTime<chrono::FixedOffset>>,

        /// Julian Day (UT).
        #[arg(long)]
        jd: Option<f64>,
    },
}

#[derive(Args, Debug)]
struct BirthArgs {
    /// Birth date, YYYY-MM-DD.
    #[arg(long)]
    date: NaiveDate,

    /// Local birth time, HH:MM[:SS]. Omit when unknown.
    #[arg(long, value_parser = parse_time)]
    time: Option<NaiveTime>,

    /// Latitude in degrees, north positive.
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude in degrees, east positive.
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,

    /// Zone label: a UTC offset such as UTC-4 or +05:30, or an IANA name such
    /// as America/New_York.
    #[arg(long, default_value = "UTC")]
    zone: String,
}

impl BirthArgs {
    fn to_birth(&self) -> BirthData {
        BirthData::new(self.date, self.time, GeoLocation::new(self.lat, self.lon), self.zone.clone())
    }
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|e| format!("invalid time '{s}': {e}"))
}

fn read_birth(path: &Path) -> anyhow::Result<BirthData> {
    let text = fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid birth data in {}", path.display()))
}

fn instant_or_now(at: Option<DateTime<chrono::FixedOffset>>) -> Instant {
    let utc = at.map(|dt| dt.with_timezone(&Utc)).unwrap_or_else(Utc::now);
    Instant::from_utc(utc)
}

/// `RUST_LOG` still wins over this.
fn log_filter(config: &AppConfig) -> String {
    config.log_filter.clone().unwrap_or_else(|| "info".to_string())
}

fn emit<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{json}");
    Ok(())
}

#[cfg(feature = "swisseph")]
fn build_engine(cli: &Cli, settings: EngineSettings) -> anyhow::Result<Engine<Box<dyn PositionProvider>>> {
    if let Some(path) = &cli.ephemeris_path {
        let adapter = urania::ephemeris::SwissEphemerisAdapter::new(Some(path.clone()))?;
        return Ok(Engine::decorated(adapter, settings)?);
    }
    Ok(Engine::analytic(settings)?)
}

#[cfg(not(feature = "swisseph"))]
fn build_engine(_cli: &Cli, settings: EngineSettings) -> anyhow::Result<Engine<Box<dyn PositionProvider>>> {
    Ok(Engine::analytic(settings)?)
}

fn run(cli: &Cli, settings: EngineSettings) -> anyhow::Result<()> {
    let engine = build_engine(cli, settings)?;

    match &cli.command {
        Command::Chart { birth, aspects } => {
            let chart = engine.build_chart(&birth.to_birth())?;
            if *aspects {
                #[derive(Serialize)]
                struct ChartWithAspects<'a> {
                    chart: &'a urania::Chart,
                    aspects: Vec<urania::Aspect>,
                }
                let aspects = engine.natal_aspects(&chart);
                emit(&ChartWithAspects { chart: &chart, aspects }, cli.compact)
            } else {
                emit(&chart, cli.compact)
            }
        }
        Command::Transits { birth, at } => {
            let natal = engine.build_chart(&birth.to_birth())?;
            let report = engine.compute_transits(&natal, instant_or_now(*at))?;
            emit(&report, cli.compact)
        }
        Command::Synastry { first, second } => {
            let a = read_birth(first)?;
            let b = read_birth(second)?;
            let result = engine.synastry_for(&a, &b)?;
            emit(&result, cli.compact)
        }
        Command::Position { body, at, jd } => {
            let instant = match jd {
                Some(jd) => Instant::from_jd(*jd),
                None => instant_or_now(*at),
            };
            let position = engine.position_at(*body, instant)?;
            emit(&position, cli.compact)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = urania_config::read_config(cli.config.as_deref())?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(&config))).init();
    urania_config::log_source(&config);

    let mut settings = config.engine;
    if let Some(system) = cli.house_system {
        debug!("house system {system} from the command line");
        settings.house_system = system;
    }

    run(&cli, settings)
}
