use std::io::Read;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hydro::health::HealthReport;
use hydro::models::{parse_date, AgronomistInsight, ClimateRecord, EToResult};
use hydro::pipeline::HydroAnalysis;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hydro", about = "Daily ETo estimation and irrigation advisory")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/hydro.toml", global = true)]
    config: String,

    /// Pretty-print the output JSON
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve one day of climate data
    Climate {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
    },
    /// Resolve an inclusive date window with one archive request
    Range {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// Compute ETo from ClimateRecord JSON
    Eto {
        /// Read JSON from a file instead of stdin
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Generate an insight from EToResult JSON
    Advise {
        /// Read JSON from a file instead of stdin
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Window, ETo and trend for one location and day
    Analyze {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long)]
        date: String,
        /// Also generate an insight for the target day
        #[arg(long)]
        advise: bool,
    },
    /// Report readiness
    Health,
}

#[derive(Serialize)]
struct AnalyzeOutput {
    #[serde(flatten)]
    analysis: HydroAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    insight: Option<AgronomistInsight>,
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read input: {path}"))
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{output}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let started = Instant::now();

    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let config = hydro::load_config(&cli.config)?;
    let credential = hydro::read_credential(&config.advisor.api_key_env);
    let pipeline = hydro::build_pipeline(&config, credential);

    match cli.command {
        Command::Climate { lat, lon, date } => {
            let date = parse_date(&date)?;
            let record = pipeline.climate(lat, lon, date).await?;
            emit(&record, cli.pretty)
        }
        Command::Range {
            lat,
            lon,
            start,
            end,
        } => {
            let records = pipeline
                .range(lat, lon, parse_date(&start)?, parse_date(&end)?)
                .await?;
            emit(&records, cli.pretty)
        }
        Command::Eto { input } => {
            let raw = read_input(input.as_deref())?;
            let record: ClimateRecord =
                serde_json::from_str(&raw).context("Failed to parse ClimateRecord JSON")?;
            let result = hydro::science::compute_eto(&record)?;
            emit(&result, cli.pretty)
        }
        Command::Advise { input } => {
            let raw = read_input(input.as_deref())?;
            let eto: EToResult =
                serde_json::from_str(&raw).context("Failed to parse EToResult JSON")?;
            emit(&pipeline.advise(&eto).await, cli.pretty)
        }
        Command::Analyze {
            lat,
            lon,
            date,
            advise,
        } => {
            let date = parse_date(&date)?;
            let analysis = pipeline.analyze(lat, lon, date).await?;
            let insight = match (&analysis.eto, advise) {
                (Some(eto), true) => Some(pipeline.advise(eto).await),
                _ => None,
            };
            emit(&AnalyzeOutput { analysis, insight }, cli.pretty)
        }
        Command::Health => emit(&HealthReport::probe(started, &config), cli.pretty),
    }
}
