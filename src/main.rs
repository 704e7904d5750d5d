use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};

use health_metrics::chart::legend;
use health_metrics::config::{load_config, AppConfig};
use health_metrics::import::import_csv;
use health_metrics::report::build_report;
use health_metrics::state::{sample_records, FilterPatch, RecordDraft};
use health_metrics::{classify_value, Category, HealthState, Record, ThresholdConfig, Thresholds};

#[derive(Parser)]
#[command(name = "health-metrics")]
#[command(about = "Classify, filter and summarize dated health readings", long_about = None)]
struct Cli {
    /// CSV file with `id,date,value` rows; sample readings are used when omitted
    #[arg(long, global = true)]
    input: Option<PathBuf>,
    /// TOML file with a `[thresholds]` table
    #[arg(long, global = true, env = "HEALTH_METRICS_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, global = true, env = "HEALTH_LOWER_THRESHOLD", allow_negative_numbers = true)]
    lower_threshold: Option<f64>,
    #[arg(long, global = true, env = "HEALTH_LOWER_BOUND", allow_negative_numbers = true)]
    lower_bound: Option<f64>,
    #[arg(long, global = true, env = "HEALTH_UPPER_BOUND", allow_negative_numbers = true)]
    upper_bound: Option<f64>,
    #[arg(long, global = true, env = "HEALTH_UPPER_THRESHOLD", allow_negative_numbers = true)]
    upper_threshold: Option<f64>,
    /// First date to include (YYYY-MM-DD)
    #[arg(long, global = true)]
    start: Option<NaiveDate>,
    /// Last date to include (YYYY-MM-DD)
    #[arg(long, global = true)]
    end: Option<NaiveDate>,
    /// Alert type to show (red, orange, green); repeat for several
    #[arg(long = "alert", global = true)]
    alerts: Vec<Category>,
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List every record with its alert status
    List,
    /// List the records that pass the date and alert filters
    Filter,
    /// Summary statistics over the filtered records
    Stats,
    /// Chart series for the filtered records
    Chart,
    /// Write a markdown report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Validate the effective thresholds
    CheckThresholds,
    /// Add a reading to this session and list the result
    Add {
        #[arg(long)]
        date: String,
        #[arg(long)]
        value: String,
    },
}

impl Cli {
    fn threshold_overrides(&self) -> ThresholdConfig {
        ThresholdConfig {
            lower_threshold: self.lower_threshold,
            lower_bound: self.lower_bound,
            upper_bound: self.upper_bound,
            upper_threshold: self.upper_threshold,
        }
    }

    fn filter_patch(&self) -> FilterPatch {
        FilterPatch {
            start_date: self.start.map(Some),
            end_date: self.end.map(Some),
            alert_types: (!self.alerts.is_empty()).then(|| {
                Category::ALL
                    .iter()
                    .map(|c| (*c, self.alerts.contains(c)))
                    .collect()
            }),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let records = match &cli.input {
        Some(path) => {
            let records = import_csv(path)?;
            info!("Loaded {} records from {}", records.len(), path.display());
            records
        }
        None => sample_records(),
    };

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };

    let mut state = HealthState::with_records(records);
    state.update_thresholds(config.thresholds);
    state.update_thresholds(cli.threshold_overrides());
    state.set_filter(cli.filter_patch());

    let thresholds = state.resolved_thresholds();
    if let Err(err) = thresholds.validate() {
        if !matches!(cli.command, Commands::CheckThresholds) {
            warn!("thresholds are inconsistent ({err}); classifications may look odd");
        }
    }

    match cli.command {
        Commands::List => print_records(&state.records, &thresholds, cli.format)?,
        Commands::Filter => print_records(&state.visible_records(), &thresholds, cli.format)?,
        Commands::Stats => {
            let stats = state.summary();
            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                Format::Text => {
                    println!("Average:  {:.1}", stats.average);
                    println!("Min:      {}", stats.min);
                    println!("Max:      {}", stats.max);
                    println!("Healthy:  {}", stats.healthy_count);
                    println!("Warnings: {}", stats.warning_count);
                    println!("Critical: {}", stats.critical_count);
                }
            }
        }
        Commands::Chart => {
            let chart = state.chart();
            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&chart)?),
                Format::Text => {
                    if chart.points.is_empty() {
                        println!("No data available to display.");
                    }
                    println!("Y axis: {} to {}", chart.y_min, chart.y_max);
                    for line in &chart.reference_lines {
                        println!("- {} at {} ({})", line.label, line.value, line.category);
                    }
                    for point in &chart.points {
                        println!("{}  {:>8}  {}", point.date, point.value, point.category);
                    }
                    for line in legend(&thresholds) {
                        println!("{line}");
                    }
                }
            }
        }
        Commands::Report { out } => {
            let report = build_report(&state);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::CheckThresholds => {
            thresholds.validate()?;
            println!(
                "Thresholds OK: {} < {} < {} < {}",
                thresholds.lower_threshold,
                thresholds.lower_bound,
                thresholds.upper_bound,
                thresholds.upper_threshold
            );
        }
        Commands::Add { date, value } => {
            let record = state.submit(&RecordDraft::new(date, value))?;
            info!("Added record {} for {}", record.id, record.date);
            print_records(&state.records, &thresholds, cli.format)?;
        }
    }

    Ok(())
}

fn print_records(records: &[Record], thresholds: &Thresholds, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => {
            let rows: Vec<serde_json::Value> = records
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "id": r.id,
                        "date": r.date,
                        "value": r.value,
                        "category": classify_value(r.value, thresholds),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Format::Text => {
            if records.is_empty() {
                println!("No health data available.");
                return Ok(());
            }
            println!("{} records", records.len());
            for record in records {
                println!(
                    "{:>12}  {}  {:>8}  {}",
                    record.id.to_string(),
                    record.date,
                    record.value,
                    classify_value(record.value, thresholds).badge()
                );
            }
        }
    }
    Ok(())
}
