use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use shot_analyzer::chart::{self, ChartFormat, ChartTheme};
use shot_analyzer::{ShotAnalyzer, ViewOutcome};
use std::io;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    version,
    about = "Derives field-goal shooting statistics from a shot log and renders them as charts",
    long_about = None
)]
struct Cli {
    /// Path to the shot log CSV
    #[arg(short, long)]
    input: PathBuf,

    /// Output format (json or csv)
    #[arg(short, long, default_value = "json")]
    format: String,

    /// Directory to write one chart per view into
    /// If not specified, no charts are rendered
    #[arg(short = 'c', long = "chart-dir")]
    chart_dir: Option<PathBuf>,

    /// Chart image format (png or svg)
    #[arg(long = "chart-format", default_value = "png")]
    chart_format: ChartFormat,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// CSV出力の1行
#[derive(Serialize)]
struct SeriesRow<'a> {
    view: &'static str,
    label: &'a str,
    value: Option<f64>,
}

fn to_json(outcomes: &[ViewOutcome]) -> anyhow::Result<serde_json::Value> {
    let mut entries = Vec::new();
    for outcome in outcomes {
        let mut entry = match &outcome.result {
            Ok(view) => serde_json::to_value(view).context("Failed to serialize view")?,
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        };
        entry["view"] = serde_json::Value::from(outcome.kind.slug());
        entries.push(entry);
    }
    Ok(serde_json::Value::Array(entries))
}

fn write_csv(outcomes: &[ViewOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for outcome in outcomes {
        let view = match &outcome.result {
            Ok(view) => view,
            Err(e) => {
                warn!("{}: skipped in CSV output: {}", outcome.kind, e);
                continue;
            }
        };
        for point in &view.points {
            wtr.serialize(SeriesRow {
                view: outcome.kind.slug(),
                label: &point.label,
                value: point.value.map(|v| (v * 1000.0).round() / 1000.0),
            })
            .context("Failed to write CSV record")?;
        }
    }
    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let analyzer = ShotAnalyzer::new(&cli.input)
        .with_context(|| format!("Failed to load shot log {}", cli.input.display()))?;
    info!(
        "loaded {} shot record(s) from {}",
        analyzer.records().len(),
        cli.input.display()
    );

    let outcomes = analyzer.analyze();

    match cli.format.as_str() {
        "json" => {
            println!(
                "{}",
                serde_json::to_string_pretty(&to_json(&outcomes)?)
                    .context("Failed to serialize to JSON")?
            );
        }
        "csv" => write_csv(&outcomes)?,
        _ => anyhow::bail!("Unsupported output format: {}", cli.format),
    }

    if let Some(dir) = &cli.chart_dir {
        chart::render_report(&outcomes, dir, cli.chart_format, &ChartTheme::default())
            .context("Failed to render charts")?;
    }

    Ok(())
}
