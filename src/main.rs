use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use packet_analyzer::capture::discover_captures;
use packet_analyzer::formatting::{format_bytes, format_rate, format_seconds};
use packet_analyzer::settings::Config;
use packet_analyzer::statistics::{exponential_fit, summarize};
use packet_analyzer::visualization::{build_artifacts, render_all, ChartOptions, JsonRenderer};
use packet_analyzer::AnalysisSession;

#[derive(Parser)]
#[command(name = "packet-analyzer")]
#[command(about = "Packet length and inter-message delay statistics for folders of capture files")]
struct Cli {
    #[arg(required = true, help = "Capture folders; each folder is analyzed as one batch")]
    folders: Vec<PathBuf>,

    #[arg(short, long, help = "Configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Directory receiving the chart data")]
    output: Option<PathBuf>,

    #[arg(short, long, value_delimiter = ',', help = "Comma separated label per capture, in batch order")]
    labels: Vec<String>,

    #[arg(short, long, help = "Capture file extension")]
    extension: Option<String>,

    #[arg(short, long, help = "Enable debug logging")]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    if let Some(output) = cli.output {
        config.output.directory = output;
    }
    if let Some(extension) = cli.extension {
        config.input.extension = extension;
    }
    if !cli.labels.is_empty() {
        config.analysis.labels = cli.labels;
    }
    config.validate()?;

    for folder in &cli.folders {
        analyze_folder(folder, &config)?;
    }
    Ok(())
}

fn analyze_folder(folder: &Path, config: &Config) -> Result<()> {
    let captures = discover_captures(folder, &config.input.extension, config.input.sort_paths)?;
    if captures.is_empty() {
        warn!(
            "{}: no .{} files, skipping",
            folder.display(),
            config.input.extension.trim_start_matches('.')
        );
        return Ok(());
    }

    let mut session = AnalysisSession::with_labels(config.analysis.labels.iter().cloned());
    session
        .add_all(&captures)
        .with_context(|| format!("Batch '{}' aborted", folder.display()))?;

    if !session.labels().is_empty() && session.labels().len() != session.len() {
        warn!(
            "{} labels given for {} captures; unlabeled captures use their file name",
            session.labels().len(),
            session.len()
        );
    }

    println!("------------------------------");
    println!("{}", folder.display());
    for (label, record) in session.labeled_records() {
        let summary = summarize(record);
        let rate = exponential_fit(record.inter_arrival_delays()).ok().map(|fit| fit.rate);
        println!(
            "  {:<12} {:>7} packets  {:>10}  span {:>10}  mean delay {:>10}  rate {}",
            label,
            summary.packets,
            format_bytes(summary.total_bytes),
            format_seconds(summary.span_seconds),
            summary.mean_delay.map(format_seconds).unwrap_or_else(|| "n/a".to_string()),
            format_rate(rate),
        );
    }

    let batch_name = folder
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "captures".to_string());
    let mut renderer = JsonRenderer::new(config.output.directory.join(batch_name), config.output.pretty)?;

    let artifacts = build_artifacts(&session, &ChartOptions::from(&config.analysis));
    let charts = render_all(&mut renderer, &artifacts)?;
    let tables = renderer.write_tables(&session)?;

    info!(
        "{}: wrote {} charts and {} tables to {}",
        folder.display(),
        charts.len(),
        tables.len(),
        renderer.directory().display()
    );
    Ok(())
}
