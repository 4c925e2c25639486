/// xssvec: XSS page feature extraction for machine-learning classifiers
///
/// Turns stored crawl pages into a labeled, fixed-schema CSV dataset.
///
/// Commands:
/// - build: run both labeled manifests through the engine and write data.csv
/// - page: extract a single stored page and print its record as JSON
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use xssvec::cli::{extract_all, BuildConfig};
use xssvec::dataset::{self, DatasetWriter};
use xssvec::engine::{FeatureExtractor, Label};

#[derive(Parser)]
#[command(name = "xssvec")]
#[command(about = "XSS page feature extraction for machine-learning classifiers", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the labeled CSV dataset from crawl manifests
    Build {
        /// Benign crawl manifest (JSON array of {file_path, url})
        #[arg(long)]
        benign_manifest: PathBuf,

        /// Directory holding the stored benign pages
        #[arg(long)]
        benign_dir: PathBuf,

        /// xssed mirror manifest (JSON array of {url, category, files})
        #[arg(long)]
        xssed_manifest: PathBuf,

        /// Directory holding the mirrored xssed pages
        #[arg(long)]
        xssed_dir: PathBuf,

        /// Output CSV path
        #[arg(short, long, default_value = "data.csv")]
        output: PathBuf,

        /// Number of parallel threads (defaults to CPU count)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Optional log file path for debug logging
        #[arg(short, long)]
        log: Option<PathBuf>,
    },

    /// Extract one stored page and print its feature record as JSON
    Page {
        /// Stored HTML page
        #[arg(short, long)]
        file: PathBuf,

        /// URL the page was served from
        #[arg(short, long)]
        url: String,

        /// Label recorded in the `class` feature (0 benign, 1 xss)
        #[arg(long, default_value_t = 0)]
        label: u8,

        /// Optional log file path for debug logging
        #[arg(short, long)]
        log: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = match &cli.command {
        Commands::Build { log, .. } => log.clone(),
        Commands::Page { log, .. } => log.clone(),
    };
    init_logging(log_path.as_ref())?;

    match cli.command {
        Commands::Build {
            benign_manifest,
            benign_dir,
            xssed_manifest,
            xssed_dir,
            output,
            threads,
            log: _,
        } => build(
            benign_manifest,
            benign_dir,
            xssed_manifest,
            xssed_dir,
            output,
            threads,
        ),
        Commands::Page {
            file,
            url,
            label,
            log: _,
        } => page(file, url, label),
    }
}

/// Initialize logging with optional file output
fn init_logging(log_path: Option<&PathBuf>) -> Result<()> {
    use tracing_subscriber::fmt::writer::MakeWriterExt;

    if let Some(log_file) = log_path {
        // With log file: info+ to file, warn+ to stderr
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        let file_appender = tracing_appender::rolling::never(
            log_file
                .parent()
                .unwrap_or_else(|| std::path::Path::new(".")),
            log_file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("xssvec.log"),
        );

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(file_appender.and(std::io::stderr.with_max_level(tracing::Level::WARN)))
            .init();

        eprintln!("📝 Debug logging enabled: {:?}", log_file);
    } else {
        // No log file: warn+ to stderr only (unless RUST_LOG overrides)
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}

fn build(
    benign_manifest: PathBuf,
    benign_dir: PathBuf,
    xssed_manifest: PathBuf,
    xssed_dir: PathBuf,
    output: PathBuf,
    threads: Option<usize>,
) -> Result<()> {
    let extractor = FeatureExtractor::with_defaults();

    let mut tasks = dataset::load_benign(&benign_manifest, &benign_dir)?;
    let benign_count = tasks.len();
    tasks.extend(dataset::load_xssed(&xssed_manifest, &xssed_dir)?);
    info!(
        benign = benign_count,
        xss = tasks.len() - benign_count,
        "manifests loaded"
    );
    eprintln!("📁 {} pages queued", tasks.len());

    let config = BuildConfig {
        num_threads: threads.unwrap_or_else(num_cpus::get),
    };
    let outcome = extract_all(&extractor, &tasks, &config)?;

    let mut writer = DatasetWriter::create(&output, extractor.schema())?;
    for row in &outcome.rows {
        writer.write(row)?;
    }
    writer.finish()?;
    eprintln!(
        "💾 {} rows written to {} ({} pages skipped)",
        outcome.rows.len(),
        output.display(),
        outcome.skipped
    );
    Ok(())
}

fn page(file: PathBuf, url: String, label: u8) -> Result<()> {
    let extractor = FeatureExtractor::with_defaults();
    let label = if label == 0 { Label::Benign } else { Label::Xss };
    let record = extractor
        .extract_page(&file, &url, label)
        .with_context(|| format!("extracting {}", file.display()))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&record).context("rendering feature record")?
    );
    Ok(())
}
