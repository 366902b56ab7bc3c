//! tmpl CLI
//!
//! Usage:
//!   tmpl run [FILES]... [OPTIONS]
//!
//! Options:
//!   -o, --out-file <FILE>      Output file when bundling a single input
//!   -d, --out-dir <DIR>        Directory to write output files to
//!   -s, --out-suffix <SUFFIX>  Output file name suffix (default: .tmpl.html)
//!   -c, --config <FILE>        Configuration file (TOML format)
//!   -v, --verbose              Log every fragment that is loaded
//!   -h, --help                 Print help
//!   -V, --version              Print version

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use html_tmpl::batch::{self, OutputMode, StatusCode};
use html_tmpl::{BundleConfig, TracingReporter};

#[derive(Parser)]
#[command(name = "tmpl")]
#[command(version, about = "Bundle HTML documents by inlining template fragments")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Process HTML files
    Run(RunArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// HTML files to process
    files: Vec<PathBuf>,

    /// Custom output file if single input file
    #[arg(short = 'o', long)]
    out_file: Option<PathBuf>,

    /// Directory to write output files to
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,

    /// Change output file name suffixes
    #[arg(short = 's', long)]
    out_suffix: Option<String>,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log every fragment that is loaded
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let verbose = matches!(&cli.command, Some(Command::Run(args)) if args.verbose);
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();

    let status = match cli.command {
        Some(Command::Run(args)) => run(args),
        None => StatusCode::Pending,
    };

    match status {
        StatusCode::Success => tracing::info!("Successfully finished without any errors!"),
        StatusCode::Pending => {
            tracing::warn!("No command was specified? Use --help to see usage.")
        }
        StatusCode::Failure => {
            tracing::error!("An error occurred while running. Use --help to see usage.")
        }
    }

    std::process::exit(status.code());
}

fn run(args: RunArgs) -> StatusCode {
    let mut config = match &args.config {
        Some(path) => match BundleConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Error loading config '{}': {}", path.display(), e);
                return StatusCode::Failure;
            }
        },
        None => BundleConfig::default(),
    };
    if let Some(dir) = args.out_dir {
        config = config.with_out_dir(dir);
    }
    if let Some(suffix) = args.out_suffix {
        config = config.with_out_suffix(suffix);
    }

    let mode = OutputMode::from_options(args.out_file, &config);
    let jobs = match batch::plan(batch::html_inputs(&args.files), &mode) {
        Ok(jobs) => jobs,
        Err(e) => {
            tracing::warn!("{}", e);
            return StatusCode::Failure;
        }
    };

    if let Ok(root) = std::env::current_dir() {
        tracing::info!("> Root directory: {}", root.display());
    }
    if let OutputMode::Directory { dir, .. } = &mode {
        tracing::info!("> Output directory: {}", display_dir(dir));
    }

    let reporter = TracingReporter::new().with_diagnostics(true);
    batch::run(&jobs, &config, &reporter).status()
}

fn display_dir(dir: &Path) -> String {
    if dir.as_os_str().is_empty() {
        ".".to_string()
    } else {
        dir.display().to_string()
    }
}
