//! drawing-pack - CLI tool to plot drawings to PDF and merge them into one package.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use drawing_pack_rs::{
    plan, run, AccoreConsole, LopdfMerger, PackError, PackOutcome, PackRequest, Plan,
    PlotConfig, Space,
};

/// Plot drawings to PDF through the AutoCAD core console and merge them into a package.
#[derive(Parser, Debug)]
#[command(name = "drawing-pack")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Drawing number (or part of one) to match, e.g. 00200 or PID-00205
    #[arg(value_name = "MATCH")]
    pattern: String,

    /// Directory to search, or a single drawing
    source: PathBuf,

    /// Directory the package is written to (defaults to the source directory)
    #[arg(short, long)]
    dest: Option<PathBuf>,

    /// Package file name
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Plot every paperspace layout instead of modelspace
    #[arg(short, long)]
    paper: bool,

    /// Only the latest revision of each drawing
    #[arg(short, long)]
    latest: bool,

    /// Keep the individual sheet PDFs (paperspace)
    #[arg(short, long)]
    keep: bool,

    /// Delete the source drawings after plotting
    #[arg(short = 'x', long = "del-source")]
    del_source: bool,

    /// Open the package(s) when done
    #[arg(short, long)]
    view: bool,

    /// Path to accoreconsole.exe (defaults to the newest AutoCAD install)
    #[arg(long, env = "DRAWING_PACK_ACCORE")]
    accore: Option<PathBuf>,

    /// Directory for scratch scripts and the layout list
    #[arg(long)]
    scratch: Option<PathBuf>,

    /// Modelspace plot script to use instead of the built-in one
    #[arg(long)]
    model_script: Option<PathBuf>,

    /// Layout plot script template to use instead of the built-in one
    #[arg(long)]
    layout_script: Option<PathBuf>,

    /// Print the resolved drawings as JSON without plotting
    #[arg(long)]
    debug: bool,

    /// Verbose output
    #[arg(long)]
    verbose: bool,
}

impl Args {
    fn request(&self) -> PackRequest {
        PackRequest {
            pattern: self.pattern.clone(),
            source: self.source.clone(),
            dest: self.dest.clone(),
            output: self.output.clone(),
            space: if self.paper { Space::Paper } else { Space::Model },
            latest: self.latest,
            keep: self.keep,
            delete_source: self.del_source,
        }
    }

    fn config(&self) -> Result<PlotConfig> {
        let mut config = match &self.scratch {
            Some(dir) => PlotConfig::new(dir),
            None => PlotConfig::default(),
        };
        if let Some(path) = &self.model_script {
            config = config.with_model_script_file(path)?;
        }
        if let Some(path) = &self.layout_script {
            config = config.with_layout_script_file(path)?;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match pack(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            error!("{:#}", err);
            let code = err
                .downcast_ref::<PackError>()
                .map_or(1, PackError::code_value);
            ExitCode::from(code as u8)
        }
    }
}

/// Run the request. `Ok(false)` means there was nothing to plot.
fn pack(args: &Args) -> Result<bool> {
    let request = args.request();

    // Debug output
    if args.debug {
        let resolved = plan(&request)
            .with_context(|| format!("Failed to search {}", request.source.display()))?;
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(matches!(resolved, Plan::Ready(_)));
    }

    let config = args.config()?;
    let engine = match &args.accore {
        Some(path) => AccoreConsole::new(path),
        None => AccoreConsole::discover().context("Pass --accore or set DRAWING_PACK_ACCORE")?,
    };
    info!("Using {}", engine.executable().display());

    let mut merger = LopdfMerger::new();
    let outcome = run(&request, &engine, &mut merger, &config)
        .with_context(|| format!("Failed to pack '{}'", request.pattern))?;

    match &outcome {
        PackOutcome::Completed(reports) => {
            let skipped: usize = reports.iter().map(|report| report.skipped.len()).sum();
            if skipped > 0 {
                warn!("{} plot(s) missing from the package", skipped);
            }
            info!("{}", outcome);
            if args.view {
                for output in outcome.outputs() {
                    if let Err(e) = open::that(output) {
                        warn!("Could not open {}: {}", output.display(), e);
                    }
                }
            }
        }
        rejected => {
            error!("{}", rejected);
        }
    }

    Ok(outcome.is_success())
}
