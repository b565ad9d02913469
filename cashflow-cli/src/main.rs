use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use cashflow_ingest::{discover_files, summarize_sources};
use cashflow_reports::{load_reports, render_report};

mod config;

#[derive(Parser, Debug)]
#[command(
    name = "cashflow",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CASHFLOW_BUILD_SHA"), ")"),
    about = "Reconcile bank statement exports into a cash-flow report"
)]
struct Cli {
    /// Config file (default: ./cashflow.toml; built-in defaults if absent)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load every source, aggregate cash flow and write the markdown report
    Analyze {
        /// Directory with the exports (overrides config and $CASHFLOW_DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Report path (default: <data-dir>/<report_file from config>)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print the cash-flow summary as JSON instead of writing a report
        #[arg(long)]
        json: bool,
    },

    /// Write the default config file
    InitConfig,

    /// List configured sources and the files each one matches
    Sources {
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config_path = config::config_path(cli.config);

    match cli.command {
        Command::Analyze {
            data_dir,
            out,
            json,
        } => {
            let cfg = config::load_config(&config_path)?;
            let data_dir = cfg.resolve_data_dir(data_dir);
            analyze(&cfg, data_dir, out, json)?;
        }

        Command::InitConfig => {
            config::init_config(&config_path)?;
        }

        Command::Sources { data_dir } => {
            let cfg = config::load_config(&config_path)?;
            let data_dir = cfg.resolve_data_dir(data_dir);
            println!("Data directory: {}\n", data_dir.display());

            for source in &cfg.sources {
                println!("{} ({:?})", source.tag, source.strategy);
                match discover_files(&data_dir, source) {
                    Ok(files) if files.is_empty() => println!("  (no files)"),
                    Ok(files) => {
                        for f in files {
                            println!("  - {}", f.display());
                        }
                    }
                    Err(e) => println!("  error: {e}"),
                }
            }
        }
    }

    Ok(())
}

fn analyze(cfg: &config::Config, data_dir: PathBuf, out: Option<PathBuf>, json: bool) -> Result<()> {
    log::info!("Loading bank data from {}", data_dir.display());
    let summary = summarize_sources(&data_dir, &cfg.sources);

    log::info!(
        "{} statement(s), {} load failure(s)",
        summary.sources.len(),
        summary.load_failures.len()
    );
    for s in summary.unresolved() {
        log::warn!("{}: excluded from totals", s.source);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let reports = load_reports(&data_dir, &cfg.reports);
    let today = chrono::Local::now().date_naive();
    let report = render_report(today, &summary, &reports);

    let path = out.unwrap_or_else(|| cfg.report_path(&data_dir));
    fs::write(&path, &report).with_context(|| format!("write {}", path.display()))?;

    log::info!("Report generated at {}", path.display());
    println!("{report}");
    Ok(())
}
