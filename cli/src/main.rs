//! fictus — mock-patient pipeline CLI
//!
//! Generates randomized mock patients from a template CSV tree, imports
//! them into a remote CMS, and deletes them again.
//!
//! Usage:
//!   fictus generate "Mock Anna" --template-dir data/template --out-dir data/anna
//!   fictus import data/anna
//!   fictus create "Mock Anna" --template-dir data/template --out-dir data/anna
//!   fictus batch 5 --template-dir data/template --out-dir data/mock
//!   fictus delete "Mock Anna" --local-dir data/anna

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fictus_api::ApiClient;
use fictus_contracts::config::ApiConfig;
use fictus_contracts::error::FictusResult;
use fictus_contracts::report::{DeleteOutcome, GenerateReport, ImportReport};
use fictus_core::{generate, GenerateOptions, Orchestrator, TracingObserver};
use fictus_rand::{SystemRandom, DEFAULT_MONTH_SPAN};

/// Pause between patients in a batch run, so the remote API is never
/// hammered with back-to-back creation bursts.
const BATCH_DELAY: Duration = Duration::from_millis(500);

const DEFAULT_PERCENTAGE: f64 = 15.0;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Mock-patient data pipeline: generate, import, delete.
#[derive(Parser)]
#[command(name = "fictus", version, about = "Mock-patient data pipeline")]
struct Cli {
    /// Path to the TOML config file with the API settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a randomized mock patient on disk. No remote calls.
    Generate {
        /// Display name for the new patient.
        name: String,
        #[command(flatten)]
        gen: GenerateArgs,
    },
    /// Import a CSV tree into the remote store. Re-running an import
    /// creates no duplicates.
    Import {
        /// Directory holding the CSV tree.
        dir: PathBuf,
    },
    /// Generate a mock patient and import it in one pass.
    Create {
        /// Display name for the new patient.
        name: String,
        #[command(flatten)]
        gen: GenerateArgs,
    },
    /// Create several mock patients in sequence.
    Batch {
        /// Number of patients to create.
        count: u32,
        /// Display-name prefix; patients are named "<prefix> 1".. "<prefix> N".
        #[arg(long, default_value = "Mock Patient")]
        name_prefix: String,
        #[command(flatten)]
        gen: GenerateArgs,
    },
    /// Delete a remote patient and everything it owns.
    Delete {
        /// Display name of the patient to delete.
        name: String,
        /// Also remove this local CSV tree after the remote cascade.
        #[arg(long)]
        local_dir: Option<PathBuf>,
    },
}

/// Options shared by the generating subcommands.
#[derive(Args)]
struct GenerateArgs {
    /// Directory holding the template CSV tree.
    #[arg(long)]
    template_dir: PathBuf,
    /// Directory the generated tree is written to. For batch runs, one
    /// subdirectory per patient is created underneath.
    #[arg(long)]
    out_dir: PathBuf,
    /// Numeric perturbation, plus/minus percent.
    #[arg(long, default_value_t = DEFAULT_PERCENTAGE)]
    percentage: f64,
    /// Date shift window in months.
    #[arg(long, default_value_t = DEFAULT_MONTH_SPAN)]
    month_span: u32,
}

impl GenerateArgs {
    fn options(&self, name: &str, out_dir: PathBuf) -> GenerateOptions {
        GenerateOptions {
            template_dir: self.template_dir.clone(),
            out_dir,
            name: name.to_string(),
            percentage: self.percentage,
            month_span: self.month_span,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Structured logging; set RUST_LOG=debug for per-record detail.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> FictusResult<()> {
    match cli.command {
        Command::Generate { name, gen } => {
            let options = gen.options(&name, gen.out_dir.clone());
            let report = generate(&options, &TracingObserver, &mut SystemRandom::new())?;
            print_generate_report(&report);
        }
        Command::Import { dir } => {
            let mut orch = orchestrator(cli.config.as_deref())?;
            let report = orch.import(&dir)?;
            print_import_report(&report);
        }
        Command::Create { name, gen } => {
            let mut orch = orchestrator(cli.config.as_deref())?;
            let options = gen.options(&name, gen.out_dir.clone());
            let (generated, imported) = orch.create(&options)?;
            print_generate_report(&generated);
            print_import_report(&imported);
        }
        Command::Batch {
            count,
            name_prefix,
            gen,
        } => {
            let mut orch = orchestrator(cli.config.as_deref())?;
            for i in 1..=count {
                let name = format!("{} {}", name_prefix, i);
                let out_dir = gen.out_dir.join(format!("patient-{}", i));
                let (generated, imported) = orch.create(&gen.options(&name, out_dir))?;
                print_generate_report(&generated);
                print_import_report(&imported);
                if i < count {
                    std::thread::sleep(BATCH_DELAY);
                }
            }
        }
        Command::Delete { name, local_dir } => {
            let mut orch = orchestrator(cli.config.as_deref())?;
            match orch.delete(&name, local_dir.as_deref())? {
                DeleteOutcome::Deleted(report) => {
                    println!(
                        "deleted '{}': {} measurements, {} lab results, {} CMAS rows ({} failed)",
                        name,
                        report.measurements,
                        report.lab_results,
                        report.cmas_scores,
                        report.failed
                    );
                    if report.local_dir_removed {
                        println!("removed local tree");
                    }
                }
                DeleteOutcome::NotFound { name } => {
                    println!("no remote patient named '{}'", name);
                }
            }
        }
    }
    Ok(())
}

/// Build the orchestrator for the subcommands that talk to the remote
/// store. Config resolution: TOML file, then environment overrides.
fn orchestrator(config_path: Option<&std::path::Path>) -> FictusResult<Orchestrator> {
    let config = ApiConfig::load(config_path)?;
    let client = ApiClient::new(config)?;
    Ok(Orchestrator::new(
        Arc::new(client),
        Box::new(TracingObserver),
        Box::new(SystemRandom::new()),
    ))
}

// ── Report rendering ──────────────────────────────────────────────────────────

fn print_generate_report(report: &GenerateReport) {
    println!(
        "generated '{}' ({}) in {}",
        report.name,
        report.patient_id,
        report.out_dir.display()
    );
    println!(
        "  {} lab results, {} measurements ({} dropped), {} CMAS rows",
        report.lab_results,
        report.measurements_written,
        report.measurements_dropped,
        report.cmas_rows
    );
}

fn print_import_report(report: &ImportReport) {
    println!(
        "imported: patient {}, {} created / {} reused / {} failed",
        if report.patient_created {
            "created"
        } else {
            "reused"
        },
        report.groups.created
            + report.lab_results.created
            + report.measurements.created
            + report.cmas_scores.created,
        report.groups.reused
            + report.lab_results.reused
            + report.measurements.reused
            + report.cmas_scores.reused,
        report.groups.failed
            + report.lab_results.failed
            + report.measurements.failed
            + report.cmas_scores.failed
    );
}
