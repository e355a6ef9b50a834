use std::path::Path;
use std::thread;
use std::time::Duration;

use clap::Parser;
use log::error;

use canteen_sim::cli::{Cli, Command};
use canteen_sim::engine::{Runtime, SimConfig};
use canteen_sim::error::{Result, SimError};
use canteen_sim::interface::{display_day_summary, display_report, display_reports, prompt_yes_no};
use canteen_sim::state::{load_catalog, ReportStore};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_default();

    match command {
        Command::Run {
            scenario,
            days,
            review,
            lead,
            tick_ms,
            seed,
            verbose_days,
        } => cmd_run(
            &cli.data_dir,
            &cli.reports,
            scenario,
            days,
            review,
            lead,
            tick_ms,
            seed,
            verbose_days,
        ),
        Command::Report {
            scenario,
            from,
            to,
            limit,
        } => cmd_report(&cli.reports, scenario.as_deref(), from, to, limit),
        Command::Reset => cmd_reset(&cli.reports),
    }
}

/// Drive the simulation: one tick per day, each day's report upserted into
/// the store as it completes.
#[allow(clippy::too_many_arguments)]
fn cmd_run(
    data_dir: &str,
    reports_path: &str,
    scenario: String,
    days: u32,
    review: u32,
    lead: u32,
    tick_ms: u64,
    seed: Option<u64>,
    verbose_days: bool,
) -> Result<()> {
    let catalog = load_catalog(data_dir)?;
    let mut store = ReportStore::open(reports_path)?;

    let config = SimConfig {
        scenario,
        review_interval: review,
        lead_days: lead,
        seed,
        ..SimConfig::default()
    };

    let mut runtime = Runtime::new();
    runtime.start(config)?;

    println!("Simulating {} day(s)...", days);

    for _ in 0..days {
        let report = match runtime.tick(&catalog) {
            Ok(report) => report,
            // A missing capacity bound makes every further day meaningless;
            // anything else aborts only this day.
            Err(e @ SimError::ScenarioNotFound { .. }) => {
                runtime.stop();
                return Err(e);
            }
            Err(e) => {
                error!("day failed: {e}");
                continue;
            }
        };

        if verbose_days {
            display_report(&report);
        } else {
            display_day_summary(&report);
        }

        if let Err(e) = store.upsert(report) {
            error!("failed to persist report: {e}");
        }

        if tick_ms > 0 {
            thread::sleep(Duration::from_millis(tick_ms));
        }
    }

    runtime.stop();

    if let Some(last) = runtime.status() {
        println!();
        println!("Final state:");
        display_report(last);
    }

    Ok(())
}

/// Query and render persisted reports.
fn cmd_report(
    reports_path: &str,
    scenario: Option<&str>,
    from: u32,
    to: u32,
    limit: usize,
) -> Result<()> {
    if !Path::new(reports_path).exists() {
        println!("No report store at {}. Run a simulation first.", reports_path);
        return Ok(());
    }

    let store = ReportStore::open(reports_path)?;
    let rows = store.query(from, to, scenario, limit);
    display_reports(&rows);
    Ok(())
}

/// Wipe the report store after confirmation.
fn cmd_reset(reports_path: &str) -> Result<()> {
    if !Path::new(reports_path).exists() {
        println!("No report store at {}. Nothing to reset.", reports_path);
        return Ok(());
    }

    let mut store = ReportStore::open(reports_path)?;
    if store.is_empty() {
        println!("Report store is already empty.");
        return Ok(());
    }

    let confirm = prompt_yes_no(
        &format!("Delete all {} persisted report(s)?", store.len()),
        false,
    )?;
    if confirm {
        store.clear()?;
        println!("Report store cleared.");
    }

    Ok(())
}
