use clap::{Parser, Subcommand};

use crate::engine::constants::{
    DEFAULT_LEAD_DAYS, DEFAULT_REVIEW_INTERVAL, DEFAULT_SCENARIO,
};

/// canteen-sim — simulates day-by-day feeding logistics against a
/// capacity-constrained perishable-goods warehouse.
#[derive(Parser, Debug)]
#[command(name = "canteen-sim")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory holding the reference tables (ingredients.csv, dishes.csv,
    /// recipes.csv, warehouse.csv).
    #[arg(short, long, default_value = "data")]
    pub data_dir: String,

    /// Path of the daily report store.
    #[arg(short, long, default_value = "reports.json")]
    pub reports: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the simulation for a number of days.
    Run {
        /// Warehouse scenario to simulate.
        #[arg(short, long, default_value = DEFAULT_SCENARIO)]
        scenario: String,

        /// Number of days to simulate.
        #[arg(short, long, default_value_t = 30)]
        days: u32,

        /// Days between periodic procurement reviews.
        #[arg(long, default_value_t = DEFAULT_REVIEW_INTERVAL)]
        review: u32,

        /// Days between an order and its arrival.
        #[arg(long, default_value_t = DEFAULT_LEAD_DAYS)]
        lead: u32,

        /// Wall-clock pause between simulated days, in milliseconds.
        #[arg(long, default_value_t = 0)]
        tick_ms: u64,

        /// Seed for reproducible runs.
        #[arg(long)]
        seed: Option<u64>,

        /// Print the full report of every day instead of one-line summaries.
        #[arg(long)]
        verbose_days: bool,
    },

    /// Query persisted daily reports.
    Report {
        /// Only reports for this scenario.
        #[arg(short, long)]
        scenario: Option<String>,

        /// First day of the range (inclusive).
        #[arg(long, default_value_t = 1)]
        from: u32,

        /// Last day of the range (inclusive).
        #[arg(long, default_value_t = 999_999)]
        to: u32,

        /// Maximum number of rows.
        #[arg(long, default_value_t = 1000)]
        limit: usize,
    },

    /// Delete all persisted reports.
    Reset,
}

impl Default for Command {
    fn default() -> Self {
        Command::Run {
            scenario: DEFAULT_SCENARIO.to_string(),
            days: 30,
            review: DEFAULT_REVIEW_INTERVAL,
            lead: DEFAULT_LEAD_DAYS,
            tick_ms: 0,
            seed: None,
            verbose_days: false,
        }
    }
}
