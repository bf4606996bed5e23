mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::clients::SummaryArgs;
use commands::dashboard::{KpisArgs, ProfitabilityArgs, RevenueArgs, RfmArgs};
use commands::receivables::AgingArgs;
use commands::sample::SampleArgs;

/// Billing analytics for client/project/invoice snapshots
#[derive(Parser)]
#[command(
    name = "ciq",
    version,
    about = "Billing analytics over client/project/invoice snapshots",
    long_about = "Turns a tenant-scoped billing snapshot (clients, projects, invoices) \
                  into decision-support metrics with decimal precision: dashboard KPIs, \
                  accounts-receivable aging, per-client profitability ranking, and \
                  RFM customer segmentation."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Dashboard KPIs: revenue, gross profit, margin, outstanding AR, hours
    Kpis(KpisArgs),
    /// Accounts-receivable aging buckets (0-30 / 31-60 / 61-90 / 90+)
    Aging(AgingArgs),
    /// Per-client profitability ranking
    Profitability(ProfitabilityArgs),
    /// Recency/Frequency/Monetary scoring and segmentation
    Rfm(RfmArgs),
    /// Collected revenue by calendar month, trailing year
    RevenueByMonth(RevenueArgs),
    /// Drill-down totals for a single client
    ClientSummary(SummaryArgs),
    /// Generate a randomized demo snapshot
    Sample(SampleArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Kpis(args) => commands::dashboard::run_kpis(args),
        Commands::Aging(args) => commands::receivables::run_aging(args),
        Commands::Profitability(args) => commands::dashboard::run_profitability(args),
        Commands::Rfm(args) => commands::dashboard::run_rfm(args),
        Commands::RevenueByMonth(args) => commands::dashboard::run_revenue_by_month(args),
        Commands::ClientSummary(args) => commands::clients::run_summary(args),
        Commands::Sample(args) => commands::sample::run_sample(args),
        Commands::Version => {
            println!("ciq {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
