mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::bonds::BondArgs;
use commands::growth::{GrowthArgs, GrowthInflationArgs};
use commands::retirement::{AnnuityArgs, RetirementGridArgs};
use commands::strategy::{BenchmarkArgs, CompareStrategiesArgs, RebalanceArgs};

/// Personal-finance projections: compound growth, annuities, bonds, strategies
#[derive(Parser)]
#[command(
    name = "nestegg",
    version,
    about = "Personal-finance projection engine",
    long_about = "Projects compound portfolio growth, derives retirement income streams, \
                  values fixed-coupon bonds, and compares investment strategies under \
                  randomized volatility and periodic rebalancing."
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
    /// Simulate compound portfolio growth with periodic contributions
    Growth(GrowthArgs),
    /// Growth with inflation-discounted interest and contribution escalation
    GrowthInflation(GrowthInflationArgs),
    /// Value a fixed-coupon bond at a required yield
    Bond(BondArgs),
    /// Derive a retirement income stream from a growth result
    Annuity(AnnuityArgs),
    /// Retirement scenario grid over ages and rates
    RetirementGrid(RetirementGridArgs),
    /// Compare strategies under randomized return volatility
    CompareStrategies(CompareStrategiesArgs),
    /// Compare a personal strategy against market benchmarks
    Benchmark(BenchmarkArgs),
    /// Simulate a multi-asset portfolio with periodic rebalancing
    Rebalance(RebalanceArgs),
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
        Commands::Growth(args) => commands::growth::run_growth(args),
        Commands::GrowthInflation(args) => commands::growth::run_growth_inflation(args),
        Commands::Bond(args) => commands::bonds::run_bond(args),
        Commands::Annuity(args) => commands::retirement::run_annuity(args),
        Commands::RetirementGrid(args) => commands::retirement::run_retirement_grid(args),
        Commands::CompareStrategies(args) => commands::strategy::run_compare_strategies(args),
        Commands::Benchmark(args) => commands::strategy::run_benchmark(args),
        Commands::Rebalance(args) => commands::strategy::run_rebalance(args),
        Commands::Version => {
            println!("nestegg {}", env!("CARGO_PKG_VERSION"));
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
