use clap::Args;
use serde_json::Value;

use nestegg_core::strategy::benchmark::{self, BenchmarkInput};
use nestegg_core::strategy::comparison::{self, StrategyComparisonInput};
use nestegg_core::strategy::rebalancing::{self, RebalancingInput};

use crate::input;

/// Arguments for the stochastic strategy comparison
#[derive(Args)]
pub struct CompareStrategiesArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
    /// Seed override for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for the benchmark comparison
#[derive(Args)]
pub struct BenchmarkArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the rebalancing simulation
#[derive(Args)]
pub struct RebalanceArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_compare_strategies(
    args: CompareStrategiesArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut comparison_input: StrategyComparisonInput =
        input::load(&args.input, "strategy comparison")?;
    if args.seed.is_some() {
        comparison_input.seed = args.seed;
    }
    let result = comparison::compare_strategies(&comparison_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_benchmark(args: BenchmarkArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let benchmark_input: BenchmarkInput = input::load(&args.input, "benchmark comparison")?;
    let result = benchmark::compare_with_benchmarks(&benchmark_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_rebalance(args: RebalanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rebalancing_input: RebalancingInput =
        input::load(&args.input, "rebalancing simulation")?;
    let result = rebalancing::simulate_rebalancing(&rebalancing_input)?;
    Ok(serde_json::to_value(result)?)
}
