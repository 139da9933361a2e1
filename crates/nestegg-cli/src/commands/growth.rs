use clap::Args;
use serde_json::Value;

use nestegg_core::growth::inflation::{self, InflationGrowthInput};
use nestegg_core::growth::portfolio::{self, GrowthInput};

use crate::input;

/// Arguments for the growth simulation
#[derive(Args)]
pub struct GrowthArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the inflation-adjusted growth simulation
#[derive(Args)]
pub struct GrowthInflationArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_growth(args: GrowthArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let growth_input: GrowthInput = input::load(&args.input, "growth simulation")?;
    let result = portfolio::simulate_growth(&growth_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_growth_inflation(
    args: GrowthInflationArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let inflation_input: InflationGrowthInput =
        input::load(&args.input, "inflation-adjusted growth simulation")?;
    let result = inflation::simulate_inflation_adjusted(&inflation_input)?;
    Ok(serde_json::to_value(result)?)
}
