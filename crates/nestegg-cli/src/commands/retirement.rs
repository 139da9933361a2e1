use clap::Args;
use serde_json::Value;

use nestegg_core::growth::portfolio::GrowthSummary;
use nestegg_core::retirement::annuity::{self, AnnuityInput};
use nestegg_core::retirement::scenarios::{self, RetirementGridInput};

use crate::input;

/// Arguments for annuitization
#[derive(Args)]
pub struct AnnuityArgs {
    /// Path to JSON input file with the annuity parameters
    #[arg(long)]
    pub input: Option<String>,
    /// Path to a prior `growth` output (the summary is extracted from it).
    /// Annuitization fails without one.
    #[arg(long)]
    pub growth: Option<String>,
}

/// Arguments for the retirement scenario grid
#[derive(Args)]
pub struct RetirementGridArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_annuity(args: AnnuityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let annuity_input: AnnuityInput = input::load(&args.input, "annuitization")?;

    let growth_summary = match &args.growth {
        Some(path) => Some(load_growth_summary(path)?),
        None => None,
    };

    let result = annuity::annuitize(growth_summary.as_ref(), &annuity_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_retirement_grid(
    args: RetirementGridArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let grid_input: RetirementGridInput = input::load(&args.input, "retirement grid")?;
    let result = scenarios::retirement_grid(&grid_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Accepts either a full `growth` output envelope or a bare summary object.
fn load_growth_summary(path: &str) -> Result<GrowthSummary, Box<dyn std::error::Error>> {
    let value = input::file::read_json_value(path)?;
    let summary = value.pointer("/result/summary").cloned().unwrap_or(value);
    Ok(serde_json::from_value(summary)?)
}
