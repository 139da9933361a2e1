use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use nestegg_core::bonds::valuation::{self, BondInput};
use nestegg_core::Frequency;

use crate::input;

/// Arguments for bond valuation. Accepts either a JSON input file or the
/// individual flags.
#[derive(Args)]
pub struct BondArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
    /// Par / face value
    #[arg(long)]
    pub face_value: Option<Decimal>,
    /// Annual coupon rate, whole-number percentage
    #[arg(long)]
    pub coupon_rate: Option<Decimal>,
    /// Coupon frequency (annual, semiannual, four-month, quarterly, bimonthly, monthly)
    #[arg(long)]
    pub frequency: Option<String>,
    /// Years to maturity
    #[arg(long)]
    pub years: Option<u32>,
    /// Required annual yield, whole-number percentage
    #[arg(long = "yield")]
    pub required_yield: Option<Decimal>,
}

pub fn run_bond(args: BondArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bond_input = match from_flags(&args)? {
        Some(direct) => direct,
        None => input::load(&args.input, "bond valuation")?,
    };
    let result = valuation::value_bond(&bond_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Build the input from direct flags when all of them are present.
fn from_flags(args: &BondArgs) -> Result<Option<BondInput>, Box<dyn std::error::Error>> {
    let (face_value, coupon_rate, frequency, years, required_yield) = match (
        args.face_value,
        args.coupon_rate,
        &args.frequency,
        args.years,
        args.required_yield,
    ) {
        (Some(f), Some(c), Some(freq), Some(y), Some(r)) => (f, c, freq, y, r),
        (None, None, None, None, None) => return Ok(None),
        _ => {
            return Err(
                "bond flags are all-or-nothing: --face-value, --coupon-rate, --frequency, \
                 --years, --yield"
                    .into(),
            )
        }
    };

    Ok(Some(BondInput {
        face_value,
        coupon_rate_pct: coupon_rate,
        frequency: frequency.parse::<Frequency>()?,
        years_to_maturity: years,
        required_yield_pct: required_yield,
    }))
}
