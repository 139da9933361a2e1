//! Portfolio growth simulation: period-by-period compounding of a single
//! asset with periodic contributions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ProjectionError;
use crate::rates;
use crate::types::{
    rate_from_pct, with_metadata, ComputationOutput, Frequency, Money, Pct, TermSpec,
};
use crate::ProjectionResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for the growth simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthInput {
    /// Starting capital.
    pub initial_balance: Money,
    /// Contribution credited once per compounding period. May be zero.
    #[serde(default)]
    pub periodic_contribution: Money,
    /// Annual effective rate as a whole-number percentage (8.0 = 8%).
    pub annual_rate_pct: Pct,
    /// Contribution and compounding frequency.
    pub frequency: Frequency,
    /// Savings term, in years or as a current/target age pair.
    pub term: TermSpec,
}

/// One compounding period of the projection. Periods are contiguous from 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub period: u32,
    pub opening_balance: Money,
    pub contribution: Money,
    pub interest: Money,
    pub closing_balance: Money,
    pub cumulative_contributions: Money,
}

/// Scalar summary derived from the final period plus echoed inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthSummary {
    pub final_capital: Money,
    pub total_contributions: Money,
    pub gross_gain: Money,
    /// Gross gain over total contributions, as a percentage.
    pub return_pct: Pct,
    pub term_years: u32,
    pub periods_per_year: u32,
    pub nominal_rate_pct: Pct,
    pub effective_period_rate_pct: Pct,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_age: Option<u32>,
}

/// Full projection: the period schedule plus its summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthProjection {
    pub periods: Vec<PeriodRecord>,
    pub summary: GrowthSummary,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Simulate compound growth with periodic contributions.
///
/// Each period: interest accrues on the opening balance, the contribution is
/// credited, and the closing balance carries into the next period. The
/// cumulative-contributions column starts at the initial balance.
pub fn simulate_growth(
    input: &GrowthInput,
) -> ProjectionResult<ComputationOutput<GrowthProjection>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    let term_years = input.term.resolve()?;
    let periods_per_year = input.frequency.periods_per_year();
    let total_periods = term_years * periods_per_year;

    let annual_rate = rate_from_pct(input.annual_rate_pct);
    let period_rate = rates::periodic_rate(annual_rate, input.frequency)?;

    if input.annual_rate_pct > dec!(50) {
        warnings.push(format!(
            "Annual rate {}% is above the 50% policy ceiling; results may be unrealistic",
            input.annual_rate_pct
        ));
    }

    let mut periods = Vec::with_capacity(total_periods as usize);
    let mut balance = input.initial_balance;
    let mut cumulative_contributions = input.initial_balance;

    for period in 1..=total_periods {
        let opening_balance = balance;
        let contribution = input.periodic_contribution;
        let interest = opening_balance * period_rate;
        let closing_balance = opening_balance + contribution + interest;

        cumulative_contributions += contribution;

        periods.push(PeriodRecord {
            period,
            opening_balance,
            contribution,
            interest,
            closing_balance,
            cumulative_contributions,
        });

        balance = closing_balance;
    }

    let gross_gain = balance - cumulative_contributions;
    let return_pct = if cumulative_contributions > Decimal::ZERO {
        (gross_gain / cumulative_contributions * dec!(100)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    let summary = GrowthSummary {
        final_capital: balance.round_dp(2),
        total_contributions: cumulative_contributions.round_dp(2),
        gross_gain: gross_gain.round_dp(2),
        return_pct,
        term_years,
        periods_per_year,
        nominal_rate_pct: input.annual_rate_pct,
        effective_period_rate_pct: (period_rate * dec!(100)).round_dp(4),
        target_age: input.term.target_age(),
    };

    let output = GrowthProjection { periods, summary };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Portfolio Growth (period-by-period compounding with periodic contributions)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(input: &GrowthInput) -> ProjectionResult<()> {
    if input.initial_balance < Decimal::ZERO {
        return Err(ProjectionError::InvalidInput {
            field: "initial_balance".into(),
            reason: "Initial balance cannot be negative".into(),
        });
    }
    if input.periodic_contribution < Decimal::ZERO {
        return Err(ProjectionError::InvalidInput {
            field: "periodic_contribution".into(),
            reason: "Contribution cannot be negative".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
