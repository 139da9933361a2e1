//! Inflation-adjusted growth simulation. Tracks real (inflation-discounted)
//! interest and supports yearly contribution escalation, which the plain
//! simulator and the rebalancing simulator deliberately do not.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ProjectionError;
use crate::rates;
use crate::retirement::annuity::monthly_annuity_payment;
use crate::types::{
    rate_from_pct, with_metadata, ComputationOutput, Frequency, Money, Pct, TermSpec,
};
use crate::ProjectionResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for the inflation-adjusted growth simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InflationGrowthInput {
    pub initial_balance: Money,
    /// First-period contribution; escalates once per elapsed year.
    #[serde(default)]
    pub initial_contribution: Money,
    /// Annual effective rate as a whole-number percentage.
    pub annual_rate_pct: Pct,
    pub frequency: Frequency,
    pub term: TermSpec,
    /// Annual inflation rate as a whole-number percentage.
    pub inflation_pct: Pct,
    /// Yearly contribution escalation as a whole-number percentage. Zero
    /// keeps the contribution constant.
    #[serde(default)]
    pub escalation_pct: Pct,
    /// When set, estimate a cost-of-living-adjusted monthly payment from the
    /// final capital over `retirement_horizon_years`.
    #[serde(default)]
    pub col_adjusted_payment: bool,
    #[serde(default = "default_retirement_horizon")]
    pub retirement_horizon_years: u32,
}

fn default_retirement_horizon() -> u32 {
    25
}

/// One compounding period. `real_interest` is the nominal interest
/// discounted by one period of inflation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InflationPeriodRecord {
    pub period: u32,
    pub opening_balance: Money,
    pub contribution: Money,
    pub real_interest: Money,
    pub closing_balance: Money,
    pub cumulative_contributions: Money,
    pub cumulative_inflation: Money,
}

/// Summary of the inflation-adjusted projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InflationGrowthSummary {
    pub final_capital: Money,
    pub total_contributions: Money,
    pub gross_gain: Money,
    pub inflation_total: Money,
    pub real_gain: Money,
    pub real_return_pct: Pct,
    pub inflation_pct: Pct,
    pub escalation_pct: Pct,
    /// Monthly payment estimate scaled by mid-horizon inflation, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_adjusted_monthly_payment: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InflationGrowthProjection {
    pub periods: Vec<InflationPeriodRecord>,
    pub summary: InflationGrowthSummary,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Simulate compound growth with inflation-discounted interest and yearly
/// contribution escalation.
pub fn simulate_inflation_adjusted(
    input: &InflationGrowthInput,
) -> ProjectionResult<ComputationOutput<InflationGrowthProjection>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    let term_years = input.term.resolve()?;
    let periods_per_year = input.frequency.periods_per_year();
    let total_periods = term_years * periods_per_year;

    let annual_rate = rate_from_pct(input.annual_rate_pct);
    let inflation_rate = rate_from_pct(input.inflation_pct);
    let escalation_rate = rate_from_pct(input.escalation_pct);

    let period_rate = rates::periodic_rate(annual_rate, input.frequency)?;
    let period_inflation = rates::periodic_rate(inflation_rate, input.frequency)?;

    if input.inflation_pct > input.annual_rate_pct {
        warnings.push(
            "Inflation exceeds the nominal rate; real interest will be negative".into(),
        );
    }

    let mut periods = Vec::with_capacity(total_periods as usize);
    let mut balance = input.initial_balance;
    let mut contribution = input.initial_contribution;
    let mut cumulative_contributions = input.initial_balance;
    let mut cumulative_inflation = Decimal::ZERO;

    for period in 1..=total_periods {
        let opening_balance = balance;

        // Escalate at each year boundary after the first period.
        let new_year =
            period > 1 && (periods_per_year == 1 || period % periods_per_year == 1);
        if new_year {
            contribution *= Decimal::ONE + escalation_rate;
        }

        let nominal_interest = opening_balance * period_rate;
        let real_interest = nominal_interest / (Decimal::ONE + period_inflation)
            - opening_balance * period_inflation;
        let closing_balance = opening_balance + contribution + real_interest;

        cumulative_contributions += contribution;
        cumulative_inflation += opening_balance * period_inflation;

        periods.push(InflationPeriodRecord {
            period,
            opening_balance,
            contribution,
            real_interest,
            closing_balance,
            cumulative_contributions,
            cumulative_inflation,
        });

        balance = closing_balance;
    }

    let gross_gain = balance - cumulative_contributions;
    let real_gain = gross_gain - cumulative_inflation;
    let real_return_pct = if cumulative_contributions > Decimal::ZERO {
        (real_gain / cumulative_contributions * dec!(100)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    let col_adjusted_monthly_payment = if input.col_adjusted_payment {
        let initial_payment =
            monthly_annuity_payment(balance, annual_rate, input.retirement_horizon_years)?;
        // Mid-horizon adjustment: (1 + inflation)^(horizon/2).
        let half_horizon = Decimal::from(input.retirement_horizon_years) / dec!(2);
        let adjustment = (Decimal::ONE + inflation_rate).powd(half_horizon);
        Some((initial_payment * adjustment).round_dp(2))
    } else {
        None
    };

    let summary = InflationGrowthSummary {
        final_capital: balance.round_dp(2),
        total_contributions: cumulative_contributions.round_dp(2),
        gross_gain: gross_gain.round_dp(2),
        inflation_total: cumulative_inflation.round_dp(2),
        real_gain: real_gain.round_dp(2),
        real_return_pct,
        inflation_pct: input.inflation_pct,
        escalation_pct: input.escalation_pct,
        col_adjusted_monthly_payment,
    };

    let output = InflationGrowthProjection { periods, summary };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Inflation-Adjusted Growth (real interest with yearly contribution escalation)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(input: &InflationGrowthInput) -> ProjectionResult<()> {
    if input.initial_balance < Decimal::ZERO {
        return Err(ProjectionError::InvalidInput {
            field: "initial_balance".into(),
            reason: "Initial balance cannot be negative".into(),
        });
    }
    if input.initial_contribution < Decimal::ZERO {
        return Err(ProjectionError::InvalidInput {
            field: "initial_contribution".into(),
            reason: "Contribution cannot be negative".into(),
        });
    }
    if input.escalation_pct < Decimal::ZERO {
        return Err(ProjectionError::InvalidInput {
            field: "escalation_pct".into(),
            reason: "Escalation cannot be negative".into(),
        });
    }
    if input.col_adjusted_payment && input.retirement_horizon_years < 1 {
        return Err(ProjectionError::InvalidHorizon {
            reason: "Retirement horizon must be at least 1 year".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
