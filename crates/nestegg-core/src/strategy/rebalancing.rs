//! Multi-asset portfolio simulation with periodic weight restoration.
//!
//! Each asset grows at its own per-period rate (derived at the overall
//! contribution frequency), contributions are allocated in proportion to
//! post-growth weights so they follow drift between rebalances, and weights
//! are reset to target at each rebalance boundary.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ProjectionError;
use crate::rates;
use crate::types::{
    rate_from_pct, with_metadata, ComputationOutput, Frequency, Money, Pct,
};
use crate::ProjectionResult;

/// Tolerance for the target-weight sum check.
const WEIGHT_EPSILON: Decimal = dec!(0.000001);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One asset in the strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSpec {
    pub name: String,
    /// Target portfolio weight, in [0, 1]. Weights must sum to 1.
    pub target_weight: Decimal,
    /// The asset's own annual effective rate, whole-number percentage.
    pub annual_rate_pct: Pct,
}

/// Input for the rebalancing simulation. Contribution escalation is not
/// supported here; escalating contributions exist only in the
/// inflation-adjusted growth simulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalancingInput {
    pub initial_balance: Money,
    #[serde(default)]
    pub periodic_contribution: Money,
    /// Contribution and compounding frequency for every asset.
    pub frequency: Frequency,
    pub term_years: u32,
    pub assets: Vec<AssetSpec>,
    /// How often weights are restored to target.
    pub rebalance_frequency: Frequency,
}

/// Per-period snapshot: total plus one balance per asset, ordered as the
/// input assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalancePeriodRecord {
    pub period: u32,
    pub total_balance: Money,
    pub asset_balances: Vec<Money>,
}

/// Simulation summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceSummary {
    pub final_capital: Money,
    pub total_contributions: Money,
    pub total_gain: Money,
    pub return_pct: Pct,
    pub rebalance_frequency: Frequency,
    /// Contribution periods between weight restorations.
    pub rebalance_interval_periods: u32,
    pub asset_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceProjection {
    pub asset_names: Vec<String>,
    pub periods: Vec<RebalancePeriodRecord>,
    pub summary: RebalanceSummary,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Simulate a multi-asset portfolio with periodic rebalancing and
/// proportional contribution allocation.
pub fn simulate_rebalancing(
    input: &RebalancingInput,
) -> ProjectionResult<ComputationOutput<RebalanceProjection>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    let periods_per_year = input.frequency.periods_per_year();
    let rebalance_per_year = input.rebalance_frequency.periods_per_year();
    let total_periods = input.term_years * periods_per_year;

    let interval = if rebalance_per_year > periods_per_year {
        warnings.push(format!(
            "Rebalance frequency {} is faster than contribution frequency {}; rebalancing every period",
            input.rebalance_frequency, input.frequency
        ));
        1
    } else {
        if periods_per_year % rebalance_per_year != 0 {
            warnings.push(format!(
                "Rebalance frequency {} does not divide contribution frequency {} evenly; rebalancing every {} period(s)",
                input.rebalance_frequency,
                input.frequency,
                periods_per_year / rebalance_per_year
            ));
        }
        periods_per_year / rebalance_per_year
    };

    let period_rates = input
        .assets
        .iter()
        .map(|asset| rates::periodic_rate(rate_from_pct(asset.annual_rate_pct), input.frequency))
        .collect::<ProjectionResult<Vec<_>>>()?;

    let mut values: Vec<Money> = input
        .assets
        .iter()
        .map(|asset| input.initial_balance * asset.target_weight)
        .collect();

    let mut periods = Vec::with_capacity(total_periods as usize);

    for period in 1..=total_periods {
        // (a) Restore target weights at rebalance boundaries.
        if interval == 1 || period % interval == 1 {
            let total: Money = values.iter().copied().sum();
            for (value, asset) in values.iter_mut().zip(&input.assets) {
                *value = total * asset.target_weight;
            }
        }

        // (b) Grow each asset at its own per-period rate.
        for (value, rate) in values.iter_mut().zip(&period_rates) {
            *value *= Decimal::ONE + rate;
        }

        // (c) Allocate the contribution by post-growth weight, so it follows
        // drift between rebalances.
        let post_growth_total: Money = values.iter().copied().sum();
        for (value, asset) in values.iter_mut().zip(&input.assets) {
            let weight = if post_growth_total > Decimal::ZERO {
                *value / post_growth_total
            } else {
                asset.target_weight
            };
            *value += input.periodic_contribution * weight;
        }

        let total_balance: Money = values.iter().copied().sum();
        periods.push(RebalancePeriodRecord {
            period,
            total_balance,
            asset_balances: values.clone(),
        });
    }

    let final_capital = periods
        .last()
        .map(|p| p.total_balance)
        .unwrap_or(input.initial_balance);
    let total_contributions =
        input.initial_balance + input.periodic_contribution * Decimal::from(total_periods);
    let total_gain = final_capital - total_contributions;
    let return_pct = if total_contributions > Decimal::ZERO {
        (total_gain / total_contributions * dec!(100)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    let summary = RebalanceSummary {
        final_capital: final_capital.round_dp(2),
        total_contributions: total_contributions.round_dp(2),
        total_gain: total_gain.round_dp(2),
        return_pct,
        rebalance_frequency: input.rebalance_frequency,
        rebalance_interval_periods: interval,
        asset_count: input.assets.len(),
    };

    let output = RebalanceProjection {
        asset_names: input.assets.iter().map(|a| a.name.clone()).collect(),
        periods,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rebalancing Simulation (periodic weight restoration with proportional contributions)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(input: &RebalancingInput) -> ProjectionResult<()> {
    if input.term_years < 1 {
        return Err(ProjectionError::InvalidTerm {
            reason: "term must be at least 1 year".into(),
        });
    }
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
    if input.assets.is_empty() {
        return Err(ProjectionError::InvalidStrategy {
            reason: "At least one asset is required".into(),
        });
    }
    for asset in &input.assets {
        if asset.target_weight < Decimal::ZERO || asset.target_weight > Decimal::ONE {
            return Err(ProjectionError::InvalidStrategy {
                reason: format!(
                    "Target weight for '{}' must be between 0 and 1",
                    asset.name
                ),
            });
        }
    }
    let weight_sum: Decimal = input.assets.iter().map(|a| a.target_weight).sum();
    if (weight_sum - Decimal::ONE).abs() > WEIGHT_EPSILON {
        return Err(ProjectionError::InvalidStrategy {
            reason: format!("Target weights must sum to 1 (got {weight_sum})"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
