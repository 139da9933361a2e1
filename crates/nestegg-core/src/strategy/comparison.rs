//! Stochastic strategy comparison: repeated growth-simulation trials per
//! candidate strategy under a normally perturbed annual rate, aggregated
//! into distributional statistics.
//!
//! Results are reproducible only when a seed is supplied; an unseeded run
//! deliberately models uncertainty. Trials fan out across worker threads
//! with per-trial derived seeds, so a seeded run is deterministic regardless
//! of scheduling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;
use std::time::Instant;

use crate::error::ProjectionError;
use crate::growth::portfolio::{simulate_growth, GrowthInput};
use crate::types::{with_metadata_f64, ComputationOutput, Frequency, TermSpec};
use crate::ProjectionResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One candidate strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategySpec {
    pub name: String,
    /// Expected annual effective rate, whole-number percentage.
    pub expected_rate_pct: f64,
    /// Standard deviation of the per-trial rate perturbation
    /// (`rate = expected * (1 + Normal(0, volatility))`). Zero disables it.
    #[serde(default)]
    pub volatility: f64,
}

/// Input for the strategy comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyComparisonInput {
    pub initial_balance: f64,
    #[serde(default)]
    pub periodic_contribution: f64,
    pub frequency: Frequency,
    pub term_years: u32,
    pub strategies: Vec<StrategySpec>,
    #[serde(default = "default_trials")]
    pub trials_per_strategy: u32,
    /// Seed for reproducible runs. None draws from entropy.
    pub seed: Option<u64>,
}

fn default_trials() -> u32 {
    50
}

/// Distributional statistics for one strategy. Individual trials are not
/// retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyTrialStats {
    pub name: String,
    pub expected_rate_pct: f64,
    pub volatility: f64,
    /// Trials that completed; failed trials are skipped, not retried.
    pub trials_used: u32,
    pub mean_final_capital: f64,
    pub min_final_capital: f64,
    pub max_final_capital: f64,
    pub std_dev: f64,
    pub percentile_10: f64,
    pub percentile_90: f64,
    /// Simplified risk-adjusted score: (mean - initial) / std, 0 when std is 0.
    pub sharpe_ratio: f64,
    /// Share of trials ending above 80% of the strategy mean.
    pub success_probability_pct: f64,
    /// Realized volatility: std / mean, as a percentage.
    pub realized_volatility_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub strategies: Vec<StrategyTrialStats>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Compare candidate strategies over repeated randomized growth trials.
///
/// A strategy whose trials all fail is omitted from the result set and
/// reported through `warnings` rather than failing the comparison.
pub fn compare_strategies(
    input: &StrategyComparisonInput,
) -> ProjectionResult<ComputationOutput<StrategyComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    let initial = Decimal::from_f64(input.initial_balance).ok_or_else(|| {
        ProjectionError::InvalidInput {
            field: "initial_balance".into(),
            reason: "Not a finite number".into(),
        }
    })?;
    let contribution = Decimal::from_f64(input.periodic_contribution).ok_or_else(|| {
        ProjectionError::InvalidInput {
            field: "periodic_contribution".into(),
            reason: "Not a finite number".into(),
        }
    })?;

    let mut stats = Vec::with_capacity(input.strategies.len());

    for (strategy_idx, strategy) in input.strategies.iter().enumerate() {
        let perturbation = if strategy.volatility > 0.0 {
            let normal = Normal::new(0.0, strategy.volatility).map_err(|e| {
                ProjectionError::InvalidStrategy {
                    reason: format!("Invalid volatility for '{}': {e}", strategy.name),
                }
            })?;
            Some(normal)
        } else {
            None
        };

        let mut samples: Vec<f64> = (0..input.trials_per_strategy)
            .into_par_iter()
            .filter_map(|trial| {
                let noise = match perturbation {
                    Some(normal) => {
                        let mut rng = match input.seed {
                            Some(s) => StdRng::seed_from_u64(derive_seed(s, strategy_idx, trial)),
                            None => StdRng::from_entropy(),
                        };
                        rng.sample(normal)
                    }
                    None => 0.0,
                };
                let rate_pct = strategy.expected_rate_pct * (1.0 + noise);
                run_trial(initial, contribution, input.frequency, input.term_years, rate_pct)
            })
            .collect();

        if samples.is_empty() {
            warnings.push(format!(
                "Strategy '{}' produced no successful trials and was omitted",
                strategy.name
            ));
            continue;
        }

        let skipped = input.trials_per_strategy as usize - samples.len();
        if skipped > 0 {
            warnings.push(format!(
                "Strategy '{}': {skipped} trial(s) failed and were skipped",
                strategy.name
            ));
        }

        stats.push(aggregate(strategy, &mut samples, input.initial_balance));
    }

    let output = StrategyComparison { strategies: stats };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata_f64(
        "Strategy Comparison (randomized rate trials with distributional statistics)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Trial execution
// ---------------------------------------------------------------------------

/// Mix a per-trial seed so parallel workers never share a stream.
fn derive_seed(master: u64, strategy_idx: usize, trial: u32) -> u64 {
    master ^ ((strategy_idx as u64) << 32).wrapping_add(trial as u64 + 1)
}

/// Run one growth trial at the sampled rate. Returns None when the sampled
/// rate is outside the simulator's domain; the trial is simply skipped.
fn run_trial(
    initial: Decimal,
    contribution: Decimal,
    frequency: Frequency,
    term_years: u32,
    rate_pct: f64,
) -> Option<f64> {
    let annual_rate_pct = Decimal::from_f64(rate_pct)?;
    let growth = simulate_growth(&GrowthInput {
        initial_balance: initial,
        periodic_contribution: contribution,
        annual_rate_pct,
        frequency,
        term: TermSpec::Years { years: term_years },
    })
    .ok()?;
    growth.result.summary.final_capital.to_f64()
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Compute the percentile value from a **sorted** slice using linear
/// interpolation.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let frac = rank - lower as f64;
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

fn aggregate(
    strategy: &StrategySpec,
    samples: &mut [f64],
    initial_balance: f64,
) -> StrategyTrialStats {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = samples.len() as f64;

    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    let sharpe_ratio = if std_dev > f64::EPSILON {
        (mean - initial_balance) / std_dev
    } else {
        0.0
    };

    let success_threshold = mean * 0.8;
    let successes = samples.iter().filter(|&&v| v > success_threshold).count();

    let realized_volatility_pct = if mean > f64::EPSILON {
        std_dev / mean * 100.0
    } else {
        0.0
    };

    StrategyTrialStats {
        name: strategy.name.clone(),
        expected_rate_pct: strategy.expected_rate_pct,
        volatility: strategy.volatility,
        trials_used: samples.len() as u32,
        mean_final_capital: mean,
        min_final_capital: samples[0],
        max_final_capital: samples[samples.len() - 1],
        std_dev,
        percentile_10: percentile_sorted(samples, 10.0),
        percentile_90: percentile_sorted(samples, 90.0),
        sharpe_ratio,
        success_probability_pct: successes as f64 / n * 100.0,
        realized_volatility_pct,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(input: &StrategyComparisonInput) -> ProjectionResult<()> {
    if input.strategies.is_empty() {
        return Err(ProjectionError::InvalidInput {
            field: "strategies".into(),
            reason: "At least one strategy is required".into(),
        });
    }
    if input.trials_per_strategy < 1 {
        return Err(ProjectionError::InvalidInput {
            field: "trials_per_strategy".into(),
            reason: "At least one trial is required".into(),
        });
    }
    if input.term_years < 1 {
        return Err(ProjectionError::InvalidTerm {
            reason: "term must be at least 1 year".into(),
        });
    }
    if input.initial_balance < 0.0 || !input.initial_balance.is_finite() {
        return Err(ProjectionError::InvalidInput {
            field: "initial_balance".into(),
            reason: "Initial balance must be finite and non-negative".into(),
        });
    }
    if input.periodic_contribution < 0.0 || !input.periodic_contribution.is_finite() {
        return Err(ProjectionError::InvalidInput {
            field: "periodic_contribution".into(),
            reason: "Contribution must be finite and non-negative".into(),
        });
    }
    for s in &input.strategies {
        if s.volatility < 0.0 || !s.volatility.is_finite() {
            return Err(ProjectionError::InvalidStrategy {
                reason: format!("Volatility for '{}' must be finite and non-negative", s.name),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
