//! Deterministic comparison of a personal strategy against named market
//! benchmarks over the same contribution plan.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::growth::portfolio::{simulate_growth, GrowthInput};
use crate::types::{with_metadata, ComputationOutput, Frequency, Money, Pct, TermSpec};
use crate::ProjectionResult;

/// Personal rates above this ceiling are clamped before simulation.
const RATE_CEILING_PCT: Decimal = dec!(50);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A named benchmark (e.g. a broad equity index or a bond aggregate).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkSpec {
    pub name: String,
    pub annual_rate_pct: Pct,
}

/// Input for the benchmark comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkInput {
    pub initial_balance: Money,
    #[serde(default)]
    pub periodic_contribution: Money,
    pub frequency: Frequency,
    pub term: TermSpec,
    /// Annual rate of the caller's own strategy, whole-number percentage.
    pub personal_rate_pct: Pct,
    pub benchmarks: Vec<BenchmarkSpec>,
}

/// One comparison row. The personal strategy is always the first row, with a
/// zero difference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkRow {
    pub name: String,
    pub final_capital: Money,
    pub annual_rate_pct: Pct,
    /// Personal final capital relative to this row's, as a percentage.
    pub difference_vs_personal_pct: Pct,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub rows: Vec<BenchmarkRow>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Grow the personal strategy and each benchmark under the same plan and
/// report final capital plus the personal-vs-benchmark difference.
pub fn compare_with_benchmarks(
    input: &BenchmarkInput,
) -> ProjectionResult<ComputationOutput<BenchmarkComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let personal_rate_pct = if input.personal_rate_pct > RATE_CEILING_PCT {
        warnings.push(format!(
            "Personal rate {}% clamped to the {}% policy ceiling",
            input.personal_rate_pct, RATE_CEILING_PCT
        ));
        RATE_CEILING_PCT
    } else {
        input.personal_rate_pct
    };

    let grow = |annual_rate_pct: Pct| -> ProjectionResult<Money> {
        let projection = simulate_growth(&GrowthInput {
            initial_balance: input.initial_balance,
            periodic_contribution: input.periodic_contribution,
            annual_rate_pct,
            frequency: input.frequency,
            term: input.term,
        })?;
        Ok(projection.result.summary.final_capital)
    };

    let personal_capital = grow(personal_rate_pct)?;

    let mut rows = Vec::with_capacity(input.benchmarks.len() + 1);
    rows.push(BenchmarkRow {
        name: "personal".into(),
        final_capital: personal_capital,
        annual_rate_pct: input.personal_rate_pct,
        difference_vs_personal_pct: Decimal::ZERO,
    });

    for benchmark in &input.benchmarks {
        let capital = grow(benchmark.annual_rate_pct)?;

        let difference = if capital > Decimal::ZERO {
            ((personal_capital - capital) / capital * dec!(100)).round_dp(2)
        } else {
            Decimal::ZERO
        };

        rows.push(BenchmarkRow {
            name: benchmark.name.clone(),
            final_capital: capital,
            annual_rate_pct: benchmark.annual_rate_pct,
            difference_vs_personal_pct: difference,
        });
    }

    let output = BenchmarkComparison { rows };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Benchmark Comparison (personal strategy vs market benchmarks)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
