//! Retirement scenario grid: cross product of candidate retirement ages and
//! annual rates, each cell carrying accumulated capital, tax on the gain,
//! net capital, and the resulting monthly payment.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ProjectionError;
use crate::growth::portfolio::{simulate_growth, GrowthInput};
use crate::retirement::annuity::monthly_annuity_payment;
use crate::types::{
    rate_from_pct, with_metadata, ComputationOutput, Frequency, Money, Pct, TaxRegime, TermSpec,
};
use crate::ProjectionResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for the scenario grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementGridInput {
    pub initial_balance: Money,
    #[serde(default)]
    pub periodic_contribution: Money,
    pub frequency: Frequency,
    pub current_age: u32,
    /// Candidate retirement ages; each must exceed the current age.
    pub retirement_ages: Vec<u32>,
    /// Candidate annual effective rates, whole-number percentages.
    pub annual_rates_pct: Vec<Pct>,
    pub tax_regime: TaxRegime,
    #[serde(default = "default_horizon")]
    pub horizon_years: u32,
}

fn default_horizon() -> u32 {
    25
}

/// One cell of the grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementScenarioRow {
    pub retirement_age: u32,
    pub annual_rate_pct: Pct,
    pub saving_years: u32,
    pub accumulated_capital: Money,
    pub tax: Money,
    pub net_capital: Money,
    pub monthly_payment: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementGrid {
    pub rows: Vec<RetirementScenarioRow>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Build the retirement scenario grid. Rows are ordered by retirement age,
/// then by rate, matching the input ordering.
pub fn retirement_grid(
    input: &RetirementGridInput,
) -> ProjectionResult<ComputationOutput<RetirementGrid>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    if input.annual_rates_pct.iter().any(|r| *r > dec!(50)) {
        warnings.push("One or more rates are above the 50% policy ceiling".into());
    }

    let tax_rate = input.tax_regime.rate();
    let mut rows =
        Vec::with_capacity(input.retirement_ages.len() * input.annual_rates_pct.len());

    for &retirement_age in &input.retirement_ages {
        let saving_years = retirement_age - input.current_age;

        for &annual_rate_pct in &input.annual_rates_pct {
            let growth = simulate_growth(&GrowthInput {
                initial_balance: input.initial_balance,
                periodic_contribution: input.periodic_contribution,
                annual_rate_pct,
                frequency: input.frequency,
                term: TermSpec::TargetAge {
                    current_age: input.current_age,
                    target_age: retirement_age,
                },
            })?;
            let summary = &growth.result.summary;

            let gain = summary.final_capital - summary.total_contributions;
            let tax = if gain > Decimal::ZERO {
                gain * tax_rate
            } else {
                Decimal::ZERO
            };
            let net_capital = summary.final_capital - tax;

            let monthly_payment = monthly_annuity_payment(
                net_capital,
                rate_from_pct(annual_rate_pct),
                input.horizon_years,
            )?;

            rows.push(RetirementScenarioRow {
                retirement_age,
                annual_rate_pct,
                saving_years,
                accumulated_capital: summary.final_capital,
                tax: tax.round_dp(2),
                net_capital: net_capital.round_dp(2),
                monthly_payment: monthly_payment.round_dp(2),
            });
        }
    }

    let output = RetirementGrid { rows };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Retirement Scenario Grid (ages x rates with taxed gains and annuitized payments)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(input: &RetirementGridInput) -> ProjectionResult<()> {
    if input.retirement_ages.is_empty() {
        return Err(ProjectionError::InvalidInput {
            field: "retirement_ages".into(),
            reason: "At least one retirement age is required".into(),
        });
    }
    if input.annual_rates_pct.is_empty() {
        return Err(ProjectionError::InvalidInput {
            field: "annual_rates_pct".into(),
            reason: "At least one rate is required".into(),
        });
    }
    if input.horizon_years < 1 {
        return Err(ProjectionError::InvalidHorizon {
            reason: "Horizon must be at least 1 year".into(),
        });
    }
    for &age in &input.retirement_ages {
        if age <= input.current_age {
            return Err(ProjectionError::InvalidTerm {
                reason: format!(
                    "retirement age {age} must be greater than current age {}",
                    input.current_age
                ),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn default_input() -> RetirementGridInput {
        RetirementGridInput {
            initial_balance: dec!(10_000),
            periodic_contribution: dec!(500),
            frequency: Frequency::Monthly,
            current_age: 30,
            retirement_ages: vec![60, 65],
            annual_rates_pct: vec![dec!(5), dec!(8)],
            tax_regime: TaxRegime::ForeignSource,
            horizon_years: 25,
        }
    }

    #[test]
    fn test_grid_dimensions_and_ordering() {
        let result = retirement_grid(&default_input()).unwrap();
        let rows = &result.result.rows;

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].retirement_age, 60);
        assert_eq!(rows[0].annual_rate_pct, dec!(5));
        assert_eq!(rows[1].annual_rate_pct, dec!(8));
        assert_eq!(rows[2].retirement_age, 65);
        assert_eq!(rows[0].saving_years, 30);
        assert_eq!(rows[2].saving_years, 35);
    }

    #[test]
    fn test_net_capital_below_gross_capital() {
        let result = retirement_grid(&default_input()).unwrap();
        for row in &result.result.rows {
            assert!(row.net_capital < row.accumulated_capital);
            assert!(row.tax > Decimal::ZERO);
            assert!(row.monthly_payment > Decimal::ZERO);
        }
    }

    #[test]
    fn test_later_retirement_accumulates_more() {
        let result = retirement_grid(&default_input()).unwrap();
        let rows = &result.result.rows;

        // Same rate, later age => larger capital.
        assert!(rows[2].accumulated_capital > rows[0].accumulated_capital);
    }

    #[test]
    fn test_retirement_age_not_after_current_rejected() {
        let mut input = default_input();
        input.retirement_ages = vec![30];
        assert!(matches!(
            retirement_grid(&input),
            Err(ProjectionError::InvalidTerm { .. })
        ));
    }

    #[test]
    fn test_empty_rates_rejected() {
        let mut input = default_input();
        input.annual_rates_pct.clear();
        assert!(retirement_grid(&input).is_err());
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let mut input = default_input();
        input.horizon_years = 0;
        assert!(matches!(
            retirement_grid(&input),
            Err(ProjectionError::InvalidHorizon { .. })
        ));
    }
}
