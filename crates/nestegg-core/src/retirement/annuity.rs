//! Annuitization: convert an accumulated capital figure into a monthly
//! income stream under one of three withdrawal modes, net of tax.
//!
//! The capital comes from a prior growth simulation and is passed in
//! explicitly; calling without one is a `PrerequisiteMissing` error.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ProjectionError;
use crate::growth::portfolio::GrowthSummary;
use crate::rates;
use crate::types::{
    rate_from_pct, with_metadata, ComputationOutput, Frequency, Money, Pct, TaxRegime,
};
use crate::ProjectionResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How the accumulated capital is drawn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawalMode {
    /// Level monthly payment that exhausts the capital over the horizon.
    Annuity,
    /// The full capital paid out at once.
    LumpSum,
    /// Monthly income from distributed portfolio yield; capital is never drawn.
    DividendOnly,
}

/// Input parameters for annuitization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnuityInput {
    pub withdrawal_mode: WithdrawalMode,
    pub tax_regime: TaxRegime,
    /// Required for Annuity mode; ignored by the other modes.
    #[serde(default)]
    pub horizon_years: Option<u32>,
    /// Annual effective rate during retirement, whole-number percentage.
    /// Defaults to the growth simulation's rate.
    #[serde(default)]
    pub annual_rate_pct: Option<Pct>,
    /// Fraction of portfolio yield distributed as income under DividendOnly.
    #[serde(default = "default_dividend_distribution")]
    pub dividend_distribution: Decimal,
    /// Other monthly income added to the capital base.
    #[serde(default)]
    pub additional_monthly_income: Money,
    /// Monthly costs subtracted from the capital base.
    #[serde(default)]
    pub monthly_costs: Money,
}

fn default_dividend_distribution() -> Decimal {
    dec!(0.5)
}

/// Annuitization result. Recomputed on demand; nothing is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnuityResult {
    pub gross_periodic_payment: Money,
    pub tax_amount: Money,
    pub net_periodic_payment: Money,
    pub gross_annual: Money,
    pub net_annual: Money,
    pub withdrawal_mode: WithdrawalMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizon_years: Option<u32>,
    pub available_capital: Money,
    /// Total drawn over the horizon (Annuity), or the full capital otherwise.
    pub total_withdrawal: Money,
    pub tax_rate_pct: Pct,
}

// ---------------------------------------------------------------------------
// Payment formula
// ---------------------------------------------------------------------------

/// Level monthly payment that amortizes `capital` over `years` at the given
/// annual effective rate: `PMT = PV * r(1+r)^n / ((1+r)^n - 1)`, with the
/// zero-rate branch `PMT = PV / n`.
pub fn monthly_annuity_payment(
    capital: Money,
    annual_rate: Decimal,
    years: u32,
) -> ProjectionResult<Money> {
    if years < 1 {
        return Err(ProjectionError::InvalidHorizon {
            reason: "Payment horizon must be at least 1 year".into(),
        });
    }

    let monthly_rate = rates::periodic_rate(annual_rate, Frequency::Monthly)?;
    let n = years * 12;

    if monthly_rate.is_zero() {
        return Ok(capital / Decimal::from(n));
    }

    let factor = rates::compound_factor(monthly_rate, n);
    Ok(capital * (monthly_rate * factor) / (factor - Decimal::ONE))
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Derive a monthly income stream from an accumulated capital figure.
///
/// `growth` is the summary produced by the growth simulation; the dependency
/// is explicit rather than ambient, and its absence is an error.
pub fn annuitize(
    growth: Option<&GrowthSummary>,
    input: &AnnuityInput,
) -> ProjectionResult<ComputationOutput<AnnuityResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let growth = growth.ok_or_else(|| {
        ProjectionError::PrerequisiteMissing(
            "annuitization requires a portfolio growth summary; run the growth simulation first"
                .into(),
        )
    })?;

    validate(input)?;

    let capital = growth.final_capital;
    let annual_rate_pct = input.annual_rate_pct.unwrap_or(growth.nominal_rate_pct);
    let annual_rate = rate_from_pct(annual_rate_pct);

    let available_capital =
        capital + input.additional_monthly_income - input.monthly_costs;
    if available_capital <= Decimal::ZERO {
        warnings.push("Available capital is not positive after income adjustments".into());
    }

    let gross = match input.withdrawal_mode {
        WithdrawalMode::Annuity => {
            let horizon = input.horizon_years.ok_or_else(|| {
                ProjectionError::InvalidHorizon {
                    reason: "Annuity mode requires horizon_years".into(),
                }
            })?;
            monthly_annuity_payment(available_capital, annual_rate, horizon)?
        }
        WithdrawalMode::LumpSum => available_capital,
        // Yield is always distributed on the raw accumulated capital.
        WithdrawalMode::DividendOnly => {
            capital * annual_rate * input.dividend_distribution / dec!(12)
        }
    };

    let tax_rate = input.tax_regime.rate();
    let gross_periodic_payment = gross.round_dp(2);
    let tax_amount = (gross_periodic_payment * tax_rate).round_dp(2);
    let net_periodic_payment = gross_periodic_payment - tax_amount;

    let total_withdrawal = match input.withdrawal_mode {
        WithdrawalMode::Annuity => {
            let horizon = input.horizon_years.unwrap_or(0);
            gross_periodic_payment * dec!(12) * Decimal::from(horizon)
        }
        WithdrawalMode::LumpSum | WithdrawalMode::DividendOnly => capital,
    };

    let result = AnnuityResult {
        gross_periodic_payment,
        tax_amount,
        net_periodic_payment,
        gross_annual: gross_periodic_payment * dec!(12),
        net_annual: net_periodic_payment * dec!(12),
        withdrawal_mode: input.withdrawal_mode,
        horizon_years: match input.withdrawal_mode {
            WithdrawalMode::Annuity => input.horizon_years,
            _ => None,
        },
        available_capital: available_capital.round_dp(2),
        total_withdrawal: total_withdrawal.round_dp(2),
        tax_rate_pct: input.tax_regime.rate_pct(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Annuitization (ordinary annuity / lump sum / dividend yield, net of tax)",
        input,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(input: &AnnuityInput) -> ProjectionResult<()> {
    if let Some(horizon) = input.horizon_years {
        if input.withdrawal_mode == WithdrawalMode::Annuity && horizon < 1 {
            return Err(ProjectionError::InvalidHorizon {
                reason: "Annuity horizon must be at least 1 year".into(),
            });
        }
    }
    if input.dividend_distribution < Decimal::ZERO || input.dividend_distribution > Decimal::ONE {
        return Err(ProjectionError::InvalidInput {
            field: "dividend_distribution".into(),
            reason: "Distribution fraction must be between 0 and 1".into(),
        });
    }
    if input.additional_monthly_income < Decimal::ZERO {
        return Err(ProjectionError::InvalidInput {
            field: "additional_monthly_income".into(),
            reason: "Additional income cannot be negative".into(),
        });
    }
    if input.monthly_costs < Decimal::ZERO {
        return Err(ProjectionError::InvalidInput {
            field: "monthly_costs".into(),
            reason: "Monthly costs cannot be negative".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn growth_summary(final_capital: Decimal, rate_pct: Decimal) -> GrowthSummary {
        GrowthSummary {
            final_capital,
            total_contributions: dec!(200_000),
            gross_gain: final_capital - dec!(200_000),
            return_pct: dec!(100),
            term_years: 20,
            periods_per_year: 12,
            nominal_rate_pct: rate_pct,
            effective_period_rate_pct: dec!(0.6434),
            target_age: None,
        }
    }

    fn annuity_input() -> AnnuityInput {
        AnnuityInput {
            withdrawal_mode: WithdrawalMode::Annuity,
            tax_regime: TaxRegime::ForeignSource,
            horizon_years: Some(25),
            annual_rate_pct: Some(dec!(5)),
            dividend_distribution: dec!(0.5),
            additional_monthly_income: Decimal::ZERO,
            monthly_costs: Decimal::ZERO,
        }
    }

    #[test]
    fn test_missing_growth_summary_is_prerequisite_error() {
        let err = annuitize(None, &annuity_input()).unwrap_err();
        assert!(matches!(err, ProjectionError::PrerequisiteMissing(_)));
    }

    #[test]
    fn test_zero_rate_payment_is_capital_over_months() {
        let payment = monthly_annuity_payment(dec!(120_000), Decimal::ZERO, 10).unwrap();
        assert_eq!(payment, dec!(1000));
    }

    #[test]
    fn test_annuity_payment_known_value() {
        // 1,000,000 at 5% effective over 25 years: monthly rate ~0.4074%,
        // payment ~5780 per month.
        let payment = monthly_annuity_payment(dec!(1_000_000), dec!(0.05), 25).unwrap();
        assert!(
            payment > dec!(5700) && payment < dec!(5900),
            "payment={payment}"
        );
    }

    #[test]
    fn test_annuity_mode_net_below_gross() {
        let growth = growth_summary(dec!(1_000_000), dec!(8));
        let result = annuitize(Some(&growth), &annuity_input()).unwrap();
        let r = &result.result;

        assert!(r.net_periodic_payment < r.gross_periodic_payment);
        assert_eq!(r.gross_annual, r.gross_periodic_payment * dec!(12));
        assert_eq!(r.net_annual, r.net_periodic_payment * dec!(12));
        assert_eq!(
            r.net_periodic_payment,
            r.gross_periodic_payment - r.tax_amount
        );
    }

    #[test]
    fn test_annuity_mode_requires_horizon() {
        let growth = growth_summary(dec!(500_000), dec!(8));
        let mut input = annuity_input();
        input.horizon_years = None;

        let err = annuitize(Some(&growth), &input).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidHorizon { .. }));
    }

    #[test]
    fn test_annuity_mode_rejects_zero_horizon() {
        let growth = growth_summary(dec!(500_000), dec!(8));
        let mut input = annuity_input();
        input.horizon_years = Some(0);

        assert!(annuitize(Some(&growth), &input).is_err());
    }

    #[test]
    fn test_lump_sum_pays_full_capital() {
        let growth = growth_summary(dec!(750_000), dec!(8));
        let mut input = annuity_input();
        input.withdrawal_mode = WithdrawalMode::LumpSum;
        input.horizon_years = None;

        let result = annuitize(Some(&growth), &input).unwrap();
        let r = &result.result;

        assert_eq!(r.gross_periodic_payment, dec!(750_000));
        assert_eq!(r.total_withdrawal, dec!(750_000));
        assert_eq!(r.horizon_years, None);
    }

    #[test]
    fn test_dividend_only_yields_half_the_rate() {
        // 600,000 at 8% with 50% distribution: 600_000 * 0.08 * 0.5 / 12 = 2000/month
        let growth = growth_summary(dec!(600_000), dec!(8));
        let mut input = annuity_input();
        input.withdrawal_mode = WithdrawalMode::DividendOnly;
        input.annual_rate_pct = None; // reuse the growth rate

        let result = annuitize(Some(&growth), &input).unwrap();
        assert_eq!(result.result.gross_periodic_payment, dec!(2000));
        // Capital is never drawn down.
        assert_eq!(result.result.total_withdrawal, dec!(600_000));
    }

    #[test]
    fn test_tax_bands() {
        let growth = growth_summary(dec!(600_000), dec!(8));
        let mut input = annuity_input();
        input.withdrawal_mode = WithdrawalMode::DividendOnly;
        input.annual_rate_pct = None;

        input.tax_regime = TaxRegime::LocalExchange;
        let local = annuitize(Some(&growth), &input).unwrap();
        assert_eq!(local.result.tax_amount, dec!(100)); // 5% of 2000

        input.tax_regime = TaxRegime::ForeignSource;
        let foreign = annuitize(Some(&growth), &input).unwrap();
        assert_eq!(foreign.result.tax_amount, dec!(590)); // 29.5% of 2000
    }

    #[test]
    fn test_income_adjustments_shift_annuity_base() {
        let growth = growth_summary(dec!(500_000), dec!(8));

        let mut with_costs = annuity_input();
        with_costs.monthly_costs = dec!(100_000);

        let base = annuitize(Some(&growth), &annuity_input()).unwrap();
        let adjusted = annuitize(Some(&growth), &with_costs).unwrap();

        assert!(
            adjusted.result.gross_periodic_payment < base.result.gross_periodic_payment
        );
        assert_eq!(adjusted.result.available_capital, dec!(400_000));
    }

    #[test]
    fn test_total_withdrawal_under_annuity() {
        let growth = growth_summary(dec!(1_000_000), dec!(8));
        let result = annuitize(Some(&growth), &annuity_input()).unwrap();
        let r = &result.result;

        assert_eq!(
            r.total_withdrawal,
            r.gross_periodic_payment * dec!(12) * dec!(25)
        );
    }

    #[test]
    fn test_invalid_distribution_rejected() {
        let growth = growth_summary(dec!(500_000), dec!(8));
        let mut input = annuity_input();
        input.dividend_distribution = dec!(1.5);

        assert!(annuitize(Some(&growth), &input).is_err());
    }
}
