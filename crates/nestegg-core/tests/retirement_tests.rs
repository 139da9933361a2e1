use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use nestegg_core::growth::portfolio::{simulate_growth, GrowthInput};
use nestegg_core::retirement::annuity::{
    annuitize, monthly_annuity_payment, AnnuityInput, WithdrawalMode,
};
use nestegg_core::retirement::scenarios::{retirement_grid, RetirementGridInput};
use nestegg_core::{Frequency, ProjectionError, TaxRegime, TermSpec};

// ===========================================================================
// Growth -> annuity pipeline. The annuity stage takes the growth summary as
// an explicit parameter; there is no ambient state between the two.
// ===========================================================================

fn thirty_five_year_plan() -> GrowthInput {
    GrowthInput {
        initial_balance: Decimal::ZERO,
        periodic_contribution: dec!(500),
        annual_rate_pct: dec!(8),
        frequency: Frequency::Monthly,
        term: TermSpec::Years { years: 35 },
    }
}

#[test]
fn test_growth_then_annuity_end_to_end() {
    let growth = simulate_growth(&thirty_five_year_plan()).unwrap();
    let summary = &growth.result.summary;

    // 500/month at 8% for 35 years accumulates over a million.
    assert!(summary.final_capital > dec!(1_000_000));

    let annuity = annuitize(
        Some(summary),
        &AnnuityInput {
            withdrawal_mode: WithdrawalMode::Annuity,
            tax_regime: TaxRegime::ForeignSource,
            horizon_years: Some(25),
            annual_rate_pct: Some(dec!(5)),
            dividend_distribution: dec!(0.5),
            additional_monthly_income: Decimal::ZERO,
            monthly_costs: Decimal::ZERO,
        },
    )
    .unwrap();
    let r = &annuity.result;

    assert!(r.net_periodic_payment < r.gross_periodic_payment);
    assert!(r.net_periodic_payment > Decimal::ZERO);
    assert_eq!(r.gross_annual, r.gross_periodic_payment * dec!(12));
    assert_eq!(r.tax_rate_pct, dec!(29.5));
}

#[test]
fn test_annuity_without_growth_summary_fails_loudly() {
    let err = annuitize(
        None,
        &AnnuityInput {
            withdrawal_mode: WithdrawalMode::LumpSum,
            tax_regime: TaxRegime::LocalExchange,
            horizon_years: None,
            annual_rate_pct: None,
            dividend_distribution: dec!(0.5),
            additional_monthly_income: Decimal::ZERO,
            monthly_costs: Decimal::ZERO,
        },
    )
    .unwrap_err();

    assert!(matches!(err, ProjectionError::PrerequisiteMissing(_)));
}

#[test]
fn test_zero_rate_annuity_divides_capital_evenly() {
    // 240,000 over 20 years at 0%: exactly 1,000 per month.
    let payment = monthly_annuity_payment(dec!(240_000), Decimal::ZERO, 20).unwrap();
    assert_eq!(payment, dec!(1000));
}

#[test]
fn test_dividend_mode_never_draws_capital() {
    let growth = simulate_growth(&thirty_five_year_plan()).unwrap();
    let summary = &growth.result.summary;

    let annuity = annuitize(
        Some(summary),
        &AnnuityInput {
            withdrawal_mode: WithdrawalMode::DividendOnly,
            tax_regime: TaxRegime::LocalExchange,
            horizon_years: None,
            annual_rate_pct: None,
            dividend_distribution: dec!(0.5),
            additional_monthly_income: Decimal::ZERO,
            monthly_costs: Decimal::ZERO,
        },
    )
    .unwrap();

    // Total withdrawal reports the intact capital.
    assert_eq!(annuity.result.total_withdrawal, summary.final_capital);
}

// ===========================================================================
// Scenario grid consistency against manual composition
// ===========================================================================

#[test]
fn test_grid_cell_matches_manual_composition() {
    let input = RetirementGridInput {
        initial_balance: dec!(20_000),
        periodic_contribution: dec!(400),
        frequency: Frequency::Monthly,
        current_age: 35,
        retirement_ages: vec![65],
        annual_rates_pct: vec![dec!(6)],
        tax_regime: TaxRegime::LocalExchange,
        horizon_years: 20,
    };

    let grid = retirement_grid(&input).unwrap();
    let row = &grid.result.rows[0];

    // Recompute the single cell by hand through the public calculators.
    let growth = simulate_growth(&GrowthInput {
        initial_balance: dec!(20_000),
        periodic_contribution: dec!(400),
        annual_rate_pct: dec!(6),
        frequency: Frequency::Monthly,
        term: TermSpec::Years { years: 30 },
    })
    .unwrap();
    let summary = &growth.result.summary;

    let gain = summary.final_capital - summary.total_contributions;
    let tax = gain * TaxRegime::LocalExchange.rate();
    let net = summary.final_capital - tax;
    let payment = monthly_annuity_payment(net, dec!(0.06), 20).unwrap();

    assert_eq!(row.accumulated_capital, summary.final_capital);
    assert_eq!(row.tax, tax.round_dp(2));
    assert_eq!(row.net_capital, net.round_dp(2));
    assert_eq!(row.monthly_payment, payment.round_dp(2));
    assert_eq!(row.saving_years, 30);
}

#[test]
fn test_grid_higher_rate_pays_more() {
    let input = RetirementGridInput {
        initial_balance: dec!(10_000),
        periodic_contribution: dec!(300),
        frequency: Frequency::Monthly,
        current_age: 30,
        retirement_ages: vec![65],
        annual_rates_pct: vec![dec!(4), dec!(8)],
        tax_regime: TaxRegime::ForeignSource,
        horizon_years: 25,
    };

    let grid = retirement_grid(&input).unwrap();
    let rows = &grid.result.rows;
    assert!(rows[1].monthly_payment > rows[0].monthly_payment);
}
