use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use nestegg_core::bonds::valuation::{value_bond, BondInput, BondStatus};
use nestegg_core::growth::portfolio::{simulate_growth, GrowthInput};
use nestegg_core::rates::{compound_factor, periodic_rate};
use nestegg_core::{Frequency, ProjectionError, TermSpec};

// ---------------------------------------------------------------------------
// Rate conversion properties
// ---------------------------------------------------------------------------

#[test]
fn test_periodic_rate_reproduces_annual_rate_for_all_frequencies() {
    let frequencies = [
        Frequency::Annual,
        Frequency::Semiannual,
        Frequency::FourMonth,
        Frequency::Quarterly,
        Frequency::Bimonthly,
        Frequency::Monthly,
    ];

    for &freq in &frequencies {
        let r = periodic_rate(dec!(0.12), freq).unwrap();
        let recompounded = compound_factor(r, freq.periods_per_year()) - Decimal::ONE;
        let diff = (recompounded - dec!(0.12)).abs();
        assert!(diff < dec!(0.000001), "{freq:?}: diff={diff}");
    }
}

// ---------------------------------------------------------------------------
// Bond valuation
// ---------------------------------------------------------------------------

#[test]
fn test_bond_par_case() {
    // face=1000, coupon=5% semiannual, yield=5%, 5 years => PV ~= face
    let result = value_bond(&BondInput {
        face_value: dec!(1000),
        coupon_rate_pct: dec!(5),
        frequency: Frequency::Semiannual,
        years_to_maturity: 5,
        required_yield_pct: dec!(5),
    })
    .unwrap();

    let summary = &result.result.summary;
    assert_eq!(summary.status, BondStatus::Par);
    assert!((summary.present_value_total - dec!(1000)).abs() < dec!(0.01));
}

#[test]
fn test_bond_annual_textbook_value() {
    // 10% annual coupon, 8% required yield, 3 years:
    // 100/1.08 + 100/1.08^2 + 1100/1.08^3 ~= 1051.54
    let result = value_bond(&BondInput {
        face_value: dec!(1000),
        coupon_rate_pct: dec!(10),
        frequency: Frequency::Annual,
        years_to_maturity: 3,
        required_yield_pct: dec!(8),
    })
    .unwrap();

    let summary = &result.result.summary;
    assert!(
        (summary.present_value_total - dec!(1051.54)).abs() < dec!(0.5),
        "pv={}",
        summary.present_value_total
    );
    assert_eq!(summary.status, BondStatus::Premium);
}

#[test]
fn test_bond_schedule_shape() {
    let result = value_bond(&BondInput {
        face_value: dec!(1000),
        coupon_rate_pct: dec!(6),
        frequency: Frequency::Quarterly,
        years_to_maturity: 4,
        required_yield_pct: dec!(7),
    })
    .unwrap();

    let flows = &result.result.cash_flows;
    // Exactly years * periods_per_year entries, contiguous from 1.
    assert_eq!(flows.len(), 16);
    for (i, cf) in flows.iter().enumerate() {
        assert_eq!(cf.period, i as u32 + 1);
    }

    // Only the final entry carries the principal.
    let coupon = flows[0].cash_flow;
    assert!(flows[..15].iter().all(|f| f.cash_flow == coupon));
    assert_eq!(flows[15].cash_flow, coupon + dec!(1000));
}

#[test]
fn test_bond_rejects_invalid_parameters() {
    let mut input = BondInput {
        face_value: dec!(-5),
        coupon_rate_pct: dec!(5),
        frequency: Frequency::Semiannual,
        years_to_maturity: 5,
        required_yield_pct: dec!(5),
    };
    assert!(matches!(
        value_bond(&input),
        Err(ProjectionError::InvalidBondParameters { .. })
    ));

    input.face_value = dec!(1000);
    input.years_to_maturity = 0;
    assert!(value_bond(&input).is_err());
}

// ---------------------------------------------------------------------------
// Growth invariants (spec-level, through the public API)
// ---------------------------------------------------------------------------

#[test]
fn test_growth_pure_compounding() {
    let result = simulate_growth(&GrowthInput {
        initial_balance: dec!(50_000),
        periodic_contribution: Decimal::ZERO,
        annual_rate_pct: dec!(6),
        frequency: Frequency::Quarterly,
        term: TermSpec::Years { years: 8 },
    })
    .unwrap();

    let r = periodic_rate(dec!(0.06), Frequency::Quarterly).unwrap();
    let expected = dec!(50_000) * compound_factor(r, 32);
    let diff = (result.result.summary.final_capital - expected).abs();
    assert!(diff < dec!(0.02), "diff={diff}");
}

#[test]
fn test_growth_contribution_accounting() {
    let result = simulate_growth(&GrowthInput {
        initial_balance: dec!(2_500),
        periodic_contribution: dec!(150),
        annual_rate_pct: dec!(5),
        frequency: Frequency::Bimonthly,
        term: TermSpec::Years { years: 12 },
    })
    .unwrap();

    // 12 years * 6 periods = 72 contributions on top of the opening balance.
    let expected = dec!(2_500) + dec!(150) * dec!(72);
    assert_eq!(result.result.summary.total_contributions, expected);
    assert_eq!(result.result.periods.len(), 72);
}
