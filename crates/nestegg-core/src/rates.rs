use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::ProjectionError;
use crate::types::{Frequency, Rate};
use crate::ProjectionResult;

/// Convert an annual effective rate into the equivalent per-period rate for
/// the given compounding frequency: `(1 + annual)^(1/m) - 1`.
///
/// Valid for any rate above -100%. Compounding the result `m` times
/// reproduces the annual rate.
pub fn periodic_rate(annual_effective: Rate, frequency: Frequency) -> ProjectionResult<Rate> {
    if annual_effective <= dec!(-1) {
        return Err(ProjectionError::InvalidInput {
            field: "annual_effective".into(),
            reason: "Rate must be greater than -100%".into(),
        });
    }

    let m = frequency.periods_per_year();
    if m == 1 || annual_effective.is_zero() {
        return Ok(annual_effective);
    }

    let base = Decimal::ONE + annual_effective;
    let exponent = Decimal::ONE / Decimal::from(m);
    Ok(base.powd(exponent) - Decimal::ONE)
}

/// Compute (1 + rate)^n via iterative multiplication (avoids Decimal::powd drift).
pub fn compound_factor(rate: Rate, periods: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..periods {
        result *= factor;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TOLERANCE: Decimal = dec!(0.000001);

    #[test]
    fn test_periodic_rate_monthly_known_value() {
        // (1.08)^(1/12) - 1 ~= 0.006434
        let r = periodic_rate(dec!(0.08), Frequency::Monthly).unwrap();
        assert!((r - dec!(0.0064340)).abs() < dec!(0.00001), "r={}", r);
    }

    #[test]
    fn test_periodic_rate_annual_is_identity() {
        let r = periodic_rate(dec!(0.08), Frequency::Annual).unwrap();
        assert_eq!(r, dec!(0.08));
    }

    #[test]
    fn test_periodic_rate_round_trip_all_frequencies() {
        // Compounding the per-period rate m times must reproduce the annual rate.
        let annual_rates = [dec!(0.0), dec!(0.03), dec!(0.08), dec!(0.15), dec!(0.50)];
        let frequencies = [
            Frequency::Annual,
            Frequency::Semiannual,
            Frequency::FourMonth,
            Frequency::Quarterly,
            Frequency::Bimonthly,
            Frequency::Monthly,
        ];

        for &annual in &annual_rates {
            for &freq in &frequencies {
                let r = periodic_rate(annual, freq).unwrap();
                let recompounded = compound_factor(r, freq.periods_per_year()) - Decimal::ONE;
                assert!(
                    (recompounded - annual).abs() < TOLERANCE,
                    "{freq:?} at {annual}: recompounded {recompounded}"
                );
            }
        }
    }

    #[test]
    fn test_periodic_rate_zero_rate() {
        let r = periodic_rate(Decimal::ZERO, Frequency::Monthly).unwrap();
        assert!(r.abs() < TOLERANCE);
    }

    #[test]
    fn test_periodic_rate_rejects_rate_at_or_below_minus_one() {
        assert!(periodic_rate(dec!(-1), Frequency::Monthly).is_err());
        assert!(periodic_rate(dec!(-1.5), Frequency::Quarterly).is_err());
    }

    #[test]
    fn test_compound_factor_basic() {
        // 1.1^3 = 1.331
        assert_eq!(compound_factor(dec!(0.10), 3), dec!(1.331));
    }

    #[test]
    fn test_compound_factor_zero_periods() {
        assert_eq!(compound_factor(dec!(0.10), 0), Decimal::ONE);
    }
}
