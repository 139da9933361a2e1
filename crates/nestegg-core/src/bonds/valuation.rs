//! Fixed-coupon bond valuation: present value of the coupon/principal
//! schedule at a required yield, with premium/discount/par classification.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ProjectionError;
use crate::rates;
use crate::types::{rate_from_pct, with_metadata, ComputationOutput, Frequency, Money, Pct};
use crate::ProjectionResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Pricing tolerance for the Par classification. Exact floating equality
/// never triggers in practice.
const PAR_EPSILON: Decimal = dec!(0.01);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for bond valuation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondInput {
    /// Par / face value (typically 1000).
    pub face_value: Money,
    /// Annual coupon rate as a whole-number percentage.
    pub coupon_rate_pct: Pct,
    /// Coupon payment frequency.
    pub frequency: Frequency,
    pub years_to_maturity: u32,
    /// Required annual yield as a whole-number percentage.
    pub required_yield_pct: Pct,
}

/// One scheduled cash flow. Only the final period includes the principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondCashFlow {
    pub period: u32,
    pub cash_flow: Money,
    pub present_value: Money,
}

/// Pricing state relative to face value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BondStatus {
    Premium,
    Discount,
    Par,
}

/// Valuation summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondSummary {
    pub present_value_total: Money,
    pub face_value: Money,
    pub premium_or_discount: Money,
    pub status: BondStatus,
    pub coupon_rate_pct: Pct,
    pub required_yield_pct: Pct,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondValuation {
    pub cash_flows: Vec<BondCashFlow>,
    pub summary: BondSummary,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Value a bond by discounting its coupon/principal schedule at the
/// per-period rate equivalent to the required annual yield.
pub fn value_bond(input: &BondInput) -> ProjectionResult<ComputationOutput<BondValuation>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    validate(input)?;

    let periods_per_year = input.frequency.periods_per_year();
    let total_periods = input.years_to_maturity * periods_per_year;

    let coupon_rate = rate_from_pct(input.coupon_rate_pct);
    let required_yield = rate_from_pct(input.required_yield_pct);

    let period_coupon_rate = rates::periodic_rate(coupon_rate, input.frequency)?;
    let discount_rate = rates::periodic_rate(required_yield, input.frequency)?;

    let coupon = input.face_value * period_coupon_rate;
    let one_plus_d = Decimal::ONE + discount_rate;

    let mut cash_flows = Vec::with_capacity(total_periods as usize);
    let mut present_value_total = Decimal::ZERO;
    let mut discount = Decimal::ONE;

    for period in 1..=total_periods {
        discount *= one_plus_d;

        let cash_flow = if period == total_periods {
            coupon + input.face_value
        } else {
            coupon
        };
        let present_value = cash_flow / discount;
        present_value_total += present_value;

        cash_flows.push(BondCashFlow {
            period,
            cash_flow,
            present_value,
        });
    }

    let premium_or_discount = present_value_total - input.face_value;
    let status = if premium_or_discount.abs() < PAR_EPSILON {
        BondStatus::Par
    } else if premium_or_discount > Decimal::ZERO {
        BondStatus::Premium
    } else {
        BondStatus::Discount
    };

    let summary = BondSummary {
        present_value_total: present_value_total.round_dp(2),
        face_value: input.face_value,
        premium_or_discount: premium_or_discount.round_dp(2),
        status,
        coupon_rate_pct: input.coupon_rate_pct,
        required_yield_pct: input.required_yield_pct,
    };

    let output = BondValuation {
        cash_flows,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Bond Valuation (present value of coupon/principal schedule)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(input: &BondInput) -> ProjectionResult<()> {
    if input.face_value <= Decimal::ZERO {
        return Err(ProjectionError::InvalidBondParameters {
            field: "face_value".into(),
            reason: "Face value must be positive".into(),
        });
    }
    if input.years_to_maturity < 1 {
        return Err(ProjectionError::InvalidBondParameters {
            field: "years_to_maturity".into(),
            reason: "Maturity must be at least 1 year".into(),
        });
    }
    if input.coupon_rate_pct < Decimal::ZERO {
        return Err(ProjectionError::InvalidBondParameters {
            field: "coupon_rate_pct".into(),
            reason: "Coupon rate cannot be negative".into(),
        });
    }
    if input.required_yield_pct <= dec!(-100) {
        return Err(ProjectionError::InvalidBondParameters {
            field: "required_yield_pct".into(),
            reason: "Required yield must be greater than -100%".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
