use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProjectionError;
use crate::ProjectionResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Rates crossing the API boundary, expressed as whole-number percentages
/// (5.0 = 5%). Divided by 100 exactly once, inside the calculator.
pub type Pct = Decimal;

/// Convert a boundary percentage into an internal rate.
pub fn rate_from_pct(pct: Pct) -> Rate {
    pct / dec!(100)
}

/// Compounding / contribution frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Annual,
    Semiannual,
    FourMonth,
    Quarterly,
    Bimonthly,
    Monthly,
}

impl Frequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::Semiannual => 2,
            Frequency::FourMonth => 3,
            Frequency::Quarterly => 4,
            Frequency::Bimonthly => 6,
            Frequency::Monthly => 12,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Frequency::Annual => "Annual",
            Frequency::Semiannual => "Semiannual",
            Frequency::FourMonth => "FourMonth",
            Frequency::Quarterly => "Quarterly",
            Frequency::Bimonthly => "Bimonthly",
            Frequency::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Frequency {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "annual" => Ok(Frequency::Annual),
            "semiannual" => Ok(Frequency::Semiannual),
            "fourmonth" | "four-month" => Ok(Frequency::FourMonth),
            "quarterly" => Ok(Frequency::Quarterly),
            "bimonthly" => Ok(Frequency::Bimonthly),
            "monthly" => Ok(Frequency::Monthly),
            _ => Err(ProjectionError::InvalidFrequency {
                label: s.to_string(),
            }),
        }
    }
}

/// Tax regime applied to retirement income. Closed set; an unknown label is
/// a deserialization error, never a guessed rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxRegime {
    /// Local exchange gains, taxed at 5%.
    LocalExchange,
    /// Foreign-source gains, taxed at 29.5%.
    ForeignSource,
}

impl TaxRegime {
    pub fn rate(self) -> Rate {
        match self {
            TaxRegime::LocalExchange => dec!(0.05),
            TaxRegime::ForeignSource => dec!(0.295),
        }
    }

    pub fn rate_pct(self) -> Pct {
        self.rate() * dec!(100)
    }
}

impl FromStr for TaxRegime {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local_exchange" | "local-exchange" => Ok(TaxRegime::LocalExchange),
            "foreign_source" | "foreign-source" => Ok(TaxRegime::ForeignSource),
            _ => Err(ProjectionError::InvalidInput {
                field: "tax_regime".into(),
                reason: format!("Unrecognized tax regime: {s}"),
            }),
        }
    }
}

/// Savings term, either stated directly in years or derived from an age pair.
/// Both forms resolve to the same number of whole years.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TermSpec {
    Years { years: u32 },
    TargetAge { current_age: u32, target_age: u32 },
}

impl TermSpec {
    /// Resolve to a term in whole years. Fails for spans shorter than one year.
    pub fn resolve(&self) -> ProjectionResult<u32> {
        let years = match *self {
            TermSpec::Years { years } => years,
            TermSpec::TargetAge {
                current_age,
                target_age,
            } => {
                if target_age <= current_age {
                    return Err(ProjectionError::InvalidTerm {
                        reason: format!(
                            "target_age ({target_age}) must be greater than current_age ({current_age})"
                        ),
                    });
                }
                target_age - current_age
            }
        };
        if years < 1 {
            return Err(ProjectionError::InvalidTerm {
                reason: "term must be at least 1 year".into(),
            });
        }
        Ok(years)
    }

    /// The target age this term implies, if it was stated as one.
    pub fn target_age(&self) -> Option<u32> {
        match *self {
            TermSpec::Years { .. } => None,
            TermSpec::TargetAge { target_age, .. } => Some(target_age),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap Decimal-precision computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    wrap(methodology, assumptions, warnings, elapsed_us, result, "rust_decimal_128bit")
}

/// Same envelope for the stochastic modules, which work in f64.
pub fn with_metadata_f64<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    wrap(methodology, assumptions, warnings, elapsed_us, result, "ieee754_f64")
}

fn wrap<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
    precision: &str,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: precision.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_periods_per_year() {
        assert_eq!(Frequency::Annual.periods_per_year(), 1);
        assert_eq!(Frequency::Semiannual.periods_per_year(), 2);
        assert_eq!(Frequency::FourMonth.periods_per_year(), 3);
        assert_eq!(Frequency::Quarterly.periods_per_year(), 4);
        assert_eq!(Frequency::Bimonthly.periods_per_year(), 6);
        assert_eq!(Frequency::Monthly.periods_per_year(), 12);
    }

    #[test]
    fn test_frequency_parse_known_labels() {
        assert_eq!("Monthly".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert_eq!(
            "four-month".parse::<Frequency>().unwrap(),
            Frequency::FourMonth
        );
    }

    #[test]
    fn test_frequency_parse_unknown_label_fails() {
        let err = "Weekly".parse::<Frequency>().unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidFrequency { .. }));
    }

    #[test]
    fn test_tax_regime_rates() {
        assert_eq!(TaxRegime::LocalExchange.rate(), dec!(0.05));
        assert_eq!(TaxRegime::ForeignSource.rate(), dec!(0.295));
    }

    #[test]
    fn test_term_spec_years() {
        let term = TermSpec::Years { years: 10 };
        assert_eq!(term.resolve().unwrap(), 10);
        assert_eq!(term.target_age(), None);
    }

    #[test]
    fn test_term_spec_target_age() {
        let term = TermSpec::TargetAge {
            current_age: 30,
            target_age: 65,
        };
        assert_eq!(term.resolve().unwrap(), 35);
        assert_eq!(term.target_age(), Some(65));
    }

    #[test]
    fn test_term_spec_rejects_inverted_ages() {
        let term = TermSpec::TargetAge {
            current_age: 65,
            target_age: 60,
        };
        assert!(matches!(
            term.resolve(),
            Err(ProjectionError::InvalidTerm { .. })
        ));
    }

    #[test]
    fn test_term_spec_rejects_zero_years() {
        let term = TermSpec::Years { years: 0 };
        assert!(term.resolve().is_err());
    }
}
