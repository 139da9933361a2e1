use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Growth
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_growth(input_json: String) -> NapiResult<String> {
    let input: nestegg_core::growth::portfolio::GrowthInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        nestegg_core::growth::portfolio::simulate_growth(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_inflation_growth(input_json: String) -> NapiResult<String> {
    let input: nestegg_core::growth::inflation::InflationGrowthInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = nestegg_core::growth::inflation::simulate_inflation_adjusted(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Bonds
// ---------------------------------------------------------------------------

#[napi]
pub fn value_bond(input_json: String) -> NapiResult<String> {
    let input: nestegg_core::bonds::valuation::BondInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = nestegg_core::bonds::valuation::value_bond(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Retirement
// ---------------------------------------------------------------------------

/// Annuitize a prior growth summary. The summary is a separate argument so
/// the host application composes the two stages explicitly; passing null
/// surfaces the prerequisite error.
#[napi]
pub fn annuitize(growth_summary_json: Option<String>, input_json: String) -> NapiResult<String> {
    let summary: Option<nestegg_core::growth::portfolio::GrowthSummary> =
        match growth_summary_json {
            Some(json) => Some(serde_json::from_str(&json).map_err(to_napi_error)?),
            None => None,
        };
    let input: nestegg_core::retirement::annuity::AnnuityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = nestegg_core::retirement::annuity::annuitize(summary.as_ref(), &input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn retirement_grid(input_json: String) -> NapiResult<String> {
    let input: nestegg_core::retirement::scenarios::RetirementGridInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = nestegg_core::retirement::scenarios::retirement_grid(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_strategies(input_json: String) -> NapiResult<String> {
    let input: nestegg_core::strategy::comparison::StrategyComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = nestegg_core::strategy::comparison::compare_strategies(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_with_benchmarks(input_json: String) -> NapiResult<String> {
    let input: nestegg_core::strategy::benchmark::BenchmarkInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = nestegg_core::strategy::benchmark::compare_with_benchmarks(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_rebalancing(input_json: String) -> NapiResult<String> {
    let input: nestegg_core::strategy::rebalancing::RebalancingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = nestegg_core::strategy::rebalancing::simulate_rebalancing(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
