use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;

use mortgage_core::EngineConfig;

static CONFIG: OnceLock<Result<EngineConfig, String>> = OnceLock::new();

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Engine configuration from `MTG_CONFIG`, read on first use.
fn config() -> NapiResult<&'static EngineConfig> {
    CONFIG
        .get_or_init(|| {
            let path = std::env::var_os("MTG_CONFIG").map(PathBuf::from);
            EngineConfig::load(path.as_deref()).map_err(|e| e.to_string())
        })
        .as_ref()
        .map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Payment
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_payment(input_json: String) -> NapiResult<String> {
    let input: mortgage_core::payment::MortgageInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_core::payment::calculate_payment(&input, &config()?.stress_test)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Affordability
// ---------------------------------------------------------------------------

#[napi]
pub fn max_mortgage(input_json: String) -> NapiResult<String> {
    let input: mortgage_core::affordability::AffordabilityInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        mortgage_core::affordability::calculate_max_mortgage(&input, &config()?.stress_test)
            .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn required_income(input_json: String) -> NapiResult<String> {
    let input: mortgage_core::affordability::RequiredIncomeInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        mortgage_core::affordability::calculate_required_income(&input, &config()?.stress_test)
            .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Land transfer tax
// ---------------------------------------------------------------------------

#[napi]
pub fn land_transfer_tax(input_json: String) -> NapiResult<String> {
    let input: mortgage_core::land_transfer::LandTransferInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        mortgage_core::land_transfer::calculate_land_transfer_tax(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Total monthly cost
// ---------------------------------------------------------------------------

#[napi]
pub fn total_monthly_cost(input_json: String) -> NapiResult<String> {
    let input: mortgage_core::monthly_cost::MonthlyCostInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        mortgage_core::monthly_cost::calculate_monthly_cost(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Stress test
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct QualifyingRate {
    contract_rate_percent: Decimal,
    stress_test_enabled: bool,
    qualifying_rate_percent: Decimal,
}

#[napi]
pub fn qualifying_rate(rate: String, enabled: bool) -> NapiResult<String> {
    let contract = Decimal::from_str(rate.trim()).map_err(to_napi_error)?;
    let qualifying = config()?.stress_test.qualifying_rate(contract, enabled);
    serde_json::to_string(&QualifyingRate {
        contract_rate_percent: contract,
        stress_test_enabled: enabled,
        qualifying_rate_percent: qualifying,
    })
    .map_err(to_napi_error)
}
