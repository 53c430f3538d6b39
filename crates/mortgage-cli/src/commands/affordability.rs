use clap::Args;
use serde_json::Value;

use mortgage_core::affordability::{self, AffordabilityInputs, RequiredIncomeInput};
use mortgage_core::EngineConfig;

use crate::input;

#[derive(Args)]
pub struct MaxMortgageArgs {
    /// Path to JSON/YAML borrower file
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct RequiredIncomeArgs {
    /// Path to JSON/YAML file with the mortgage amount and borrower costs
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_max_mortgage(
    args: MaxMortgageArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs: AffordabilityInputs = input::read_input(
        args.input.as_deref(),
        "--input <file> or stdin required for maximum mortgage",
    )?;
    let result = affordability::calculate_max_mortgage(&inputs, &config.stress_test)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_required_income(
    args: RequiredIncomeArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs: RequiredIncomeInput = input::read_input(
        args.input.as_deref(),
        "--input <file> or stdin required for required income",
    )?;
    let result = affordability::calculate_required_income(&inputs, &config.stress_test)?;
    Ok(serde_json::to_value(result)?)
}
