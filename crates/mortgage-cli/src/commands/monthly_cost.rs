use clap::Args;
use serde_json::Value;

use mortgage_core::monthly_cost::{self, MonthlyCostInput};

use crate::input;

#[derive(Args)]
pub struct MonthlyCostArgs {
    /// Path to JSON/YAML purchase and carrying-cost file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_monthly_cost(args: MonthlyCostArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mc_input: MonthlyCostInput = input::read_input(
        args.input.as_deref(),
        "--input <file> or stdin required for total monthly cost",
    )?;
    let result = monthly_cost::calculate_monthly_cost(&mc_input)?;
    Ok(serde_json::to_value(result)?)
}
