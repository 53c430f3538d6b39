use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_core::land_transfer::{self, Jurisdiction, LandTransferInput};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum JurisdictionArg {
    Ontario,
    Toronto,
    BritishColumbia,
    Manitoba,
    Quebec,
    Other,
}

impl From<JurisdictionArg> for Jurisdiction {
    fn from(arg: JurisdictionArg) -> Self {
        match arg {
            JurisdictionArg::Ontario => Jurisdiction::Ontario,
            JurisdictionArg::Toronto => Jurisdiction::Toronto,
            JurisdictionArg::BritishColumbia => Jurisdiction::BritishColumbia,
            JurisdictionArg::Manitoba => Jurisdiction::Manitoba,
            JurisdictionArg::Quebec => Jurisdiction::Quebec,
            JurisdictionArg::Other => Jurisdiction::Other,
        }
    }
}

/// Arguments for land transfer tax
#[derive(Args)]
pub struct LandTransferArgs {
    #[arg(long, value_enum)]
    pub jurisdiction: Option<JurisdictionArg>,

    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    #[arg(long)]
    pub first_time_buyer: bool,

    #[arg(long)]
    pub foreign_buyer: bool,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_land_transfer(args: LandTransferArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let lt_input: LandTransferInput = if let Some(ref path) = args.input {
        input::file::read_file(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LandTransferInput {
            jurisdiction: args
                .jurisdiction
                .ok_or("--jurisdiction is required (or provide --input)")?
                .into(),
            home_price: args.price.ok_or("--price is required (or provide --input)")?,
            is_first_time_buyer: args.first_time_buyer,
            is_foreign_buyer: args.foreign_buyer,
        }
    };
    let result = land_transfer::calculate_land_transfer_tax(&lt_input)?;
    Ok(serde_json::to_value(result)?)
}
