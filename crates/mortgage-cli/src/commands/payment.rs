use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_core::payment::{self, LoanTerms, LoanType, MortgageInput, PaymentFrequency};
use mortgage_core::rates::{Compounding, PeriodicRateConvention};
use mortgage_core::EngineConfig;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompoundingArg {
    Annual,
    SemiAnnual,
    Monthly,
    Daily,
}

impl From<CompoundingArg> for Compounding {
    fn from(arg: CompoundingArg) -> Self {
        match arg {
            CompoundingArg::Annual => Compounding::Annual,
            CompoundingArg::SemiAnnual => Compounding::SemiAnnual,
            CompoundingArg::Monthly => Compounding::Monthly,
            CompoundingArg::Daily => Compounding::Daily,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LoanTypeArg {
    Regular,
    InterestOnly,
}

impl From<LoanTypeArg> for LoanType {
    fn from(arg: LoanTypeArg) -> Self {
        match arg {
            LoanTypeArg::Regular => LoanType::Regular,
            LoanTypeArg::InterestOnly => LoanType::InterestOnly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Monthly,
    BiWeekly,
    AcceleratedBiWeekly,
}

impl From<FrequencyArg> for PaymentFrequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Monthly => PaymentFrequency::Monthly,
            FrequencyArg::BiWeekly => PaymentFrequency::BiWeekly,
            FrequencyArg::AcceleratedBiWeekly => PaymentFrequency::AcceleratedBiWeekly,
        }
    }
}

/// Arguments for the payment calculator
#[derive(Args)]
pub struct PaymentArgs {
    /// Home price, or the loan amount when no down payment is given
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Down payment subtracted from the price
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 6.29)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Compounding frequency of the quoted rate
    #[arg(long, value_enum, default_value = "semi-annual")]
    pub compounding: CompoundingArg,

    /// Amortization period in years
    #[arg(long, default_value = "25")]
    pub amortization: u32,

    /// Term in years
    #[arg(long, default_value = "5")]
    pub term: u32,

    #[arg(long, value_enum, default_value = "regular")]
    pub loan_type: LoanTypeArg,

    #[arg(long, value_enum, default_value = "monthly")]
    pub frequency: FrequencyArg,

    /// Derive the periodic rate as the compound equivalent of the effective rate
    #[arg(long)]
    pub equivalent_rate: bool,

    /// Also report the payment at the stress-tested qualifying rate
    #[arg(long)]
    pub stress_test: bool,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_payment(
    args: PaymentArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgage_input: MortgageInput = if let Some(ref path) = args.input {
        input::file::read_file(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        MortgageInput {
            principal_or_price: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            down_payment: args.down_payment,
            loan: LoanTerms {
                annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
                compounding: args.compounding.into(),
                amortization_years: args.amortization,
                term_years: args.term,
                loan_type: args.loan_type.into(),
                stress_test_enabled: args.stress_test,
            },
            payment_frequency: args.frequency.into(),
            rate_convention: if args.equivalent_rate {
                PeriodicRateConvention::Equivalent
            } else {
                PeriodicRateConvention::Divided
            },
        }
    };

    let result = payment::calculate_payment(&mortgage_input, &config.stress_test)?;
    Ok(serde_json::to_value(result)?)
}
