mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;

use mortgage_core::EngineConfig;

use commands::affordability::{MaxMortgageArgs, RequiredIncomeArgs};
use commands::land_transfer::LandTransferArgs;
use commands::monthly_cost::MonthlyCostArgs;
use commands::payment::PaymentArgs;
use commands::stress_test::QualifyingRateArgs;

/// Mortgage affordability, payment and land transfer tax calculations
#[derive(Parser)]
#[command(
    name = "mtg",
    version,
    about = "Mortgage affordability, payment and land transfer tax calculations",
    long_about = "A CLI for Canadian mortgage calculations with decimal precision. \
                  Supports payment schedules, maximum mortgage and required income \
                  under GDS/TDS limits, land transfer tax and total monthly cost."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Path to a TOML engine configuration file
    #[arg(long, env = "MTG_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log engine decisions at debug level
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Periodic payment, term interest and renewal balance
    Payment(PaymentArgs),
    /// Largest mortgage supported by income under GDS/TDS limits
    MaxMortgage(MaxMortgageArgs),
    /// Income needed to qualify for a mortgage amount
    RequiredIncome(RequiredIncomeArgs),
    /// Provincial and municipal land transfer tax
    LandTransfer(LandTransferArgs),
    /// Total monthly cost of ownership including insurance and carrying costs
    MonthlyCost(MonthlyCostArgs),
    /// Stress-tested qualifying rate
    QualifyingRate(QualifyingRateArgs),
    /// Print version information
    Version,
}

impl Commands {
    /// Field printed by `--output minimal`.
    fn headline(&self) -> Option<&'static str> {
        match self {
            Commands::Payment(_) => Some("periodic_payment"),
            Commands::MaxMortgage(_) => Some("max_principal"),
            Commands::RequiredIncome(_) => Some("required_annual_income"),
            Commands::LandTransfer(_) => Some("net_tax"),
            Commands::MonthlyCost(_) => Some("total_monthly_cost"),
            Commands::QualifyingRate(_) => Some("qualifying_rate_percent"),
            Commands::Version => None,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    let config = match EngineConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), "loaded engine configuration");
    }

    let headline = cli.command.headline();
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::payment::run_payment(args, &config),
        Commands::MaxMortgage(args) => commands::affordability::run_max_mortgage(args, &config),
        Commands::RequiredIncome(args) => {
            commands::affordability::run_required_income(args, &config)
        }
        Commands::LandTransfer(args) => commands::land_transfer::run_land_transfer(args),
        Commands::MonthlyCost(args) => commands::monthly_cost::run_monthly_cost(args),
        Commands::QualifyingRate(args) => commands::stress_test::run_qualifying_rate(args, &config),
        Commands::Version => {
            println!("mtg {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value, headline);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
