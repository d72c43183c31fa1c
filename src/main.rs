use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xrate::core::log::init_logging;
use xrate::core::{Asset, RatePair};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl TryFrom<Commands> for xrate::AppCommand {
    type Error = anyhow::Error;

    fn try_from(cmd: Commands) -> Result<xrate::AppCommand> {
        Ok(match cmd {
            Commands::Quote { symbol } => {
                let asset: Asset = symbol.parse()?;
                let pair = RatePair::natural_for(asset)
                    .ok_or_else(|| anyhow::anyhow!("No quote is published for {asset}"))?;
                xrate::AppCommand::Quote(pair)
            }
            Commands::Convert { amount, symbol } => xrate::AppCommand::Convert {
                asset: symbol.parse()?,
                amount: xrate::bot::parse_amount(&amount)?,
            },
            Commands::Rates => xrate::AppCommand::Rates,
            Commands::Chat => xrate::AppCommand::Chat,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the current rate of USD, BTC or ETH
    Quote { symbol: String },
    /// Convert an amount of USD, BTC or ETH to RUB
    Convert {
        #[arg(allow_negative_numbers = true)]
        amount: String,
        symbol: String,
    },
    /// Display all direct and cross rates
    Rates,
    /// Answer bot commands read from standard input
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xrate::cli::setup::setup(),
        Some(cmd) => match xrate::AppCommand::try_from(cmd) {
            Ok(command) => xrate::run_command(command, cli.config_path.as_deref()).await,
            Err(e) => Err(e),
        },
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
