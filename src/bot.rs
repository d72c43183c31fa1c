//! Chat command grammar and replies.
//!
//! Replies are plain text meant to be sent verbatim; failures become
//! descriptive messages instead of errors.
use crate::core::format::{format_conversion, format_quote};
use crate::core::{Asset, RateError, RatePair, RateResolver};
use tracing::{debug, warn};

pub const HELP: &str = "\
Hi! I answer exchange-rate questions.
Commands:
/usd - USD to RUB rate
/btc - BTC to USD rate
/eth - ETH to USD rate
/convert <amount> <symbol> - convert to RUB (example: /convert 0.3 eth)
/torub <amount> <symbol> - same as /convert
Shorthand: /eth 0.3, /btc 1, /usd 100";

pub const CONVERT_USAGE: &str = "Usage: /convert <amount> <symbol>\nExample: /convert 0.3 eth";

pub const UNKNOWN: &str = "Unknown command. Available: /start, /usd, /btc, /eth, /convert";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quote(RatePair),
    Convert { asset: Asset, amount: f64 },
    ConvertUsage,
    Unknown,
}

/// Parses a user amount, accepting `,` as the decimal separator.
pub fn parse_amount(text: &str) -> Result<f64, RateError> {
    let normalized = text.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(RateError::InvalidAmount(text.trim().to_string())),
    }
}

impl Command {
    pub fn parse(text: &str) -> Result<Command, RateError> {
        let mut parts = text.split_whitespace();
        let Some(head) = parts.next() else {
            return Ok(Command::Unknown);
        };
        let args: Vec<&str> = parts.collect();

        // Group chats address commands as `/usd@SomeBot`
        let head = head.split('@').next().unwrap_or(head).to_lowercase();

        match (head.as_str(), args.as_slice()) {
            ("/start" | "/help", _) => Ok(Command::Help),
            ("/convert" | "/torub", [amount, symbol, ..]) => Ok(Command::Convert {
                amount: parse_amount(amount)?,
                asset: symbol.parse()?,
            }),
            ("/convert" | "/torub", _) => Ok(Command::ConvertUsage),
            ("/usd" | "/btc" | "/eth", []) => {
                let asset: Asset = head[1..].parse()?;
                RatePair::natural_for(asset)
                    .map(Command::Quote)
                    .ok_or(RateError::UnsupportedAsset(asset.to_string()))
            }
            ("/usd" | "/btc" | "/eth", [amount]) => Ok(Command::Convert {
                asset: head[1..].parse()?,
                amount: parse_amount(amount)?,
            }),
            _ => Ok(Command::Unknown),
        }
    }
}

fn error_reply(err: &RateError) -> String {
    match err {
        RateError::InvalidAmount(_) => format!("{err}. {CONVERT_USAGE}"),
        e if e.is_fetch_failure() => format!("Failed to get exchange rate: {e}"),
        e => e.to_string(),
    }
}

/// Produces the reply for one incoming chat message.
pub async fn handle(resolver: &RateResolver, text: &str) -> String {
    let command = match Command::parse(text) {
        Ok(command) => command,
        Err(e) => {
            debug!(error = %e, text, "Rejected command");
            return error_reply(&e);
        }
    };
    debug!(?command, "Handling command");

    let result = match command {
        Command::Help => return HELP.to_string(),
        Command::ConvertUsage => return CONVERT_USAGE.to_string(),
        Command::Unknown => return UNKNOWN.to_string(),
        Command::Quote(pair) => resolver.quote(pair).await.map(|q| format_quote(&q)),
        Command::Convert { asset, amount } => resolver
            .convert(asset, amount)
            .await
            .map(|b| format_conversion(&b)),
    };

    result.unwrap_or_else(|e| {
        if e.is_fetch_failure() {
            warn!(error = %e, "Rate resolution failed");
        }
        error_reply(&e)
    })
}
