//! Currency CLI commands

use clap::Subcommand;
use serde_json::json;

use super::{parse_amount, CliContext};
use crate::error::LedgerResult;
use crate::services::CurrencyNormalizer;

/// Currency subcommands
#[derive(Subcommand)]
pub enum CurrencyCommands {
    /// List supported currencies and their factor to the base currency
    List,

    /// Convert an amount into the base currency
    Normalize {
        amount: String,
        currency: String,
    },
}

/// Handle a currency command
pub fn handle_currency_command(ctx: &CliContext, cmd: CurrencyCommands) -> LedgerResult<()> {
    match cmd {
        CurrencyCommands::List => {
            if ctx.json {
                let rates: serde_json::Map<String, serde_json::Value> = ctx
                    .rates
                    .entries()
                    .map(|(code, factor)| (code.to_string(), json!(factor)))
                    .collect();
                ctx.print_json(&json!({ "base": ctx.rates.base(), "rates": rates }))?;
            } else {
                println!("Base currency: {}", ctx.rates.base());
                for (code, factor) in ctx.rates.entries() {
                    println!("  {}  {}", code, factor);
                }
            }
        }

        CurrencyCommands::Normalize { amount, currency } => {
            let amount = parse_amount(&amount)?;
            let normalized = CurrencyNormalizer::new(ctx.rates).normalize(amount, &currency)?;

            if ctx.json {
                ctx.print_json(&json!({
                    "amount": amount,
                    "currency": currency.trim().to_ascii_uppercase(),
                    "base": ctx.rates.base(),
                    "normalized": normalized.rounded(),
                }))?;
            } else {
                println!(
                    "{} {} = {} {}",
                    amount,
                    currency.trim().to_ascii_uppercase(),
                    normalized,
                    ctx.rates.base()
                );
            }
        }
    }

    Ok(())
}
