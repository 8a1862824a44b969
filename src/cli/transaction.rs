//! Transaction CLI commands

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Subcommand;

use super::{parse_amount, CliContext};
use crate::error::{LedgerError, LedgerResult};
use crate::models::cycle::parse_date;
use crate::models::{Transaction, TransactionKind};
use crate::services::{
    CreateTransactionInput, TransactionFilter, TransactionService, UpdateTransactionInput,
};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction
    Add {
        /// income or expense
        kind: String,
        /// Amount in the transaction's own currency (e.g. "12.50")
        amount: String,
        /// ISO currency code (e.g. GBP, USD)
        currency: String,
        /// When it happened: YYYY-MM-DD or YYYY-MM-DD HH:MM[:SS] (defaults to now)
        #[arg(short, long)]
        at: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        /// Payment method (e.g. Card, Cash)
        #[arg(short, long)]
        method: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List transactions, newest first
    List {
        /// Earliest day included (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Latest day included (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Only income or only expense
        #[arg(short, long)]
        kind: Option<String>,
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show one transaction
    Show {
        /// Transaction id (full or the short txn-xxxxxxxx form)
        id: String,
    },

    /// Change fields of a transaction; pass an empty string to clear a text field
    Edit {
        id: String,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        /// income or expense
        #[arg(short, long)]
        kind: Option<String>,
        #[arg(short, long)]
        at: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        method: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a transaction
    Delete {
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(ctx: &CliContext, cmd: TransactionCommands) -> LedgerResult<()> {
    let service = TransactionService::new(ctx.storage, ctx.rates);

    match cmd {
        TransactionCommands::Add {
            kind,
            amount,
            currency,
            at,
            category,
            method,
            description,
        } => {
            let timestamp = match at {
                Some(s) => parse_timestamp(&s)?,
                None => Local::now().naive_local(),
            };
            let txn = service.create(CreateTransactionInput {
                user_id: ctx.user.clone(),
                amount: parse_amount(&amount)?,
                currency,
                kind: parse_kind(&kind)?,
                timestamp,
                category,
                payment_method: method,
                description,
            })?;

            if ctx.json {
                ctx.print_json(&txn)?;
            } else {
                println!("Recorded {}: {}", txn.id, txn);
            }
        }

        TransactionCommands::List {
            from,
            to,
            kind,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if let Some(from) = from {
                filter.start = Some(parse_date(&from)?.and_time(NaiveTime::MIN));
            }
            if let Some(to) = to {
                filter.end = Some(end_of(parse_date(&to)?));
            }
            if let Some(kind) = kind {
                filter = filter.kind(parse_kind(&kind)?);
            }

            let transactions = service.list(&ctx.user, filter)?;
            if ctx.json {
                ctx.print_json(&transactions)?;
            } else if transactions.is_empty() {
                println!("No transactions found.");
            } else {
                print_table(&transactions);
            }
        }

        TransactionCommands::Show { id } => {
            let txn = service
                .find(&ctx.user, &id)?
                .ok_or_else(|| LedgerError::transaction_not_found(id.as_str()))?;

            if ctx.json {
                ctx.print_json(&txn)?;
            } else {
                println!("ID:          {}", txn.id.as_uuid());
                println!("When:        {}", txn.timestamp.format("%Y-%m-%d %H:%M:%S"));
                println!("Kind:        {}", txn.kind);
                println!("Amount:      {} {}", txn.amount, txn.currency);
                println!("Category:    {}", txn.category_label());
                println!("Method:      {}", txn.payment_method_label());
                if let Some(description) = &txn.description {
                    println!("Description: {}", description);
                }
            }
        }

        TransactionCommands::Edit {
            id,
            amount,
            currency,
            kind,
            at,
            category,
            method,
            description,
        } => {
            let txn = service
                .find(&ctx.user, &id)?
                .ok_or_else(|| LedgerError::transaction_not_found(id.as_str()))?;

            let changes = UpdateTransactionInput {
                amount: amount.as_deref().map(parse_amount).transpose()?,
                currency,
                kind: kind.as_deref().map(parse_kind).transpose()?,
                timestamp: at.as_deref().map(parse_timestamp).transpose()?,
                category,
                payment_method: method,
                description,
            };
            if changes.is_empty() {
                return Err(LedgerError::Validation(
                    "Nothing to change; pass at least one field".into(),
                ));
            }

            let updated = service.update(&ctx.user, txn.id, changes)?;
            if ctx.json {
                ctx.print_json(&updated)?;
            } else {
                println!("Updated {}: {}", updated.id, updated);
            }
        }

        TransactionCommands::Delete { id } => {
            let txn = service
                .find(&ctx.user, &id)?
                .ok_or_else(|| LedgerError::transaction_not_found(id.as_str()))?;
            let removed = service.delete(&ctx.user, txn.id)?;

            if ctx.json {
                ctx.print_json(&removed)?;
            } else {
                println!("Deleted {}: {}", removed.id, removed);
            }
        }
    }

    Ok(())
}

fn parse_kind(input: &str) -> LedgerResult<TransactionKind> {
    input
        .parse()
        .map_err(|e: crate::models::transaction::TransactionValidationError| {
            LedgerError::Validation(e.to_string())
        })
}

/// `YYYY-MM-DD` (midnight) or a date with a time
fn parse_timestamp(input: &str) -> LedgerResult<NaiveDateTime> {
    let input = input.trim();
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(ts);
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| LedgerError::Validation(format!("Invalid timestamp: {}", input)))
}

fn end_of(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
}

fn print_table(transactions: &[Transaction]) {
    println!(
        "{:<14} {:<17} {:<8} {:>12} {:<4} {:<16} {:<12}",
        "ID", "When", "Kind", "Amount", "Cur", "Category", "Method"
    );
    println!("{}", "-".repeat(88));
    for txn in transactions {
        println!(
            "{:<14} {:<17} {:<8} {:>12} {:<4} {:<16} {:<12}",
            txn.id.to_string(),
            txn.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            txn.kind.to_string(),
            txn.amount.to_string(),
            txn.currency.as_str(),
            txn.category_label(),
            txn.payment_method_label()
        );
    }
}
