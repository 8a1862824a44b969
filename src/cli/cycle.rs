//! Cycle CLI commands

use chrono::Local;
use clap::Subcommand;

use super::CliContext;
use crate::error::LedgerResult;
use crate::models::cycle::{parse_date, DATE_FORMAT};
use crate::models::{AnchorDay, CycleQuery};
use crate::reports::CycleReport;
use crate::services::{CycleRangeGenerator, PreferenceService};

/// Cycle subcommands
#[derive(Subcommand)]
pub enum CycleCommands {
    /// Income, expense and budget per cycle in a date window
    Stats {
        /// First day of the window (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last day of the window (YYYY-MM-DD)
        #[arg(long)]
        to: String,
        /// Anchor day override (defaults to the user's preference)
        #[arg(short, long, allow_negative_numbers = true)]
        anchor: Option<i64>,
    },

    /// List the cycle boundaries in a date window
    Ranges {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(short, long, allow_negative_numbers = true)]
        anchor: Option<i64>,
    },

    /// Show the full cycle containing a date
    Current {
        /// Date to look up (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long, allow_negative_numbers = true)]
        anchor: Option<i64>,
    },
}

/// Handle a cycle command
pub fn handle_cycle_command(ctx: &CliContext, cmd: CycleCommands) -> LedgerResult<()> {
    match cmd {
        CycleCommands::Stats { from, to, anchor } => {
            let query = CycleQuery::parse(resolve_anchor(ctx, anchor)?, &from, &to)?;
            let report = CycleReport::generate(ctx.storage, ctx.rates, &ctx.user, &query)?;

            if ctx.json {
                ctx.print_json(&report.rounded().cycles)?;
            } else {
                print!(
                    "{}",
                    report.format_terminal(ctx.symbol(), &ctx.settings.date_format)
                );
            }
        }

        CycleCommands::Ranges { from, to, anchor } => {
            let query = CycleQuery::parse(resolve_anchor(ctx, anchor)?, &from, &to)?;
            let ranges = CycleRangeGenerator::new(query.anchor).generate(&query.window);

            if ctx.json {
                ctx.print_json(&ranges)?;
            } else {
                for range in &ranges {
                    let note = if range.is_partial() {
                        format!(" (cycle {} - {})", range.cycle_start, range.cycle_end)
                    } else {
                        String::new()
                    };
                    println!("{} - {}{}", range.start_date, range.end_date, note);
                }
            }
        }

        CycleCommands::Current { date, anchor } => {
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => Local::now().date_naive(),
            };
            let anchor = AnchorDay::new(resolve_anchor(ctx, anchor)?)?;
            let cycle = CycleRangeGenerator::new(anchor).cycle_containing(date);

            if ctx.json {
                ctx.print_json(&cycle)?;
            } else {
                println!(
                    "Cycle containing {}: {} - {} ({} days, anchor day {})",
                    date.format(DATE_FORMAT),
                    cycle.start_date,
                    cycle.end_date,
                    cycle.days(),
                    anchor
                );
            }
        }
    }

    Ok(())
}

/// Explicit anchor, else the user's stored preference
fn resolve_anchor(ctx: &CliContext, explicit: Option<i64>) -> LedgerResult<i64> {
    match explicit {
        Some(day) => Ok(day),
        None => Ok(i64::from(
            PreferenceService::new(ctx.storage).anchor_day(&ctx.user)?.get(),
        )),
    }
}
