//! Report CLI commands

use chrono::Local;
use clap::Subcommand;

use super::CliContext;
use crate::error::{LedgerError, LedgerResult};
use crate::models::AnalysisPeriod;
use crate::reports::{PeriodReport, StatsReport};

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Totals and breakdowns for a look-back period
    Analysis {
        /// day, 3days, week, month or all
        #[arg(short, long, default_value = "all")]
        period: String,
    },

    /// All-time totals
    Stats,

    /// Recent audit log entries
    Audit {
        #[arg(short, long, default_value = "20")]
        count: usize,
    },
}

/// Handle a report command
pub fn handle_report_command(ctx: &CliContext, cmd: ReportCommands) -> LedgerResult<()> {
    match cmd {
        ReportCommands::Analysis { period } => {
            let period = AnalysisPeriod::parse(&period)
                .map_err(|e| LedgerError::Validation(e.to_string()))?;
            let now = Local::now().naive_local();
            let report = PeriodReport::generate(ctx.storage, ctx.rates, &ctx.user, period, now)?;

            if ctx.json {
                ctx.print_json(&report)?;
            } else {
                print!("{}", report.format_terminal(ctx.symbol()));
            }
        }

        ReportCommands::Stats => {
            let report = StatsReport::generate(ctx.storage, ctx.rates, &ctx.user)?;
            if ctx.json {
                ctx.print_json(&report)?;
            } else {
                print!("{}", report.format_terminal(ctx.symbol()));
            }
        }

        ReportCommands::Audit { count } => {
            let entries: Vec<_> = ctx
                .storage
                .audit()
                .read_recent(count)?
                .into_iter()
                .filter(|entry| entry.user_id == ctx.user)
                .collect();

            if ctx.json {
                ctx.print_json(&entries)?;
            } else if entries.is_empty() {
                println!("No audit entries.");
            } else {
                for entry in &entries {
                    println!("{}", entry.format_human_readable());
                }
            }
        }
    }

    Ok(())
}
