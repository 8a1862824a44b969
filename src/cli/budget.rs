//! Budget CLI commands

use clap::Subcommand;

use super::{parse_target, CliContext};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{CycleBudget, Money};
use crate::services::BudgetService;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set expected income/expense for the cycle starting on a date.
    /// Omitted targets are stored as unset.
    Set {
        /// Cycle start date (YYYY-MM-DD)
        cycle_start: String,
        /// Expected income, or "none"
        #[arg(short, long, allow_hyphen_values = true)]
        income: Option<String>,
        /// Expected expense, or "none"
        #[arg(short, long, allow_hyphen_values = true)]
        expense: Option<String>,
    },

    /// Show the budget for one cycle
    Show {
        cycle_start: String,
    },

    /// List all budgets
    List,

    /// Remove the budget for one cycle
    Clear {
        cycle_start: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command(ctx: &CliContext, cmd: BudgetCommands) -> LedgerResult<()> {
    let service = BudgetService::new(ctx.storage);

    match cmd {
        BudgetCommands::Set {
            cycle_start,
            income,
            expense,
        } => {
            let budget = service.set_budget(
                &ctx.user,
                &cycle_start,
                parse_target(income.as_deref())?,
                parse_target(expense.as_deref())?,
            )?;

            if ctx.json {
                ctx.print_json(&budget)?;
            } else {
                println!("Budget for cycle {} saved", budget.cycle_start);
                print_budget(ctx, &budget)?;
            }
        }

        BudgetCommands::Show { cycle_start } => {
            let budget = service
                .get_budget(&ctx.user, &cycle_start)?
                .ok_or_else(|| LedgerError::budget_not_found(cycle_start.trim()))?;

            if ctx.json {
                ctx.print_json(&budget)?;
            } else {
                println!("Budget for cycle {}", budget.cycle_start);
                print_budget(ctx, &budget)?;
            }
        }

        BudgetCommands::List => {
            let budgets = service.list_for_user(&ctx.user)?;

            if ctx.json {
                ctx.print_json(&budgets)?;
            } else if budgets.is_empty() {
                println!("No budgets set.");
            } else {
                println!("{:<14} {:>15} {:>15}", "Cycle start", "Exp. Income", "Exp. Expense");
                println!("{}", "-".repeat(46));
                for budget in &budgets {
                    println!(
                        "{:<14} {:>15} {:>15}",
                        budget.cycle_start,
                        show_target(ctx, budget.expected_income),
                        show_target(ctx, budget.expected_expense)
                    );
                }
            }
        }

        BudgetCommands::Clear { cycle_start } => {
            let removed = service.clear_budget(&ctx.user, &cycle_start)?;
            if ctx.json {
                ctx.print_json(&removed)?;
            } else {
                println!("Budget for cycle {} removed", removed.cycle_start);
            }
        }
    }

    Ok(())
}

fn show_target(ctx: &CliContext, target: Option<Money>) -> String {
    target
        .map(|m| m.format_with_symbol(ctx.symbol()))
        .unwrap_or_else(|| "-".to_string())
}

fn print_budget(ctx: &CliContext, budget: &CycleBudget) -> LedgerResult<()> {
    println!("  Expected income:  {}", show_target(ctx, budget.expected_income));
    println!("  Expected expense: {}", show_target(ctx, budget.expected_expense));
    if let Some(balance) = budget.expected_balance()? {
        println!("  Expected balance: {}", balance.format_with_symbol(ctx.symbol()));
    }
    Ok(())
}
