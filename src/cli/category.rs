//! Category CLI commands

use clap::Subcommand;

use super::CliContext;
use crate::error::LedgerResult;
use crate::services::CategoryService;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List your categories
    List,

    /// Add a category at the end of the list
    Add {
        name: String,
    },

    /// Rename a category (by name or cat- id)
    Rename {
        category: String,
        new_name: String,
    },

    /// Delete a category; transactions keep the name they were recorded with
    Delete {
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(ctx: &CliContext, cmd: CategoryCommands) -> LedgerResult<()> {
    let service = CategoryService::new(ctx.storage);

    match cmd {
        CategoryCommands::List => {
            let categories = service.list(&ctx.user)?;
            if ctx.json {
                ctx.print_json(&categories)?;
            } else if categories.is_empty() {
                println!("No categories yet. Add one with 'category add <name>'.");
            } else {
                println!("{:<14} {}", "ID", "Name");
                println!("{}", "-".repeat(40));
                for category in &categories {
                    println!("{:<14} {}", category.id.to_string(), category.name);
                }
            }
        }

        CategoryCommands::Add { name } => {
            let category = service.create(&ctx.user, &name)?;
            if ctx.json {
                ctx.print_json(&category)?;
            } else {
                println!("Created category {} ({})", category.name, category.id);
            }
        }

        CategoryCommands::Rename { category, new_name } => {
            let renamed = service.rename(&ctx.user, &category, &new_name)?;
            if ctx.json {
                ctx.print_json(&renamed)?;
            } else {
                println!("Renamed {} to {}", category, renamed.name);
            }
        }

        CategoryCommands::Delete { category } => {
            let removed = service.delete(&ctx.user, &category)?;
            if ctx.json {
                ctx.print_json(&removed)?;
            } else {
                println!("Deleted category {}", removed.name);
            }
        }
    }

    Ok(())
}
