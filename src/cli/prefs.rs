//! Preference CLI commands

use clap::Subcommand;
use serde_json::json;

use super::CliContext;
use crate::error::LedgerResult;
use crate::services::PreferenceService;

/// Preference subcommands
#[derive(Subcommand)]
pub enum PrefsCommands {
    /// Show the current anchor day and timezone
    Show,

    /// Show or set the billing-cycle anchor day (clamped into 1-31)
    AnchorDay {
        #[arg(allow_negative_numbers = true)]
        day: Option<i64>,
    },

    /// Show or set the display timezone; an empty value restores the default
    Timezone {
        timezone: Option<String>,
    },
}

/// Handle a preference command
pub fn handle_prefs_command(ctx: &CliContext, cmd: PrefsCommands) -> LedgerResult<()> {
    let service = PreferenceService::new(ctx.storage);

    let (anchor, timezone) = match cmd {
        PrefsCommands::Show => (service.anchor_day(&ctx.user)?, service.timezone(&ctx.user)?),
        PrefsCommands::AnchorDay { day } => {
            let anchor = match day {
                Some(day) => service.set_anchor_day(&ctx.user, day)?,
                None => service.anchor_day(&ctx.user)?,
            };
            (anchor, service.timezone(&ctx.user)?)
        }
        PrefsCommands::Timezone { timezone } => {
            let timezone = match timezone {
                Some(tz) => service.set_timezone(&ctx.user, &tz)?,
                None => service.timezone(&ctx.user)?,
            };
            (service.anchor_day(&ctx.user)?, timezone)
        }
    };

    if ctx.json {
        ctx.print_json(&json!({
            "userId": ctx.user,
            "anchorDay": anchor,
            "timezone": timezone,
        }))?;
    } else {
        println!("User:       {}", ctx.user);
        println!("Anchor day: {}", anchor);
        println!("Timezone:   {}", timezone);
    }

    Ok(())
}
