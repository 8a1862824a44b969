use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cycle_ledger::cli::{
    handle_budget_command, handle_category_command, handle_currency_command,
    handle_cycle_command, handle_prefs_command, handle_report_command,
    handle_transaction_command, BudgetCommands, CategoryCommands, CliContext, CurrencyCommands,
    CycleCommands, PrefsCommands, ReportCommands, TransactionCommands,
};
use cycle_ledger::config::{paths::LedgerPaths, settings::Settings};
use cycle_ledger::logging::init_tracing;
use cycle_ledger::models::UserId;
use cycle_ledger::services::RateTable;
use cycle_ledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "cycle-ledger",
    version,
    about = "Billing-cycle income and expense tracking",
    long_about = "cycle-ledger groups your transactions into monthly billing cycles \
                  that start on a day of your choosing, converts every amount into \
                  one base currency, and compares each cycle with its budget."
)]
struct Cli {
    /// User whose data to read and write (defaults to the configured user)
    #[arg(short, long, global = true, env = "CYCLE_LEDGER_USER")]
    user: Option<String>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Data directory override
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Billing-cycle statistics
    #[command(subcommand)]
    Cycle(CycleCommands),

    /// Per-cycle budget targets
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Transaction management
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Per-user category labels
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Analysis and stats reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Anchor day and timezone preferences
    #[command(subcommand)]
    Prefs(PrefsCommands),

    /// Supported currencies and conversion
    #[command(subcommand)]
    Currency(CurrencyCommands),

    /// Create the data directory and default settings
    Init,

    /// Show configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => LedgerPaths::with_base_dir(dir),
        None => LedgerPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(settings.log_filter.as_deref());

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let rates = RateTable::builtin();
    let user = UserId::new(
        cli.user
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(&settings.default_user),
    );
    let ctx = CliContext {
        storage: &storage,
        settings: &settings,
        rates: &rates,
        user,
        json: cli.json,
    };

    match cli.command {
        Some(Commands::Cycle(cmd)) => handle_cycle_command(&ctx, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&ctx, cmd)?,
        Some(Commands::Transaction(cmd)) => handle_transaction_command(&ctx, cmd)?,
        Some(Commands::Category(cmd)) => handle_category_command(&ctx, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&ctx, cmd)?,
        Some(Commands::Prefs(cmd)) => handle_prefs_command(&ctx, cmd)?,
        Some(Commands::Currency(cmd)) => handle_currency_command(&ctx, cmd)?,
        Some(Commands::Init) => {
            settings.save(&paths)?;
            println!("Initialized cycle-ledger at: {}", paths.base_dir().display());
        }
        Some(Commands::Config) => {
            println!("cycle-ledger configuration");
            println!("==========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Default user:    {}", settings.default_user);
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!("  Base currency:   {}", rates.base());
        }
        None => {
            println!("cycle-ledger - billing-cycle income and expense tracking");
            println!();
            println!("Run 'cycle-ledger --help' for usage information.");
        }
    }

    Ok(())
}
