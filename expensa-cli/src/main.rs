//! Main entry point for the Expensa command-line client.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;

mod commands;
mod context;
mod logging;
mod output;

use commands::{
    account::{PasswordCommand, ProfileCommand, RegisterArgs},
    approvals::ApprovalsCommand,
    expenses::ExpensesCommand,
    invoices::InvoicesCommand,
    notifications::NotificationsCommand,
    reports::{AnalyticsArgs, AuditArgs},
    session::SessionCommand,
    users::UsersCommand,
};

/// Expensa CLI
#[derive(Parser, Debug)]
#[command(name = "expensa", version)]
#[command(about = "Command-line client for the Expensa expense backend", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options accepted by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to the configuration file (yaml, json or toml)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the configuration (e.g. `http://localhost:8080`)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Print raw JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in, inspect or end the stored session
    #[command(subcommand)]
    Session(SessionCommand),

    /// Create a new account
    Register(RegisterArgs),

    /// Recover a forgotten password
    #[command(subcommand)]
    Password(PasswordCommand),

    /// Change your own profile
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// List, create, edit, delete and submit expenses
    #[command(subcommand)]
    Expenses(ExpensesCommand),

    /// Review the approval queue (managers and admins)
    #[command(subcommand)]
    Approvals(ApprovalsCommand),

    /// Show spending analytics
    Analytics(AnalyticsArgs),

    /// Browse the audit log (admins)
    Audit(AuditArgs),

    /// Read and acknowledge notifications
    #[command(subcommand)]
    Notifications(NotificationsCommand),

    /// List, generate and download invoices
    #[command(subcommand)]
    Invoices(InvoicesCommand),

    /// Administer user accounts (admins)
    #[command(subcommand)]
    Users(UsersCommand),

    /// Generate a configuration file
    Config {
        /// Format of the configuration file to generate (yaml, json or toml). Defaults to yaml.
        #[arg(long, short, default_value = "yaml")]
        format: String,

        /// Where to write the file. Defaults to `expensa.<format>` in the current directory.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)
        #[arg(long, short)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Config { format, output } => {
            commands::config::generate_config(&format, output.as_deref())
        }
        Commands::Completion { shell } => {
            commands::completion::generate_completion(shell);
            Ok(())
        }
        Commands::Session(command) => commands::session::run(command, &global).await,
        Commands::Register(args) => commands::account::register(args, &global).await,
        Commands::Password(command) => commands::account::password(command, &global).await,
        Commands::Profile(command) => commands::account::profile(command, &global).await,
        Commands::Expenses(command) => commands::expenses::run(command, &global).await,
        Commands::Approvals(command) => commands::approvals::run(command, &global).await,
        Commands::Analytics(args) => commands::reports::analytics(args, &global).await,
        Commands::Audit(args) => commands::reports::audit(args, &global).await,
        Commands::Notifications(command) => commands::notifications::run(command, &global).await,
        Commands::Invoices(command) => commands::invoices::run(command, &global).await,
        Commands::Users(command) => commands::users::run(command, &global).await,
    }
}
