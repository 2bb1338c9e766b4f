//! ShopSense command-line client.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_config_and_utils::{init_logging, Config, Paths};

#[derive(Parser)]
#[command(name = "shopsense", version, about = "ShopSense AI client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with email and password
    Login {
        /// Account email (prompted for when omitted)
        #[arg(long)]
        email: Option<String>,
    },
    /// Create a new account
    Register {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        username: Option<String>,
    },
    /// Log out and clear the stored credential
    Logout,
    /// Show session status
    Status,
    /// Show the authenticated profile
    Whoami,
    /// Update the authenticated profile
    Profile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Change the account password
    ChangePassword,
    /// List uploaded receipts
    Receipts,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = Paths::new()?;
    let config = Config::load(&paths)?;
    init_logging(&config.log_level);
    paths.ensure_dirs()?;

    let app = commands::App::build(&paths, &config);

    match cli.command {
        Commands::Login { email } => commands::auth::login(&app, email).await,
        Commands::Register { email, username } => {
            commands::auth::register(&app, email, username).await
        }
        Commands::Logout => commands::auth::logout(&app).await,
        Commands::Status => commands::auth::status(&app).await,
        Commands::Whoami => commands::auth::whoami(&app).await,
        Commands::Profile { username, email } => {
            commands::auth::update_profile(&app, username, email).await
        }
        Commands::ChangePassword => commands::auth::change_password(&app).await,
        Commands::Receipts => commands::receipts::list(&app).await,
    }
}
