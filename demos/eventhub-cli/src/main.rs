use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use eventhub::prelude::*;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Log in to an EventHub server and call its API with the stored session.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// API base URL
    #[arg(long, env = "EVENTHUB_API_URL")]
    api_url: Option<String>,

    /// Directory holding the stored credential
    #[arg(long, env = "EVENTHUB_TOKEN_DIR", value_name = "DIR")]
    token_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG isn't set
    #[arg(long, default_value = "warn")]
    log: String,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the credential
    Login {
        email: String,

        /// Password
        #[arg(long, env = "EVENTHUB_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account (does not log in)
    Register {
        email: String,

        /// Password
        #[arg(long, env = "EVENTHUB_PASSWORD", hide_env_values = true)]
        password: String,

        /// Account role: organizer or participant
        #[arg(long, default_value = "participant")]
        role: Role,
    },

    /// Forget the stored credential
    Logout,

    /// Show the current session
    Whoami,

    /// GET an API path with the stored credential and print the JSON body
    Get {
        /// Path under the API base, e.g. /events
        path: String,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    eventhub::init_tracing(&cli.log);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), EventHubError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(dir) = cli.token_dir {
        config.token_dir = dir;
    }
    // One-shot commands; nothing lives long enough to expire.
    config.session.expiry_check_interval = None;

    let client = EventHubClient::from_config(config)?;

    match cli.command {
        Command::Login { email, password } => {
            let claims = client.login(&email, &password).await?;
            println!("logged in as {} ({})", claims.subject(), claims.role());
        }
        Command::Register {
            email,
            password,
            role,
        } => {
            client.register(&email, &password, role).await?;
            println!("registered {email}; run `eventhub login` next");
        }
        Command::Logout => {
            client.logout().await;
            println!("logged out");
        }
        Command::Whoami => match client.session() {
            Session::Active { subject, role } => {
                println!("{subject} ({role})");
                if let Some(expiry) =
                    client.claims().await.and_then(|c| c.expiry())
                {
                    println!("expires {expiry}");
                }
            }
            _ => println!("not logged in"),
        },
        Command::Get { path } => {
            let body: serde_json::Value = client.http().get_json(&path).await?;
            tracing::debug!(%path, "request succeeded");
            let pretty = serde_json::to_string_pretty(&body)
                .unwrap_or_else(|_| body.to_string());
            println!("{pretty}");
        }
    }

    Ok(())
}
