use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use recipebox_core::{storage::Database, OwnerId, SavedRecipes, SessionGate};
use recipebox_server::{config::Config, init_tracing, start_server};

#[derive(Parser, Debug)]
#[command(name = "recipebox", version, about = "Saved recipe lists over HTTP")]
struct Cli {
    /// SQLite database file (defaults to RECIPEBOX_DB or recipebox.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Port to listen on (defaults to RECIPEBOX_PORT or 5000)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Issue a bearer token for an owner
    IssueToken { owner: String },
    /// Revoke one token, or every token of an owner
    RevokeToken {
        token: Option<String>,
        #[arg(long, conflicts_with = "token")]
        owner: Option<String>,
    },
    /// Print an owner's saved recipes as JSON
    List {
        owner: String,
        #[arg(long)]
        favorites: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = Config::load()?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(start_server(config))?;
        }
        Command::IssueToken { owner } => {
            let gate = open_gate(&config)?;
            let token = gate.issue(&OwnerId::new(owner))?;
            println!("{token}");
        }
        Command::RevokeToken { token, owner } => {
            let gate = open_gate(&config)?;
            match (token, owner) {
                (Some(token), _) => {
                    gate.revoke(&token)?;
                    println!("revoked 1 token");
                }
                (None, Some(owner)) => {
                    let removed = gate.revoke_all(&OwnerId::new(owner))?;
                    println!("revoked {removed} token(s)");
                }
                (None, None) => bail!("pass a token or --owner"),
            }
        }
        Command::List { owner, favorites } => {
            let recipes = SavedRecipes::open(Database::new(&config.database_path))?;
            let owner = OwnerId::new(owner);
            let entries = if favorites {
                recipes.list_favorites(&owner)?
            } else {
                recipes.list_sorted(&owner)?
            };
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }

    Ok(())
}

fn open_gate(config: &Config) -> Result<SessionGate> {
    let db = Database::new(&config.database_path);
    db.get_or_create()?;
    Ok(SessionGate::new(db))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::parse_from(["recipebox", "--db", "/tmp/r.db", "serve", "--port", "8080"]);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/r.db")));
        assert!(matches!(cli.command, Command::Serve { port: Some(8080) }));
    }

    #[test]
    fn test_parse_revoke_owner() {
        let cli = Cli::parse_from(["recipebox", "revoke-token", "--owner", "user-1"]);
        match cli.command {
            Command::RevokeToken { token, owner } => {
                assert!(token.is_none());
                assert_eq!(owner.as_deref(), Some("user-1"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
