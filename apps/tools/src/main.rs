use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{LateShowClient, DEFAULT_SERVER_URL};
use storage::Storage;
use tracing_subscriber::EnvFilter;

mod smoke;

#[derive(Parser, Debug)]
#[command(name = "lateshow-tools", about = "Maintenance commands for the Late Show database and API")]
struct Cli {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://./data/lateshow.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace every row with the bundled sample data.
    Seed,
    CreateEpisode {
        number: i64,
        date: String,
    },
    CreateGuest {
        name: String,
        occupation: String,
    },
    /// Run read/write checks against a running API server.
    Smoke {
        #[arg(long, env = "LATESHOW_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
        server_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Seed => {
            let storage = Storage::new(&cli.database_url).await?;
            let summary = storage.seed_sample_data().await?;
            println!(
                "seeded episodes={} guests={} appearances={}",
                summary.episodes, summary.guests, summary.appearances
            );
        }
        Command::CreateEpisode { number, date } => {
            let storage = Storage::new(&cli.database_url).await?;
            let episode_id = storage.create_episode(number, &date).await?;
            println!("created episode_id={episode_id}");
        }
        Command::CreateGuest { name, occupation } => {
            let storage = Storage::new(&cli.database_url).await?;
            let guest_id = storage.create_guest(&name, &occupation).await?;
            println!("created guest_id={guest_id}");
        }
        Command::Smoke { server_url } => {
            let client = LateShowClient::new(&server_url)?;
            let outcomes = smoke::run_checks(&client).await;
            let mut failed = 0;
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(()) => println!("PASS {}", outcome.name),
                    Err(reason) => {
                        failed += 1;
                        println!("FAIL {}: {reason}", outcome.name);
                    }
                }
            }
            if failed > 0 {
                bail!("{failed} of {} smoke checks failed", outcomes.len());
            }
            println!("all {} smoke checks passed", outcomes.len());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_create_episode_arguments() {
        let cli = Cli::try_parse_from([
            "lateshow-tools",
            "--database-url",
            "sqlite::memory:",
            "create-episode",
            "6",
            "1/18/99",
        ])
        .expect("cli");
        assert_eq!(cli.database_url, "sqlite::memory:");
        assert!(matches!(
            cli.command,
            Command::CreateEpisode { number: 6, ref date } if date == "1/18/99"
        ));
    }

    #[test]
    fn smoke_takes_a_server_url() {
        let cli = Cli::try_parse_from([
            "lateshow-tools",
            "smoke",
            "--server-url",
            "http://localhost:9000",
        ])
        .expect("cli");
        assert!(matches!(
            cli.command,
            Command::Smoke { ref server_url } if server_url == "http://localhost:9000"
        ));
    }
}
