//! Database maintenance: `init`, `reset`, `seed`

use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use userhub_infrastructure::create_pool;
use userhub_infrastructure::database::{schema, seed};
use userhub_shared::config::AppConfig;
use userhub_shared::telemetry::init_telemetry;

#[derive(Parser, Debug)]
#[command(name = "userhub-manage", version, about = "UserHub database maintenance")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create any missing tables and indexes
    Init,

    /// Drop every table and recreate the schema. All data is lost.
    Reset {
        /// Skip the interactive confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Insert sample users, groups, and memberships
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig::load().context("failed to load configuration")?;
    let _log_guard = init_telemetry(&config.log)?;

    let pool = create_pool(&config.database)
        .await
        .context("failed to open database")?;

    match args.command {
        Command::Init => {
            info!("Creating database schema");
            schema::create_all(&pool).await?;
            info!("Database schema created");
        }
        Command::Reset { yes } => {
            if !yes && !confirm("All existing data will be lost. Continue? (y/n): ")? {
                info!("Reset cancelled");
                pool.close().await;
                return Ok(());
            }
            schema::drop_all(&pool).await?;
            info!("Existing tables dropped");
            schema::create_all(&pool).await?;
            info!("New tables created");
        }
        Command::Seed => {
            let summary = seed::seed(&pool).await?;
            info!(
                "Seeded {} users, {} groups, {} memberships",
                summary.users, summary.groups, summary.memberships
            );
        }
    }

    pool.close().await;
    Ok(())
}

fn confirm(prompt: &str) -> io::Result<bool> {
    let mut stdout = io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
