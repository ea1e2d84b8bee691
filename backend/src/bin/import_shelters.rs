use std::{fs::File, path::PathBuf};

use clap::Parser;
use hutfinder::{database::PgShelterRepository, repository::load_shelters};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Load a JSON shelter list into PostgreSQL"
)]
struct Args {
    /// JSON array of shelters, same format as backend/data/shelters.json
    #[arg(long, default_value = "backend/data/shelters.json")]
    input: PathBuf,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Only validate the input file
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let shelters = load_shelters(File::open(&args.input)?)?;
    let missing = shelters.iter().filter(|s| s.coordinate().is_none()).count();
    tracing::info!(
        "read {} shelters from {:?} ({} without coordinates)",
        shelters.len(),
        args.input,
        missing
    );

    if args.dry_run {
        return Ok(());
    }

    let repo = PgShelterRepository::connect(&args.database_url).await?;
    repo.migrate().await?;
    let written = repo.upsert_shelters(&shelters).await?;
    tracing::info!("imported {written} shelters");
    Ok(())
}
