use std::sync::Arc;

use clap::Parser;
use hutfinder::{
    AppState,
    config::Config,
    create_router,
    database::PgShelterRepository,
    directions::{OpenRouteServiceClient, RouteProvider},
    repository::{InMemoryShelterRepository, ShelterRepository},
};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hutfinder=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();

    let shelters: Arc<dyn ShelterRepository> = match &config.database_url {
        Some(url) => {
            let repo = PgShelterRepository::connect(url).await?;
            repo.migrate().await?;
            tracing::info!("serving shelters from PostgreSQL");
            Arc::new(repo)
        }
        None => {
            let repo = InMemoryShelterRepository::from_file(&config.shelters_json)?;
            tracing::info!(
                "loaded {} shelters from {}",
                repo.len(),
                config.shelters_json.display()
            );
            Arc::new(repo)
        }
    };

    let directions: Option<Arc<dyn RouteProvider>> = match config.routing() {
        Some(routing) => {
            tracing::info!("routing via {}", routing.base_url);
            Some(Arc::new(OpenRouteServiceClient::new(routing)?))
        }
        None => {
            tracing::warn!("OPENROUTESERVICE_API_KEY not set, routing endpoints are disabled");
            None
        }
    };

    let state = AppState {
        shelters,
        directions,
        max_daily_hours: config.max_daily_hours,
    };

    // The web client is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = create_router(state).layer(cors);

    tracing::info!("starting backend on http://{}", config.bind_addr);
    tracing::info!("  GET  /api/shelters, /api/shelters/search, /api/shelters/:id");
    tracing::info!("  POST /api/trips/plan, /api/trips/gpx, /api/trip/hiking-route");
    tracing::info!("  GET  /api/emergency/nearest-shelter   POST /api/emergency/route");
    tracing::info!("  POST /api/gpx/summary");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
