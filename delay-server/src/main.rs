use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use delay_server::config::AppConfig;
use delay_server::registry::DelayRegistry;
use delay_server::store::{JsonFileStore, JsonFileStoreConfig};
use delay_server::timetable::Timetable;
use delay_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "delay_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().inspect_err(|e| error!("invalid configuration: {e}"))?;

    // Timetable is static reference data, read once
    let timetable = Timetable::load(&config.timetable_path);
    if timetable.is_empty() {
        info!(
            path = %config.timetable_path.display(),
            policy = %config.registry.policy,
            "timetable is empty; submissions depend on the timetable policy"
        );
    }

    let store = JsonFileStore::new(JsonFileStoreConfig::new(&config.registry_path));
    let registry = DelayRegistry::new(store, timetable, config.registry.clone());
    info!(
        station = registry.station(),
        registry = %config.registry_path.display(),
        policy = %registry.policy(),
        "delay registry ready"
    );

    let state = AppState::new(registry);
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Delay board listening on http://{}", config.bind_addr);
    info!("API Endpoints:");
    info!("  GET    /api/reports                  - List reports");
    info!("  POST   /api/reports                  - Register a delay");
    info!("  POST   /api/reports/:index/move-up   - Move a report up");
    info!("  POST   /api/reports/:index/move-down - Move a report down");
    info!("  DELETE /api/reports/:index           - Delete a report");
    info!("  GET    /api/schedule                 - Look up a scheduled departure");

    axum::serve(listener, app).await?;
    Ok(())
}
