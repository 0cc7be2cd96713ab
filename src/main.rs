use dex_step_planner::config::Settings;
use dex_step_planner::store::in_memory::InMemoryRelayerStore;
use dex_step_planner::{AppState, router};
use log::info;
use simple_logger::SimpleLogger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    SimpleLogger::new().env().init()?;

    let settings = Settings::load()?;
    let store = InMemoryRelayerStore::new(settings.relayer_settings());
    let app_state = AppState::new(store);

    // HTTP server exposing step planning and the aggregated order book
    let router = router(app_state);

    info!("Starting HTTP server at {}...", settings.bind_addr);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
