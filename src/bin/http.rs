#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use reno_planner::{PlannerConfig, http_api};
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = PlannerConfig::from_env()?;
    let catalog = config.load_catalog()?;
    let work_calendar = config.load_work_calendar()?;
    tracing::info!(templates = catalog.len(), "template catalog ready");

    println!("reno-planner HTTP API listening on http://{}", config.http_addr);
    let state = http_api::AppState::new(catalog, work_calendar);
    http_api::serve(config.http_addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
