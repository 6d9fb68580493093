#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use chrono::Local;
    use daily_dashboard::{DashboardConfig, SqliteEntityStore, http_api, seed_if_empty};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daily_dashboard=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DashboardConfig::from_env()?;
    tracing::info!(database = ?config.database, location = %config.location, "starting dashboard");

    let store = SqliteEntityStore::open(&config.database)?;
    if config.seed_sample_data {
        seed_if_empty(&store, Local::now().naive_local())?;
    }

    let state = http_api::AppState::new(store).with_location(config.location.clone());
    http_api::serve(config.http_addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
