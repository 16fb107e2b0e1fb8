use skillswap::{auth::Identity, config::Config, docs::Docs, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;

    let docs = Docs::connect(&config.database_url, config.max_connections).await?;
    let identity = Identity::new(&config.identity_url, &config.firebase_api_key);
    let app_state = AppState::new(docs, identity);

    let app = skillswap::app(app_state, &config.cors_origins)?;
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
