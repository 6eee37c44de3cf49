use anyhow::Context;
use devconnect::{app, db, AppState, Config};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("install tracing subscriber")?;

    // no store, no server
    let db_pool = db::connect(&config.database_url).await.inspect_err(|e| {
        tracing::error!(error = %e, "storage unavailable");
    })?;

    let app = app(AppState::new(db_pool, &config.jwt_secret), &config.allowed_origin)?;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("bind port {}", config.port))?;
    tracing::info!(port = config.port, origin = %config.allowed_origin, "devconnect listening");

    axum::serve(listener, app).await?;
    Ok(())
}
