use payment_order_gateway::{
    app,
    config::Config,
    services::{signer::Keystore, upstream::PilvytisClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,payment_order_gateway=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let keystore = Keystore::from_private_keys(&config.identity_keys)?;
    if keystore.is_empty() {
        tracing::warn!("No identity keys configured; every upstream call will fail to sign");
    }
    for identity in keystore.identities() {
        tracing::info!(identity = %identity, "Serving identity");
    }

    let client = PilvytisClient::new(
        &config.pilvytis_url,
        config.upstream_timeout,
        Arc::new(keystore),
    )?;
    tracing::info!(upstream = %client.base_url(), "Payment service client ready");

    let state = AppState::new(Arc::new(client));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
