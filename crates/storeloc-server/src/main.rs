mod api;
mod middleware;

use std::sync::Arc;

use anyhow::Context;
use storeloc_assistant::Assistant;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = storeloc_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let auth = AuthState::new(config.require_api_secret()?);

    let database = storeloc_core::load_database(&config.database_path).with_context(|| {
        format!(
            "loading dataset {} (run `storeloc scrape` first)",
            config.database_path.display()
        )
    })?;
    tracing::info!(
        stores = database.len(),
        path = %config.database_path.display(),
        "dataset loaded"
    );

    let assistant = Assistant::from_config(&config).context("loading assistant models")?;

    let state = AppState {
        database: Arc::new(database),
        assistant: Arc::new(assistant),
    };
    let app = build_app(state, auth);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
