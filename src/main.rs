use dotenvy::dotenv;
use snafu::ResultExt;
use tokio::net::TcpListener;
use tokio::signal;

use vidhub::api::{create_app, create_router};
use vidhub::config::Config;
use vidhub::database::Database;
use vidhub::error::{
    ApplicationError, BindAddressSnafu, ConnectDatabaseSnafu, SeedSnafu, WebServerSnafu,
};
use vidhub::logger;
use vidhub::seed::Fixtures;

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    dotenv().ok();

    let config = Config::from_env()?;

    let _guard = logger::init(&config)?;

    let database = Database::connect(&config.database)
        .await
        .context(ConnectDatabaseSnafu)?;

    if let Some(path) = &config.seed_file {
        let fixtures = Fixtures::load(path).await.context(SeedSnafu { path })?;
        fixtures
            .apply(&database, &config.videos)
            .await
            .context(SeedSnafu { path })?;
    }

    let app = create_app(database, config.videos.clone(), config.authenticator());
    let router = create_router(app);

    let listener = TcpListener::bind(config.host)
        .await
        .context(BindAddressSnafu {
            address: config.host,
        })?;
    tracing::info!(address = %config.host, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context(WebServerSnafu)?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!(%error, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        tracing::info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                tracing::info!("received SIGTERM, shutting down");
            }
            Err(error) => {
                tracing::error!(%error, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
