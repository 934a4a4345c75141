use log::info;
use tokio::{net::TcpListener, signal};

use crate::api::{router, routes::AppState};
use crate::config::ServerConfig;
use crate::db::pool::{connect, ensure_schema};

pub async fn start_server(config: ServerConfig) -> Result<(), String> {
    info!("Connecting to database...");
    let pool = connect(&config.database_url()?, config.pool_size).await?;
    ensure_schema(&pool).await?;

    let app = router(AppState {
        pool: pool.clone(),
        mode: config.mode,
    });

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", address, e))?;

    info!("Server running on port {}", config.port);
    info!("Environment: {}", config.mode);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| e.to_string())?;

    pool.close().await;
    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
