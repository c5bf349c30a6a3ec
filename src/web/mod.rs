pub mod handlers;
pub mod page;
pub mod probe;
pub mod request_tracing;

use crate::config::AppConfig;
use crate::domain::model::DashboardData;
use crate::utils::error::{Result, SafeCityError};
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use std::future::Future;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[derive(Clone)]
pub struct AppState {
    pub data: Arc<DashboardData>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(data: DashboardData) -> Self {
        Self {
            data: Arc::new(data),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/healthz", get(handlers::healthz_handler))
        .route("/readyz", get(handlers::readyz_handler))
        .route("/api/boroughs", get(handlers::boroughs_handler))
        .route(
            "/api/boroughs/:borough/major-crimes",
            get(handlers::major_crimes_handler),
        )
        .route("/api/heatmap", get(handlers::heatmap_handler))
        .route("/api/dashboard", get(handlers::dashboard_handler))
        .fallback(handlers::fallback_handler)
        .layer(from_fn_with_state(
            state.clone(),
            request_tracing::request_tracing_middleware,
        ))
        .with_state(state)
}

/// Serves on an already bound listener until `shutdown` resolves.
pub async fn serve_with_shutdown<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| SafeCityError::ServerError {
            message: format!("server failed: {}", e),
        })
}

pub async fn serve(config: &AppConfig, data: DashboardData) -> Result<()> {
    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| SafeCityError::ServerError {
            message: format!("cannot bind {}: {}", address, e),
        })?;
    let local = listener.local_addr()?;
    tracing::info!("🚀 Dashboard listening on http://{}", local);

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(serve_with_shutdown(listener, AppState::new(data), async move {
        let _ = stop_rx.await;
    }));

    tokio::select! {
        joined = &mut server => return flatten_join(joined),
        _ = wait_for_shutdown_signal() => {}
    }

    let grace = config.shutdown_grace();
    tracing::info!("Shutdown requested, draining for up to {:?}", grace);
    let _ = stop_tx.send(());
    match tokio::time::timeout(grace, server).await {
        Ok(joined) => flatten_join(joined)?,
        Err(_) => tracing::warn!("Open connections did not finish within {:?}", grace),
    }

    tracing::info!("Dashboard stopped");
    Ok(())
}

fn flatten_join(joined: std::result::Result<Result<()>, tokio::task::JoinError>) -> Result<()> {
    joined.map_err(|e| SafeCityError::ServerError {
        message: format!("server task failed: {}", e),
    })?
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
