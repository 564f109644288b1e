//! Admin API: group status and on-demand probes.
//!
//! ```text
//! GET /admin/status                 → version and group count
//! GET /admin/groups                 → status snapshot of every group
//! GET /admin/groups/{name}          → one snapshot
//! GET /admin/groups/{name}/delay    → probe now (?url= overrides the test URL)
//! ```

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::group::UrlTestGroup;

/// State injected into admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub groups: Arc<[Arc<UrlTestGroup>]>,
    pub api_key: Arc<str>,
}

impl AdminState {
    pub fn new(groups: Vec<Arc<UrlTestGroup>>, api_key: &str) -> Self {
        Self {
            groups: groups.into(),
            api_key: api_key.into(),
        }
    }
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/groups", get(list_groups))
        .route("/admin/groups/{name}", get(get_group))
        .route("/admin/groups/{name}/delay", get(probe_group))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the admin API until shutdown is broadcast.
pub async fn serve(
    listener: TcpListener,
    state: AdminState,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Admin API listening");

    axum::serve(listener, setup_admin_router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!("Admin API stopped");
    Ok(())
}
