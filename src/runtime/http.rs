//! HTTP transport over axum.
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/get_slaves?amount=N&duration=D` | Lease `N` workers for `D` seconds |
//! | GET | `/health` | Pool counts |

use std::future::Future;
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{LeaseError, LeasePool};
use crate::runtime::api::{self, ErrorResponse, LeaseQuery};

/// Shared state for handlers.
#[derive(Clone)]
pub struct AppState {
    /// The pool every request is served from.
    pub pool: Arc<LeasePool>,
}

/// Build the router serving `pool`.
pub fn build_router(pool: Arc<LeasePool>) -> Router {
    Router::new()
        .route("/get_slaves", get(lease_workers))
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(AppState { pool })
}

/// Serve `pool` on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns the I/O error that stopped the listener.
pub async fn serve<F>(listener: TcpListener, pool: Arc<LeasePool>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, capacity = pool.capacity(), "lease pool server started");
    axum::serve(listener, build_router(pool))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("lease pool server stopped");
    Ok(())
}

fn error_response(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: msg.into() })).into_response()
}

impl IntoResponse for LeaseError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        error_response(status, self.to_string())
    }
}

/// GET /get_slaves
async fn lease_workers(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let Ok(Query(pairs)) = pairs else {
        return LeaseError::NotAnInteger.into_response();
    };
    let query = LeaseQuery::from_pairs(pairs);
    match api::submit_lease(&state.pool, &query) {
        Ok(resp) => Json(resp).into_response(),
        Err(e) => {
            warn!(error = %e, ?query, "rejected lease request");
            e.into_response()
        }
    }
}

/// GET /health
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(api::health(&state.pool))
}

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Endpoint not found")
}
