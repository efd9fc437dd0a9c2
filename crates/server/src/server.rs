use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};

use std::{future::Future, sync::Arc};

use crate::{categories, operations};
use engine::Engine;

pub(crate) const CATEGORIES_PATH: &str = "/api/categories";
pub(crate) const OPERATIONS_PATH: &str = "/api/operations";

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

async fn heartbeat() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Every route of the service, mounted under `/api`.
pub fn router(state: ServerState) -> Router {
    let api = Router::new()
        .route("/heartbeat", get(heartbeat))
        .route(
            "/categories",
            post(categories::create).get(categories::list_all),
        )
        .route(
            "/categories/one/{uuid}",
            get(categories::get)
                .patch(categories::update)
                .delete(categories::delete),
        )
        .route(
            "/categories/user_uuid/{user_uuid}",
            get(categories::list_by_user),
        )
        .route("/categories/name/{name}", get(categories::get_by_name))
        .route("/operations", post(operations::create))
        .route(
            "/operations/one/{uuid}",
            get(operations::get)
                .patch(operations::update)
                .delete(operations::delete),
        );

    Router::new().nest("/api", api).with_state(state)
}

/// Serve until `shutdown` resolves; in-flight requests are drained first.
pub async fn run_with_listener<F>(
    engine: Engine,
    listener: tokio::net::TcpListener,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
