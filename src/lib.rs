//! Client records service
//!
//! CRUD over clients keyed by CPF, plus a proxy to the delivery service.

pub mod config;
pub mod cpf;
pub mod db;
pub mod delivery;
pub mod error;
pub mod http;
pub mod models;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::db::ClientStore;
use crate::delivery::DeliveryService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub clients: Arc<dyn ClientStore>,
    pub delivery: Arc<dyn DeliveryService>,
}

impl AppState {
    pub fn new(clients: Arc<dyn ClientStore>, delivery: Arc<dyn DeliveryService>) -> Self {
        Self { clients, delivery }
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Documentation
        .route("/", get(http::docs::home))
        .route("/openapi", get(http::docs::openapi))
        // Client endpoints
        .route("/cadastrar_cliente", post(http::clients::create_client))
        .route("/buscar_clientes", get(http::clients::list_clients))
        .route("/buscar_cliente_cpf", get(http::clients::find_client))
        .route("/deletar_cliente", delete(http::clients::delete_client))
        .route("/atualizar_cliente", put(http::clients::update_client))
        // Delivery proxy endpoints
        .route(
            "/confirmar_recebimento_entrega",
            post(http::delivery::confirm_delivery).put(http::delivery::confirm_delivery),
        )
        .route(
            "/status_pedido",
            get(http::delivery::delivery_status).post(http::delivery::delivery_status),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the server, returning once `shutdown` resolves
pub async fn serve<F>(addr: &str, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Client service listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
