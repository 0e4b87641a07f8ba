// src/lib.rs

use axum::Router;
use services::upstream::OrderApi;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderApi>,
}

impl AppState {
    pub fn new(orders: Arc<dyn OrderApi>) -> Self {
        Self { orders }
    }
}

pub mod services {
    pub mod formatter;
    pub mod signer;
    pub mod upstream;
}

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

/// HTTP application with every order route mounted.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(handlers::order::routes())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
