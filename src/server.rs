use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::gate::{install_quiet_hook, Gate};
use crate::handlers;
use crate::middleware::route_gate_middleware;

/// Full service: frontend bundle behind the gate, plus /health
pub fn app(gate: Arc<Gate>, server: &ServerConfig) -> Router {
    // Unknown paths get index.html so client-side routes still render
    let index = server.static_dir.join("index.html");
    let bundle = ServeDir::new(&server.static_dir).fallback(ServeFile::new(index));

    let mut app = gated(Router::new().fallback_service(bundle), gate);

    if server.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }
    if server.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}

/// Put `pages` (routes and fallback) behind the gate and add /health
pub fn gated(pages: Router, gate: Arc<Gate>) -> Router {
    install_quiet_hook();

    let service_routes = Router::new()
        .route("/health", get(handlers::health))
        .with_state(gate.clone());

    pages
        .merge(service_routes)
        .layer(middleware::from_fn_with_state(gate, route_gate_middleware))
}
