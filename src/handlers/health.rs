use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::gate::Gate;

/// GET /health - liveness plus a summary of the loaded route table
pub async fn health(State(gate): State<Arc<Gate>>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "version": env!("CARGO_PKG_VERSION"),
            "route_rules": gate.table().len(),
            "public_routes": gate.public_routes().paths().len(),
        }
    }))
}
