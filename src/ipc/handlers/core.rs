use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

async fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "latencyMs": state.latency_ms,
            "demoAuth": state.auth.is_demo(),
        }),
    )
}

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req).await),
        _ => None,
    }
}
