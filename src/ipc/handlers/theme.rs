use crate::ipc::error::{err, ok};
use crate::ipc::helpers::param;
use crate::ipc::types::{AppState, Request};
use crate::theme::Theme;
use serde_json::json;

fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "theme": state.theme.get() }))
}

fn handle_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    let theme: Theme = match param(req, "theme") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.theme.set(theme) {
        Ok(()) => ok(&req.id, json!({ "theme": theme })),
        Err(e) => err(&req.id, "storage_failed", e.to_string(), None),
    }
}

fn handle_toggle(state: &mut AppState, req: &Request) -> serde_json::Value {
    match state.theme.toggle() {
        Ok(theme) => ok(&req.id, json!({ "theme": theme })),
        Err(e) => err(&req.id, "storage_failed", e.to_string(), None),
    }
}

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "theme.get" => Some(handle_get(state, req)),
        "theme.set" => Some(handle_set(state, req)),
        "theme.toggle" => Some(handle_toggle(state, req)),
        _ => None,
    }
}
