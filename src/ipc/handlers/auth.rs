use crate::ipc::error::{auth_err, ok};
use crate::ipc::helpers::param;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn credentials(req: &Request) -> Result<(String, String), serde_json::Value> {
    let email: String = param(req, "email")?;
    let password: String = param(req, "password")?;
    Ok((email.trim().to_string(), password))
}

async fn handle_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (email, password) = match credentials(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.auth.login(&email, &password).await {
        Ok(user) => ok(&req.id, json!({ "user": user })),
        Err(e) => auth_err(&req.id, &e),
    }
}

async fn handle_signup(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (email, password) = match credentials(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.auth.signup(&email, &password).await {
        Ok(user) => ok(&req.id, json!({ "user": user })),
        Err(e) => auth_err(&req.id, &e),
    }
}

fn handle_demo_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    match state.auth.demo_login() {
        Ok(user) => ok(&req.id, json!({ "user": user })),
        Err(e) => auth_err(&req.id, &e),
    }
}

async fn handle_logout(state: &mut AppState, req: &Request) -> serde_json::Value {
    match state.auth.logout().await {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => auth_err(&req.id, &e),
    }
}

fn handle_current(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "user": state.auth.current_user() }))
}

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "auth.login" => Some(handle_login(state, req).await),
        "auth.signup" => Some(handle_signup(state, req).await),
        "auth.demoLogin" => Some(handle_demo_login(state, req)),
        "auth.logout" => Some(handle_logout(state, req).await),
        "auth.current" => Some(handle_current(state, req)),
        _ => None,
    }
}
