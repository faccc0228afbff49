use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::backend::ApiError;

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

pub fn ok(id: &str, result: Value) -> Value {
    json!({ "id": id, "ok": true, "result": result })
}

pub fn err(id: &str, code: &str, message: impl Into<String>, details: Option<Value>) -> Value {
    let body = ErrorBody {
        code: code.to_string(),
        message: message.into(),
        details,
    };
    json!({ "id": id, "ok": false, "error": body })
}

/// Facade failures keep their HTTP-style status under `details.status`.
pub fn api_err(id: &str, e: &ApiError) -> Value {
    let code = match e.status {
        Some(404) => "not_found",
        Some(400) => "validation_failed",
        _ => "api_error",
    };
    let mut details = json!({ "status": e.status });
    if let Some(d) = &e.details {
        details["fields"] = d.clone();
    }
    err(id, code, e.message.clone(), Some(details))
}

pub fn auth_err(id: &str, e: &AuthError) -> Value {
    err(
        id,
        "auth_failed",
        e.to_string(),
        Some(json!({ "reason": e.code() })),
    )
}
