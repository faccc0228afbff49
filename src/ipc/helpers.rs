use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ipc::error::err;
use crate::ipc::types::Request;

/// Required typed param; the error is a ready `bad_params` response.
pub fn param<T: DeserializeOwned>(req: &Request, key: &str) -> Result<T, Value> {
    let Some(raw) = req.params.get(key) else {
        return Err(err(&req.id, "bad_params", format!("missing {key}"), None));
    };
    serde_json::from_value(raw.clone())
        .map_err(|e| err(&req.id, "bad_params", format!("invalid {key}: {e}"), None))
}

/// Optional typed param; present-but-malformed is still an error.
pub fn opt_param<T: DeserializeOwned>(req: &Request, key: &str) -> Result<Option<T>, Value> {
    match req.params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => param(req, key).map(Some),
    }
}
