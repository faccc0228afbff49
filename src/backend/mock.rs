use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use super::{
    with_store, ApiError, ApiResponse, ApiResult, DeleteReceipt, ResetReceipt, StudentBackend,
    DELETED_MESSAGE, NOT_FOUND_MESSAGE, RESET_MESSAGE,
};
use crate::model::{Student, StudentDraft, StudentId, StudentPatch};
use crate::store::{SharedStore, StoreError, StudentStore};

pub const STUDENTS_PATH: &str = "/api/students";
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockRequest {
    pub method: Method,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl MockRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl MockResponse {
    fn new(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self::new(status, json!({ "error": message.into() }))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

enum Route {
    Collection,
    Item(StudentId),
}

fn route(path: &str) -> Option<Route> {
    let path = path.split('?').next().unwrap_or_default();
    let rest = path.strip_prefix(STUDENTS_PATH)?;
    if rest.is_empty() {
        return Some(Route::Collection);
    }
    let id = rest.strip_prefix('/')?;
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok().map(Route::Item)
}

fn body_of<T: DeserializeOwned>(req: &MockRequest) -> Result<T, MockResponse> {
    let Some(body) = req.body.clone() else {
        return Err(MockResponse::error(400, "request body required"));
    };
    serde_json::from_value(body)
        .map_err(|e| MockResponse::error(400, format!("invalid request body: {e}")))
}

fn store_error(e: StoreError) -> MockResponse {
    match e {
        StoreError::NotFound(_) => MockResponse::error(404, NOT_FOUND_MESSAGE),
        StoreError::IdsExhausted => {
            MockResponse::error(409, StoreError::IdsExhausted.to_string())
        }
        StoreError::Validation(errs) => MockResponse::new(
            400,
            json!({ "error": "Validation failed", "details": errs }),
        ),
    }
}

fn to_body<T: Serialize>(status: u16, value: &T) -> MockResponse {
    match serde_json::to_value(value) {
        Ok(body) => MockResponse::new(status, body),
        Err(e) => MockResponse::error(500, format!("failed to encode response: {e}")),
    }
}

/// Maps one verb+path request onto the store. Synchronous; latency is the
/// server's concern.
pub fn dispatch(store: &mut StudentStore, req: &MockRequest) -> MockResponse {
    let resp = match (req.method, route(&req.path)) {
        (Method::Get, Some(Route::Collection)) => to_body(200, &store.list()),
        (Method::Post, Some(Route::Collection)) => match body_of::<StudentDraft>(req) {
            Ok(draft) => match store.create(draft) {
                Ok(s) => to_body(201, &s),
                Err(e) => store_error(e),
            },
            Err(resp) => resp,
        },
        (Method::Put, Some(Route::Item(id))) => match body_of::<StudentPatch>(req) {
            Ok(patch) => match store.update(id, patch) {
                Ok(s) => to_body(200, &s),
                Err(e) => store_error(e),
            },
            Err(resp) => resp,
        },
        (Method::Delete, Some(Route::Item(id))) => match store.delete(id) {
            Ok(student) => to_body(
                200,
                &DeleteReceipt {
                    message: DELETED_MESSAGE.into(),
                    student,
                },
            ),
            Err(e) => store_error(e),
        },
        _ => MockResponse::error(404, format!("no mock route for {} {}", req.method, req.path)),
    };
    debug!(method = %req.method, path = %req.path, status = resp.status, "mock request handled");
    resp
}

/// Request layer over the shared store with a fixed artificial latency on
/// every response.
#[derive(Clone)]
pub struct MockServer {
    store: SharedStore,
    latency: Duration,
}

impl MockServer {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            latency: DEFAULT_LATENCY,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub async fn handle(&self, req: MockRequest) -> MockResponse {
        let resp = match with_store(&self.store, |store| dispatch(store, &req)) {
            Ok(resp) => resp,
            Err(e) => MockResponse::error(500, e.message),
        };
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        resp
    }
}

/// Backend that goes through the request layer, so callers see the same
/// status codes and latency a remote roster service would give them.
#[derive(Clone)]
pub struct MockBackend {
    server: MockServer,
}

impl MockBackend {
    pub fn new(server: MockServer) -> Self {
        Self { server }
    }

    async fn send<T: DeserializeOwned>(&self, req: MockRequest) -> ApiResult<T> {
        let resp = self.server.handle(req).await;
        if !resp.is_success() {
            let message = resp
                .body
                .get("error")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request failed with status code {}", resp.status));
            return Err(ApiError {
                status: Some(resp.status),
                message,
                details: resp.body.get("details").cloned(),
            });
        }
        match serde_json::from_value(resp.body) {
            Ok(data) => Ok(ApiResponse::new(resp.status, data)),
            Err(e) => {
                warn!(error = %e, "mock response did not decode");
                Err(ApiError::new(
                    Some(resp.status),
                    format!("unexpected response body: {e}"),
                ))
            }
        }
    }

    fn encode<T: Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
        serde_json::to_value(value)
            .map_err(|e| ApiError::new(None, format!("failed to encode request: {e}")))
    }
}

#[async_trait]
impl StudentBackend for MockBackend {
    async fn list(&self) -> ApiResult<Vec<Student>> {
        self.send(MockRequest::new(Method::Get, STUDENTS_PATH)).await
    }

    async fn create(&self, draft: StudentDraft) -> ApiResult<Student> {
        let body = Self::encode(&draft)?;
        self.send(MockRequest::new(Method::Post, STUDENTS_PATH).with_body(body))
            .await
    }

    async fn update(&self, id: StudentId, patch: StudentPatch) -> ApiResult<Student> {
        let body = Self::encode(&patch)?;
        self.send(MockRequest::new(Method::Put, format!("{STUDENTS_PATH}/{id}")).with_body(body))
            .await
    }

    async fn delete(&self, id: StudentId) -> ApiResult<DeleteReceipt> {
        self.send(MockRequest::new(Method::Delete, format!("{STUDENTS_PATH}/{id}")))
            .await
    }

    /// Reset is not an HTTP route: it resolves immediately against the store.
    async fn reset(&self) -> ApiResult<ResetReceipt> {
        let students = with_store(self.server.store(), |store| store.reset())?;
        Ok(ApiResponse::new(
            200,
            ResetReceipt {
                message: RESET_MESSAGE.into(),
                students,
            },
        ))
    }
}
