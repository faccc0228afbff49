mod client;
mod local;
mod mock;

pub use client::ApiClient;
pub use local::LocalBackend;
pub use mock::{
    dispatch, Method, MockBackend, MockRequest, MockResponse, MockServer, DEFAULT_LATENCY,
    STUDENTS_PATH,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{Student, StudentDraft, StudentId, StudentPatch};
use crate::store::{SharedStore, StoreError, StudentStore};

pub const DELETED_MESSAGE: &str = "Student deleted successfully";
pub const RESET_MESSAGE: &str = "Data reset to defaults successfully";
pub const NOT_FOUND_MESSAGE: &str = "Student not found";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: u16,
}

impl<T> ApiResponse<T> {
    pub fn new(status: u16, data: T) -> Self {
        Self { data, status }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ApiError::new(Some(404), NOT_FOUND_MESSAGE),
            StoreError::IdsExhausted => {
                ApiError::new(Some(409), StoreError::IdsExhausted.to_string())
            }
            StoreError::Validation(errs) => ApiError {
                status: Some(400),
                message: "Validation failed".into(),
                details: serde_json::to_value(&errs).ok(),
            },
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteReceipt {
    pub message: String,
    pub student: Student,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetReceipt {
    pub message: String,
    pub students: Vec<Student>,
}

/// Everything the facade needs from a roster backend. The mock and direct
/// backends both implement it; a networked one would too.
#[async_trait]
pub trait StudentBackend: Send + Sync {
    async fn list(&self) -> ApiResult<Vec<Student>>;
    async fn create(&self, draft: StudentDraft) -> ApiResult<Student>;
    async fn update(&self, id: StudentId, patch: StudentPatch) -> ApiResult<Student>;
    async fn delete(&self, id: StudentId) -> ApiResult<DeleteReceipt>;
    async fn reset(&self) -> ApiResult<ResetReceipt>;
}

/// Runs `f` against the shared store. The guard never outlives the call, so
/// it is never held across an await. Store operations only touch the roster
/// after their checks pass, so a poisoned lock still guards a usable roster.
pub(crate) fn with_store<T>(
    store: &SharedStore,
    f: impl FnOnce(&mut StudentStore) -> T,
) -> Result<T, ApiError> {
    let mut guard = store.lock().unwrap_or_else(|poisoned| {
        warn!("student store lock was poisoned; recovering");
        poisoned.into_inner()
    });
    Ok(f(&mut guard))
}
