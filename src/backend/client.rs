use std::sync::Arc;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use super::{ApiResult, DeleteReceipt, ResetReceipt, StudentBackend};
use crate::model::{Student, StudentDraft, StudentId, StudentPatch};

/// The only roster surface UI code talks to. Swapping the backend does not
/// change anything above this type.
#[derive(Clone)]
pub struct ApiClient {
    backend: Arc<dyn StudentBackend>,
}

async fn traced<T>(op: &'static str, fut: impl std::future::Future<Output = ApiResult<T>>) -> ApiResult<T> {
    let request_id = Uuid::new_v4();
    let span = info_span!("api", op, %request_id);
    async move {
        let result = fut.await;
        match &result {
            Ok(resp) => debug!(status = resp.status, "ok"),
            Err(e) => warn!(status = ?e.status, error = %e.message, "failed"),
        }
        result
    }
    .instrument(span)
    .await
}

impl ApiClient {
    pub fn new(backend: impl StudentBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn from_shared(backend: Arc<dyn StudentBackend>) -> Self {
        Self { backend }
    }

    pub async fn get_students(&self) -> ApiResult<Vec<Student>> {
        traced("getStudents", self.backend.list()).await
    }

    pub async fn add_student(&self, student: StudentDraft) -> ApiResult<Student> {
        traced("addStudent", self.backend.create(student)).await
    }

    pub async fn update_student(&self, id: StudentId, student: StudentPatch) -> ApiResult<Student> {
        traced("updateStudent", self.backend.update(id, student)).await
    }

    pub async fn delete_student(&self, id: StudentId) -> ApiResult<DeleteReceipt> {
        traced("deleteStudent", self.backend.delete(id)).await
    }

    pub async fn reset_data(&self) -> ApiResult<ResetReceipt> {
        traced("resetData", self.backend.reset()).await
    }
}
