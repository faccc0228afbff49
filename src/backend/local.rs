use async_trait::async_trait;

use super::{
    with_store, ApiResponse, ApiResult, DeleteReceipt, ResetReceipt, StudentBackend,
    DELETED_MESSAGE, RESET_MESSAGE,
};
use crate::model::{Student, StudentDraft, StudentId, StudentPatch};
use crate::store::SharedStore;

/// Calls the store directly: same status mapping as the mock backend, no
/// latency and no JSON hop.
#[derive(Clone)]
pub struct LocalBackend {
    store: SharedStore,
}

impl LocalBackend {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StudentBackend for LocalBackend {
    async fn list(&self) -> ApiResult<Vec<Student>> {
        let students = with_store(&self.store, |s| s.list().to_vec())?;
        Ok(ApiResponse::new(200, students))
    }

    async fn create(&self, draft: StudentDraft) -> ApiResult<Student> {
        let student = with_store(&self.store, |s| s.create(draft))??;
        Ok(ApiResponse::new(201, student))
    }

    async fn update(&self, id: StudentId, patch: StudentPatch) -> ApiResult<Student> {
        let student = with_store(&self.store, |s| s.update(id, patch))??;
        Ok(ApiResponse::new(200, student))
    }

    async fn delete(&self, id: StudentId) -> ApiResult<DeleteReceipt> {
        let student = with_store(&self.store, |s| s.delete(id))??;
        Ok(ApiResponse::new(
            200,
            DeleteReceipt {
                message: DELETED_MESSAGE.into(),
                student,
            },
        ))
    }

    async fn reset(&self) -> ApiResult<ResetReceipt> {
        let students = with_store(&self.store, |s| s.reset())?;
        Ok(ApiResponse::new(
            200,
            ResetReceipt {
                message: RESET_MESSAGE.into(),
                students,
            },
        ))
    }
}
