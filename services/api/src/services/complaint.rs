//! Complaint tracker: residents file complaints, staff respond

use common::ResidentStore;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        Complaint, ComplaintUpdate, CreateComplaintRequest, NewComplaint,
        complaint::DEFAULT_STATUS,
    },
    repositories::ComplaintStore,
};

const COMPLAINT_NOT_FOUND: &str = "Complaint not found";
const RESIDENT_NOT_FOUND: &str = "Resident not found";

#[derive(Clone)]
pub struct ComplaintTracker<S> {
    store: S,
}

impl<S> ComplaintTracker<S>
where
    S: ResidentStore + ComplaintStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// File a complaint on behalf of `resident_id`
    pub async fn create(
        &self,
        resident_id: Uuid,
        request: CreateComplaintRequest,
    ) -> ApiResult<Complaint> {
        if self.store.find_by_id(resident_id).await?.is_none() {
            return Err(ApiError::NotFound(RESIDENT_NOT_FOUND.to_string()));
        }

        let title = request.title.trim();
        let message = request.message.trim();
        if title.is_empty() {
            return Err(ApiError::BadRequest("Title must not be empty".to_string()));
        }
        if message.is_empty() {
            return Err(ApiError::BadRequest("Message must not be empty".to_string()));
        }

        let complaint = NewComplaint {
            resident_id,
            title: title.to_string(),
            message: message.to_string(),
            status: request
                .status
                .filter(|status| !status.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            target_role: request.target_role,
        };

        let created = self.store.insert_complaint(&complaint).await?;
        info!("Complaint {} filed by {}", created.id, resident_id);
        Ok(created)
    }

    /// All complaints, newest first
    pub async fn find_all(&self, resident_id: Option<Uuid>) -> ApiResult<Vec<Complaint>> {
        Ok(self.store.list_complaints(resident_id).await?)
    }

    pub async fn find_by_resident(&self, resident_id: Uuid) -> ApiResult<Vec<Complaint>> {
        self.find_all(Some(resident_id)).await
    }

    pub async fn find_one(&self, id: Uuid) -> ApiResult<Complaint> {
        self.store
            .find_complaint(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(COMPLAINT_NOT_FOUND.to_string()))
    }

    /// Change status and/or response. Any status string is accepted.
    pub async fn update(&self, id: Uuid, changes: ComplaintUpdate) -> ApiResult<Complaint> {
        let updated = self
            .store
            .update_complaint(id, &changes)
            .await?
            .ok_or_else(|| ApiError::NotFound(COMPLAINT_NOT_FOUND.to_string()))?;

        info!("Complaint {} is now {}", id, updated.status);
        Ok(updated)
    }

    pub async fn remove(&self, id: Uuid) -> ApiResult<()> {
        if !self.store.delete_complaint(id).await? {
            return Err(ApiError::NotFound(COMPLAINT_NOT_FOUND.to_string()));
        }

        info!("Complaint {} removed", id);
        Ok(())
    }
}
