//! Shift scheduler: security staff duty slots

use common::{ResidentStore, ResidentSummary, Role};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{DateRange, NewShift, Shift, ShiftType, shift::parse_shift_date},
    repositories::ShiftStore,
};

const GUARD_NOT_FOUND: &str = "Security guard not found";
const NOT_A_GUARD: &str = "Assignee must be a security guard";
const SLOT_TAKEN: &str = "This shift slot is already assigned";
const SHIFT_NOT_FOUND: &str = "Shift not found";

/// Assigns police residents to (date, shift type) slots
#[derive(Clone)]
pub struct ShiftScheduler<S> {
    store: S,
}

impl<S> ShiftScheduler<S>
where
    S: ResidentStore + ShiftStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Book a slot for a police resident.
    ///
    /// The slot check and the insert are one statement, so of two racing
    /// requests for the same slot exactly one succeeds.
    pub async fn create(
        &self,
        police_id: Uuid,
        date: &str,
        shift_type: ShiftType,
    ) -> ApiResult<Shift> {
        self.ensure_assignable(police_id).await?;

        let shift = NewShift {
            date: parse_shift_date(date)?,
            shift_type,
            police_id,
        };

        match self.store.insert_shift_if_vacant(&shift).await? {
            Some(created) => {
                info!(
                    "Scheduled {} on {} for {}",
                    created.shift_type, created.date, created.police_id
                );
                Ok(created)
            }
            None => {
                warn!("Slot {} {} is already taken", shift.date, shift.shift_type);
                Err(ApiError::BadRequest(SLOT_TAKEN.to_string()))
            }
        }
    }

    /// Shifts between two days, both ends inclusive and optional
    pub async fn find_all(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> ApiResult<Vec<Shift>> {
        let range = DateRange {
            start: start_date.map(parse_shift_date).transpose()?,
            end: end_date.map(parse_shift_date).transpose()?,
        };

        Ok(self.store.list_shifts(range).await?)
    }

    pub async fn find_one(&self, id: Uuid) -> ApiResult<Shift> {
        self.store
            .find_shift(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(SHIFT_NOT_FOUND.to_string()))
    }

    /// Reassign a shift. Date and shift type never change.
    pub async fn update(&self, id: Uuid, police_id: Option<Uuid>) -> ApiResult<Shift> {
        let current = self.find_one(id).await?;

        let Some(police_id) = police_id else {
            return Ok(current);
        };

        self.ensure_assignable(police_id).await?;

        let updated = self
            .store
            .reassign_shift(id, police_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(SHIFT_NOT_FOUND.to_string()))?;

        info!("Shift {} reassigned to {}", id, police_id);
        Ok(updated)
    }

    pub async fn remove(&self, id: Uuid) -> ApiResult<()> {
        if !self.store.delete_shift(id).await? {
            return Err(ApiError::NotFound(SHIFT_NOT_FOUND.to_string()));
        }

        info!("Shift {} removed", id);
        Ok(())
    }

    /// Residents who can be put on duty, by name
    pub async fn police_list(&self) -> ApiResult<Vec<ResidentSummary>> {
        Ok(self.store.list_by_role(Role::Police).await?)
    }

    async fn ensure_assignable(&self, police_id: Uuid) -> ApiResult<()> {
        let resident = self
            .store
            .find_by_id(police_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(GUARD_NOT_FOUND.to_string()))?;

        if !resident.role.is_assignable_to_shift() {
            warn!(
                "Resident {} with role {} cannot hold a shift",
                resident.id, resident.role
            );
            return Err(ApiError::BadRequest(NOT_A_GUARD.to_string()));
        }

        Ok(())
    }
}
