//! Repositories for database operations
//!
//! The services only see the store traits below; `PgStore` is the
//! PostgreSQL implementation wired up in `main`.

use common::{
    Resident, ResidentRepository, ResidentStore, ResidentSummary, Role,
    error::DatabaseResult,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Complaint, ComplaintUpdate, DateRange, NewComplaint, NewShift, Shift};

pub mod complaint;
pub mod shift;

/// Persistence of duty shifts
pub trait ShiftStore: Send + Sync {
    /// Insert the shift unless its (date, shift type) slot is taken.
    ///
    /// Returns `None` when another shift already holds the slot.
    fn insert_shift_if_vacant(
        &self,
        shift: &NewShift,
    ) -> impl Future<Output = DatabaseResult<Option<Shift>>> + Send;

    /// Shifts within `range`, by date then morning, afternoon, night.
    fn list_shifts(
        &self,
        range: DateRange,
    ) -> impl Future<Output = DatabaseResult<Vec<Shift>>> + Send;

    fn find_shift(&self, id: Uuid) -> impl Future<Output = DatabaseResult<Option<Shift>>> + Send;

    /// Point the shift at another assignee. `None` if the shift is gone.
    fn reassign_shift(
        &self,
        id: Uuid,
        police_id: Uuid,
    ) -> impl Future<Output = DatabaseResult<Option<Shift>>> + Send;

    fn delete_shift(&self, id: Uuid) -> impl Future<Output = DatabaseResult<bool>> + Send;
}

/// Persistence of resident complaints
pub trait ComplaintStore: Send + Sync {
    fn insert_complaint(
        &self,
        complaint: &NewComplaint,
    ) -> impl Future<Output = DatabaseResult<Complaint>> + Send;

    /// Complaints newest first, optionally limited to one author.
    fn list_complaints(
        &self,
        resident_id: Option<Uuid>,
    ) -> impl Future<Output = DatabaseResult<Vec<Complaint>>> + Send;

    fn find_complaint(
        &self,
        id: Uuid,
    ) -> impl Future<Output = DatabaseResult<Option<Complaint>>> + Send;

    fn update_complaint(
        &self,
        id: Uuid,
        changes: &ComplaintUpdate,
    ) -> impl Future<Output = DatabaseResult<Option<Complaint>>> + Send;

    fn delete_complaint(&self, id: Uuid)
    -> impl Future<Output = DatabaseResult<bool>> + Send;
}

/// Everything the API handlers need from storage
pub trait Store: ResidentStore + ShiftStore + ComplaintStore + Clone + 'static {}

impl<T> Store for T where T: ResidentStore + ShiftStore + ComplaintStore + Clone + 'static {}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    residents: ResidentRepository,
    pool: PgPool,
}

impl PgStore {
    /// Create a new store on top of a connection pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            residents: ResidentRepository::new(pool.clone()),
            pool,
        }
    }
}

impl ResidentStore for PgStore {
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Resident>> {
        self.residents.find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<Resident>> {
        self.residents.find_by_email(email).await
    }

    async fn list_by_role(&self, role: Role) -> DatabaseResult<Vec<ResidentSummary>> {
        self.residents.list_by_role(role).await
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> DatabaseResult<bool> {
        self.residents.update_password(id, password_hash).await
    }
}
