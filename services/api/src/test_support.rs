//! Shared fixtures for unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{NaiveDate, Utc};
use common::{
    Claims, Resident, ResidentStore, ResidentSummary, Role,
    database::{self, DatabaseConfig},
    error::{DatabaseError, DatabaseResult},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    middleware::TokenVerifier,
    models::{Complaint, ComplaintUpdate, DateRange, NewComplaint, NewShift, Shift},
    repositories::{ComplaintStore, PgStore, ShiftStore},
};

pub const TEST_PRIVATE_KEY: &str = include_str!("../../../fixtures/jwt/test_rsa_private.pem");
pub const TEST_PUBLIC_KEY: &str = include_str!("../../../fixtures/jwt/test_rsa_public.pem");
pub const OTHER_PRIVATE_KEY: &str = include_str!("../../../fixtures/jwt/other_rsa_private.pem");

pub fn test_verifier() -> TokenVerifier {
    TokenVerifier::new(TEST_PUBLIC_KEY).unwrap()
}

/// Sign an access token for `resident` the way the auth service does
pub fn token_for(resident: &Resident, private_key: &str, ttl_secs: i64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let claims = Claims {
        sub: resident.id,
        email: resident.email.clone(),
        role: resident.role,
        iat: now,
        exp: now.saturating_add_signed(ttl_secs),
    };
    let key = EncodingKey::from_rsa_pem(private_key.as_bytes()).unwrap();
    encode(&Header::new(Algorithm::RS256), &claims, &key).unwrap()
}

pub fn resident(full_name: &str, role: Role) -> Resident {
    let id = Uuid::new_v4();
    Resident {
        id,
        full_name: full_name.to_string(),
        phone: "0987654321".to_string(),
        email: format!("{}@bluemoon.vn", id.simple()),
        password: "unused".to_string(),
        role,
        apartment_id: Some("B204".to_string()),
        id_number: "001090000002".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1988, 11, 2).unwrap(),
        temporary_status: false,
    }
}

/// Store over the database named by `DATABASE_URL`, migrated
pub async fn pg_store() -> (PgStore, PgPool) {
    let config = DatabaseConfig::from_env().unwrap();
    let pool = database::init_pool(&config).await.unwrap();
    database::run_migrations(&pool).await.unwrap();
    (PgStore::new(pool.clone()), pool)
}

/// Insert a resident row and return its id
pub async fn insert_resident(pool: &PgPool, full_name: &str, role: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO residents (full_name, phone, email, password, role, id_number, birth_date)
        VALUES ($1, '0900000000', $2, 'unused', $3, '001090000003', '1991-03-04')
        RETURNING id
        "#,
    )
    .bind(full_name)
    .bind(format!("{}@bluemoon.test", Uuid::new_v4().simple()))
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[derive(Default)]
struct Tables {
    residents: HashMap<Uuid, Resident>,
    shifts: Vec<Shift>,
    /// Insertion order, oldest first
    complaints: Vec<Complaint>,
}

impl Tables {
    fn summary(&self, id: Uuid) -> DatabaseResult<ResidentSummary> {
        self.residents
            .get(&id)
            .map(Resident::summary)
            .ok_or_else(|| DatabaseError::Decode(format!("dangling resident reference {id}")))
    }
}

/// Store kept in memory, one lock for all tables
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn with_residents(residents: impl IntoIterator<Item = Resident>) -> Self {
        let store = Self::default();
        store
            .inner
            .lock()
            .unwrap()
            .residents
            .extend(residents.into_iter().map(|r| (r.id, r)));
        store
    }
}

impl ResidentStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Resident>> {
        Ok(self.inner.lock().unwrap().residents.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<Resident>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .residents
            .values()
            .find(|r| r.email == email)
            .cloned())
    }

    async fn list_by_role(&self, role: Role) -> DatabaseResult<Vec<ResidentSummary>> {
        let mut found: Vec<ResidentSummary> = self
            .inner
            .lock()
            .unwrap()
            .residents
            .values()
            .filter(|r| r.role == role)
            .map(Resident::summary)
            .collect();
        found.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(found)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> DatabaseResult<bool> {
        match self.inner.lock().unwrap().residents.get_mut(&id) {
            Some(resident) => {
                resident.password = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl ShiftStore for MemoryStore {
    async fn insert_shift_if_vacant(&self, shift: &NewShift) -> DatabaseResult<Option<Shift>> {
        let mut tables = self.inner.lock().unwrap();
        if tables
            .shifts
            .iter()
            .any(|s| s.date == shift.date && s.shift_type == shift.shift_type)
        {
            return Ok(None);
        }

        let now = Utc::now();
        let created = Shift {
            id: Uuid::new_v4(),
            date: shift.date,
            shift_type: shift.shift_type,
            police_id: shift.police_id,
            police: tables.summary(shift.police_id)?,
            created_at: now,
            updated_at: now,
        };
        tables.shifts.push(created.clone());
        Ok(Some(created))
    }

    async fn list_shifts(&self, range: DateRange) -> DatabaseResult<Vec<Shift>> {
        let mut found: Vec<Shift> = self
            .inner
            .lock()
            .unwrap()
            .shifts
            .iter()
            .filter(|s| {
                range.start.is_none_or(|start| s.date >= start)
                    && range.end.is_none_or(|end| s.date <= end)
            })
            .cloned()
            .collect();
        found.sort_by_key(|s| (s.date, s.shift_type));
        Ok(found)
    }

    async fn find_shift(&self, id: Uuid) -> DatabaseResult<Option<Shift>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .shifts
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn reassign_shift(&self, id: Uuid, police_id: Uuid) -> DatabaseResult<Option<Shift>> {
        let mut tables = self.inner.lock().unwrap();
        let police = tables.summary(police_id)?;
        let Some(shift) = tables.shifts.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };

        shift.police_id = police_id;
        shift.police = police;
        shift.updated_at = Utc::now();
        Ok(Some(shift.clone()))
    }

    async fn delete_shift(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut tables = self.inner.lock().unwrap();
        let before = tables.shifts.len();
        tables.shifts.retain(|s| s.id != id);
        Ok(tables.shifts.len() < before)
    }
}

impl ComplaintStore for MemoryStore {
    async fn insert_complaint(&self, complaint: &NewComplaint) -> DatabaseResult<Complaint> {
        let mut tables = self.inner.lock().unwrap();
        let now = Utc::now();
        let created = Complaint {
            id: Uuid::new_v4(),
            resident_id: complaint.resident_id,
            title: complaint.title.clone(),
            message: complaint.message.clone(),
            status: complaint.status.clone(),
            response_text: None,
            target_role: complaint.target_role,
            resident: tables.summary(complaint.resident_id)?,
            created_at: now,
            updated_at: now,
        };
        tables.complaints.push(created.clone());
        Ok(created)
    }

    async fn list_complaints(&self, resident_id: Option<Uuid>) -> DatabaseResult<Vec<Complaint>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .complaints
            .iter()
            .rev()
            .filter(|c| resident_id.is_none_or(|id| c.resident_id == id))
            .cloned()
            .collect())
    }

    async fn find_complaint(&self, id: Uuid) -> DatabaseResult<Option<Complaint>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .complaints
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn update_complaint(
        &self,
        id: Uuid,
        changes: &ComplaintUpdate,
    ) -> DatabaseResult<Option<Complaint>> {
        let mut tables = self.inner.lock().unwrap();
        let Some(complaint) = tables.complaints.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(status) = &changes.status {
            complaint.status = status.clone();
        }
        if let Some(response_text) = &changes.response_text {
            complaint.response_text = Some(response_text.clone());
        }
        complaint.updated_at = Utc::now();
        Ok(Some(complaint.clone()))
    }

    async fn delete_complaint(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut tables = self.inner.lock().unwrap();
        let before = tables.complaints.len();
        tables.complaints.retain(|c| c.id != id);
        Ok(tables.complaints.len() < before)
    }
}
