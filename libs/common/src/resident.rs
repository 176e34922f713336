//! Resident model and repository
//!
//! Residents are every registered account of the building, whatever their
//! role. Registration happens elsewhere; the services here only read
//! residents and, for password resets, rewrite the stored credential.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::error::{DatabaseError, DatabaseResult};
use crate::role::Role;

/// Resident entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    /// Argon2 or bcrypt hash; legacy rows may still hold plaintext.
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    pub apartment_id: Option<String>,
    pub id_number: String,
    pub birth_date: NaiveDate,
    pub temporary_status: bool,
}

impl Resident {
    pub fn summary(&self) -> ResidentSummary {
        ResidentSummary {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Public subset of a resident, embedded in shifts and complaints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

/// Read access to resident records.
pub trait ResidentStore: Send + Sync {
    fn find_by_id(&self, id: Uuid) -> impl Future<Output = DatabaseResult<Option<Resident>>> + Send;

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = DatabaseResult<Option<Resident>>> + Send;

    /// Residents holding `role`, ordered by full name.
    fn list_by_role(
        &self,
        role: Role,
    ) -> impl Future<Output = DatabaseResult<Vec<ResidentSummary>>> + Send;

    /// Replace the stored credential. Returns false if no resident has `id`.
    fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> impl Future<Output = DatabaseResult<bool>> + Send;
}

/// Resident repository backed by PostgreSQL
#[derive(Clone)]
pub struct ResidentRepository {
    pool: PgPool,
}

impl ResidentRepository {
    /// Create a new resident repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const RESIDENT_COLUMNS: &str = "id, full_name, phone, email, password, role, apartment_id, \
     id_number, birth_date, temporary_status";

fn resident_from_row(row: &PgRow) -> DatabaseResult<Resident> {
    let role: String = row.try_get("role")?;
    let role = role
        .parse::<Role>()
        .map_err(|e| DatabaseError::Decode(e.to_string()))?;

    Ok(Resident {
        id: row.try_get("id")?,
        full_name: row.try_get("full_name")?,
        phone: row.try_get("phone")?,
        email: row.try_get("email")?,
        password: row.try_get("password")?,
        role,
        apartment_id: row.try_get("apartment_id")?,
        id_number: row.try_get("id_number")?,
        birth_date: row.try_get("birth_date")?,
        temporary_status: row.try_get("temporary_status")?,
    })
}

impl ResidentStore for ResidentRepository {
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Resident>> {
        let row = sqlx::query(&format!(
            "SELECT {RESIDENT_COLUMNS} FROM residents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(resident_from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<Resident>> {
        let row = sqlx::query(&format!(
            "SELECT {RESIDENT_COLUMNS} FROM residents WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(resident_from_row).transpose()
    }

    async fn list_by_role(&self, role: Role) -> DatabaseResult<Vec<ResidentSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT id, full_name, email, phone
            FROM residents
            WHERE LOWER(role) = $1
            ORDER BY full_name ASC
            "#,
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> DatabaseResult<ResidentSummary> {
                Ok(ResidentSummary {
                    id: row.try_get("id")?,
                    full_name: row.try_get("full_name")?,
                    email: row.try_get("email")?,
                    phone: row.try_get("phone")?,
                })
            })
            .collect()
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> DatabaseResult<bool> {
        info!("Updating stored credential for resident {}", id);

        let result = sqlx::query(
            r#"
            UPDATE residents
            SET password = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
