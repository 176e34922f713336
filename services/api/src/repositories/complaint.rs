//! Complaint repository for database operations

use common::{
    ResidentSummary, Role,
    error::{DatabaseError, DatabaseResult},
};
use sqlx::{Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::{ComplaintStore, PgStore};
use crate::models::{Complaint, ComplaintUpdate, NewComplaint};

/// Columns selected from a complaint aliased `c` joined to its author `r`
const COMPLAINT_COLUMNS: &str = "c.id, c.resident_id, c.title, c.message, c.status, \
     c.response_text, c.target_role, c.created_at, c.updated_at, r.full_name, r.email, r.phone";

fn complaint_from_row(row: &PgRow) -> DatabaseResult<Complaint> {
    let target_role = row
        .try_get::<Option<String>, _>("target_role")?
        .map(|role| role.parse::<Role>())
        .transpose()
        .map_err(|e| DatabaseError::Decode(e.to_string()))?;
    let resident_id: Uuid = row.try_get("resident_id")?;

    Ok(Complaint {
        id: row.try_get("id")?,
        resident_id,
        title: row.try_get("title")?,
        message: row.try_get("message")?,
        status: row.try_get("status")?,
        response_text: row.try_get("response_text")?,
        target_role,
        resident: ResidentSummary {
            id: resident_id,
            full_name: row.try_get("full_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
        },
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl ComplaintStore for PgStore {
    async fn insert_complaint(&self, complaint: &NewComplaint) -> DatabaseResult<Complaint> {
        info!("Filing complaint for resident {}", complaint.resident_id);

        let row = sqlx::query(&format!(
            r#"
            WITH c AS (
                INSERT INTO complaints (resident_id, title, message, status, target_role)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            SELECT {COMPLAINT_COLUMNS}
            FROM c
            JOIN residents r ON r.id = c.resident_id
            "#
        ))
        .bind(complaint.resident_id)
        .bind(&complaint.title)
        .bind(&complaint.message)
        .bind(&complaint.status)
        .bind(complaint.target_role.map(|role| role.as_str()))
        .fetch_one(&self.pool)
        .await?;

        complaint_from_row(&row)
    }

    async fn list_complaints(&self, resident_id: Option<Uuid>) -> DatabaseResult<Vec<Complaint>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {COMPLAINT_COLUMNS}
            FROM complaints c
            JOIN residents r ON r.id = c.resident_id
            WHERE ($1::uuid IS NULL OR c.resident_id = $1)
            ORDER BY c.created_at DESC
            "#
        ))
        .bind(resident_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(complaint_from_row).collect()
    }

    async fn find_complaint(&self, id: Uuid) -> DatabaseResult<Option<Complaint>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {COMPLAINT_COLUMNS}
            FROM complaints c
            JOIN residents r ON r.id = c.resident_id
            WHERE c.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(complaint_from_row).transpose()
    }

    async fn update_complaint(
        &self,
        id: Uuid,
        changes: &ComplaintUpdate,
    ) -> DatabaseResult<Option<Complaint>> {
        info!("Updating complaint {}", id);

        let row = sqlx::query(&format!(
            r#"
            WITH c AS (
                UPDATE complaints
                SET status = COALESCE($2, status),
                    response_text = COALESCE($3, response_text),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT {COMPLAINT_COLUMNS}
            FROM c
            JOIN residents r ON r.id = c.resident_id
            "#
        ))
        .bind(id)
        .bind(changes.status.as_deref())
        .bind(changes.response_text.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(complaint_from_row).transpose()
    }

    async fn delete_complaint(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM complaints WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
