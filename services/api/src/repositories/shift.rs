//! Shift repository for database operations

use common::{
    ResidentSummary,
    error::{DatabaseError, DatabaseResult},
};
use sqlx::{Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::{PgStore, ShiftStore};
use crate::models::{DateRange, NewShift, Shift, ShiftType};

/// Columns selected from a shift aliased `s` joined to its assignee `r`
const SHIFT_COLUMNS: &str = "s.id, s.date, s.shift_type, s.police_id, s.created_at, \
     s.updated_at, r.full_name, r.email, r.phone";

fn shift_from_row(row: &PgRow) -> DatabaseResult<Shift> {
    let shift_type: String = row.try_get("shift_type")?;
    let shift_type = shift_type
        .parse::<ShiftType>()
        .map_err(DatabaseError::Decode)?;
    let police_id: Uuid = row.try_get("police_id")?;

    Ok(Shift {
        id: row.try_get("id")?,
        date: row.try_get("date")?,
        shift_type,
        police_id,
        police: ResidentSummary {
            id: police_id,
            full_name: row.try_get("full_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
        },
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl ShiftStore for PgStore {
    async fn insert_shift_if_vacant(&self, shift: &NewShift) -> DatabaseResult<Option<Shift>> {
        info!(
            "Inserting {} shift on {} for {}",
            shift.shift_type, shift.date, shift.police_id
        );

        let row = sqlx::query(&format!(
            r#"
            WITH s AS (
                INSERT INTO shifts (date, shift_type, police_id)
                VALUES ($1, $2, $3)
                ON CONFLICT (date, shift_type) DO NOTHING
                RETURNING id, date, shift_type, police_id, created_at, updated_at
            )
            SELECT {SHIFT_COLUMNS}
            FROM s
            JOIN residents r ON r.id = s.police_id
            "#
        ))
        .bind(shift.date)
        .bind(shift.shift_type.as_str())
        .bind(shift.police_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(shift_from_row).transpose()
    }

    async fn list_shifts(&self, range: DateRange) -> DatabaseResult<Vec<Shift>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {SHIFT_COLUMNS}
            FROM shifts s
            JOIN residents r ON r.id = s.police_id
            WHERE ($1::date IS NULL OR s.date >= $1)
              AND ($2::date IS NULL OR s.date <= $2)
            ORDER BY s.date ASC,
                     array_position(ARRAY['morning', 'afternoon', 'night'], s.shift_type) ASC
            "#
        ))
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(shift_from_row).collect()
    }

    async fn find_shift(&self, id: Uuid) -> DatabaseResult<Option<Shift>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {SHIFT_COLUMNS}
            FROM shifts s
            JOIN residents r ON r.id = s.police_id
            WHERE s.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(shift_from_row).transpose()
    }

    async fn reassign_shift(&self, id: Uuid, police_id: Uuid) -> DatabaseResult<Option<Shift>> {
        info!("Reassigning shift {} to {}", id, police_id);

        let row = sqlx::query(&format!(
            r#"
            WITH s AS (
                UPDATE shifts
                SET police_id = $2, updated_at = NOW()
                WHERE id = $1
                RETURNING id, date, shift_type, police_id, created_at, updated_at
            )
            SELECT {SHIFT_COLUMNS}
            FROM s
            JOIN residents r ON r.id = s.police_id
            "#
        ))
        .bind(id)
        .bind(police_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(shift_from_row).transpose()
    }

    async fn delete_shift(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM shifts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
