//! Issued uniform record service
//!
//! Each issuance decrements uniform stock and creates a record tied
//! one-to-one with that decrement. Records are mutable: editing the quantity
//! applies the reconciliation delta back to the item, deleting a record
//! restores its quantity. Record mutation and the matching stock adjustment
//! always share one transaction, so neither can apply without the other.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::notifier::ChangeNotifier;
use crate::services::uniform::record_uniform_movement;
use shared::models::{classify_status, IssuedRecord, IssuedRecordWithDetails, MovementType};
use shared::types::Collection;
use shared::validation::validate_student_name;

/// Issued uniform record service
#[derive(Clone)]
pub struct IssuanceService {
    db: PgPool,
    notifier: Arc<ChangeNotifier>,
}

/// Input for issuing a uniform
#[derive(Debug, Deserialize)]
pub struct IssueUniformInput {
    pub student_name: String,
    pub uniform_id: Uuid,
    pub quantity: i32,
    pub issue_date: Option<NaiveDate>,
}

/// Partial update for an issued record. Only supplied fields are touched.
#[derive(Debug, Deserialize)]
pub struct UpdateIssuedRecordInput {
    pub student_name: Option<String>,
    pub quantity_taken: Option<i32>,
    pub issue_date: Option<NaiveDate>,
}

const RECORD_COLUMNS: &str = "id, student_name, uniform_id, quantity_taken, issue_date, created_at";

impl IssuanceService {
    pub fn new(db: PgPool, notifier: Arc<ChangeNotifier>) -> Self {
        Self { db, notifier }
    }

    /// List issued records, newest first with a stable id tie-break.
    pub async fn list_records(&self) -> AppResult<Vec<IssuedRecordWithDetails>> {
        let records = sqlx::query_as::<_, IssuedRecordWithDetails>(
            r#"
            SELECT r.id, r.student_name, r.uniform_id, r.quantity_taken, r.issue_date, r.created_at,
                   COALESCE(i.name, 'Deleted Item') AS uniform_name,
                   COALESCE(i.category, 'Uncategorized') AS uniform_category
            FROM uniform_issuances r
            LEFT JOIN uniform_items i ON i.id = r.uniform_id
            ORDER BY r.created_at DESC, r.id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(records)
    }

    /// Issue a uniform to a student: decrement stock and create the record
    /// in one transaction. The sufficiency check runs against the row-locked
    /// current remaining quantity.
    pub async fn issue(
        &self,
        actor: Option<Uuid>,
        input: IssueUniformInput,
    ) -> AppResult<IssuedRecord> {
        validate_student_name(&input.student_name)
            .map_err(|m| AppError::validation("student_name", m))?;
        if input.quantity <= 0 {
            return Err(AppError::validation("quantity", "Quantity must be positive"));
        }

        let issue_date = input.issue_date.unwrap_or_else(|| Utc::now().date_naive());

        let mut tx = self.db.begin().await?;

        let (remaining, min_quantity) = sqlx::query_as::<_, (i32, i32)>(
            "SELECT remaining_quantity, min_quantity FROM uniform_items WHERE id = $1 FOR UPDATE",
        )
        .bind(input.uniform_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Uniform item".to_string()))?;

        if input.quantity > remaining {
            return Err(AppError::InsufficientStock {
                requested: input.quantity,
                available: remaining,
            });
        }

        let new_remaining = remaining - input.quantity;
        let status = classify_status(new_remaining, min_quantity);

        sqlx::query(
            r#"
            UPDATE uniform_items
            SET remaining_quantity = $1, status = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(new_remaining)
        .bind(status)
        .bind(input.uniform_id)
        .execute(&mut *tx)
        .await?;

        let record = sqlx::query_as::<_, IssuedRecord>(&format!(
            r#"
            INSERT INTO uniform_issuances (student_name, uniform_id, quantity_taken, issue_date)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            RECORD_COLUMNS
        ))
        .bind(input.student_name.trim())
        .bind(input.uniform_id)
        .bind(input.quantity)
        .bind(issue_date)
        .fetch_one(&mut *tx)
        .await?;

        let note = format!("Issued to {}", record.student_name);
        record_uniform_movement(
            &mut tx,
            input.uniform_id,
            MovementType::Issued,
            -input.quantity,
            remaining,
            new_remaining,
            Some(&note),
            actor,
        )
        .await?;

        tx.commit().await?;

        self.notifier.notify_all(&[
            Collection::UniformItems,
            Collection::Issuances,
            Collection::UniformMovements,
        ]);

        Ok(record)
    }

    /// Edit an issued record. A quantity change applies the reconciliation
    /// delta (original minus new) back to the item's remaining stock and may
    /// never drive it negative. Stock adjustment and record update commit
    /// together or not at all.
    pub async fn update_record(
        &self,
        actor: Option<Uuid>,
        record_id: Uuid,
        input: UpdateIssuedRecordInput,
    ) -> AppResult<IssuedRecord> {
        if let Some(student_name) = &input.student_name {
            validate_student_name(student_name)
                .map_err(|m| AppError::validation("student_name", m))?;
        }
        if matches!(input.quantity_taken, Some(q) if q <= 0) {
            return Err(AppError::validation(
                "quantity_taken",
                "Quantity must be positive",
            ));
        }

        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, IssuedRecord>(&format!(
            "SELECT {} FROM uniform_issuances WHERE id = $1 FOR UPDATE",
            RECORD_COLUMNS
        ))
        .bind(record_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Issued record".to_string()))?;

        let new_quantity = input.quantity_taken.unwrap_or(existing.quantity_taken);

        if new_quantity != existing.quantity_taken {
            let (remaining, min_quantity) = sqlx::query_as::<_, (i32, i32)>(
                "SELECT remaining_quantity, min_quantity FROM uniform_items WHERE id = $1 FOR UPDATE",
            )
            .bind(existing.uniform_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Uniform item".to_string()))?;

            let adjustment = existing.quantity_taken - new_quantity;
            let new_remaining = remaining + adjustment;

            if new_remaining < 0 {
                return Err(AppError::InsufficientStock {
                    requested: new_quantity - existing.quantity_taken,
                    available: remaining,
                });
            }

            let status = classify_status(new_remaining, min_quantity);

            sqlx::query(
                r#"
                UPDATE uniform_items
                SET remaining_quantity = $1, status = $2, updated_at = NOW()
                WHERE id = $3
                "#,
            )
            .bind(new_remaining)
            .bind(status)
            .bind(existing.uniform_id)
            .execute(&mut *tx)
            .await?;

            let note = format!("Record edit for {}", existing.student_name);
            record_uniform_movement(
                &mut tx,
                existing.uniform_id,
                MovementType::Adjusted,
                adjustment,
                remaining,
                new_remaining,
                Some(&note),
                actor,
            )
            .await?;
        }

        let student_name = input
            .student_name
            .map(|n| n.trim().to_string())
            .unwrap_or(existing.student_name);
        let issue_date = input.issue_date.unwrap_or(existing.issue_date);

        let record = sqlx::query_as::<_, IssuedRecord>(&format!(
            r#"
            UPDATE uniform_issuances
            SET student_name = $1, quantity_taken = $2, issue_date = $3
            WHERE id = $4
            RETURNING {}
            "#,
            RECORD_COLUMNS
        ))
        .bind(&student_name)
        .bind(new_quantity)
        .bind(issue_date)
        .bind(record_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        self.notifier.notify_all(&[
            Collection::UniformItems,
            Collection::Issuances,
            Collection::UniformMovements,
        ]);

        Ok(record)
    }

    /// Delete an issued record and restore its quantity to the item, in one
    /// transaction. A record whose item was deleted is removed without a
    /// stock write.
    pub async fn delete_record(&self, actor: Option<Uuid>, record_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, IssuedRecord>(&format!(
            "SELECT {} FROM uniform_issuances WHERE id = $1 FOR UPDATE",
            RECORD_COLUMNS
        ))
        .bind(record_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Issued record".to_string()))?;

        let item = sqlx::query_as::<_, (i32, i32)>(
            "SELECT remaining_quantity, min_quantity FROM uniform_items WHERE id = $1 FOR UPDATE",
        )
        .bind(existing.uniform_id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some((remaining, min_quantity)) = item {
            let new_remaining = remaining + existing.quantity_taken;
            let status = classify_status(new_remaining, min_quantity);

            sqlx::query(
                r#"
                UPDATE uniform_items
                SET remaining_quantity = $1, status = $2, updated_at = NOW()
                WHERE id = $3
                "#,
            )
            .bind(new_remaining)
            .bind(status)
            .bind(existing.uniform_id)
            .execute(&mut *tx)
            .await?;

            let note = format!("Restored from deleted record for {}", existing.student_name);
            record_uniform_movement(
                &mut tx,
                existing.uniform_id,
                MovementType::Returned,
                existing.quantity_taken,
                remaining,
                new_remaining,
                Some(&note),
                actor,
            )
            .await?;
        }

        sqlx::query("DELETE FROM uniform_issuances WHERE id = $1")
            .bind(record_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.notifier.notify_all(&[
            Collection::UniformItems,
            Collection::Issuances,
            Collection::UniformMovements,
        ]);

        Ok(())
    }
}
