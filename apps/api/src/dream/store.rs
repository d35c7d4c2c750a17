//! Assessment store: the persistence boundary for DREAM assessments.
//!
//! `AppState` holds an `Arc<dyn AssessmentStore>`. Production uses
//! `PgAssessmentStore`; tests use `InMemoryAssessmentStore`.
//!
//! Writes are last-write-wins. There is no version column, so two concurrent
//! updates touching different fields of the same record are not merged.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::assessment::{
    Assessment, AssessmentStatus, AssessmentUpdate, DreamAssessmentRow, NewAssessment, Pillar,
};

#[async_trait]
pub trait AssessmentStore: Send + Sync {
    /// Persists a freshly scored submission with status `completed`.
    async fn create(&self, new: NewAssessment) -> Result<Assessment, AppError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Assessment, AppError>;

    /// Applies contact fields and request flags. Nothing else is mutable.
    async fn update(&self, id: Uuid, fields: &AssessmentUpdate) -> Result<Assessment, AppError>;

    /// Replaces any previously generated strategy.
    async fn save_strategy(
        &self,
        id: Uuid,
        strategy: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<Assessment, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

/// Rejects submissions whose computed scores fall outside [0, 10].
fn check_new_assessment(new: &NewAssessment) -> Result<(), AppError> {
    let scores = &new.scores;
    let all = Pillar::ALL
        .iter()
        .map(|p| (p.label(), scores.pillar(*p)))
        .chain(std::iter::once(("Overall", scores.overall)));
    for (name, score) in all {
        if !score.is_finite() || !(0.0..=10.0).contains(&score) {
            return Err(AppError::Validation(format!(
                "{name} score {score} is outside 0–10"
            )));
        }
    }
    Ok(())
}

/// Trims a text field; blank input leaves the stored value untouched.
fn clean(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Assessment {id} not found"))
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgAssessmentStore {
    pool: PgPool,
}

impl PgAssessmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_assessment(row: DreamAssessmentRow) -> Result<Assessment, AppError> {
    Assessment::try_from(row).map_err(AppError::Internal)
}

#[async_trait]
impl AssessmentStore for PgAssessmentStore {
    async fn create(&self, new: NewAssessment) -> Result<Assessment, AppError> {
        check_new_assessment(&new)?;

        let id = Uuid::new_v4();
        let now = Utc::now();
        let contact = new.contact.unwrap_or_default();
        let responses = serde_json::to_value(&new.responses).map_err(anyhow::Error::from)?;

        let row = sqlx::query_as::<_, DreamAssessmentRow>(
            r#"
            INSERT INTO dream_assessments
                (id, tier, status, responses,
                 demand_score, revenue_score, engine_score, admin_score, marketing_score, overall_score,
                 contact_name, contact_email, contact_company, contact_phone, referral_code,
                 created_at, started_at, completed_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $16, $16)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(new.tier.as_str())
        .bind(AssessmentStatus::Completed.as_str())
        .bind(responses)
        .bind(new.scores.demand)
        .bind(new.scores.revenue)
        .bind(new.scores.engine)
        .bind(new.scores.admin)
        .bind(new.scores.marketing)
        .bind(new.scores.overall)
        .bind(clean(&contact.name))
        .bind(clean(&contact.email))
        .bind(clean(&contact.company))
        .bind(clean(&contact.phone))
        .bind(new.referral_code)
        .bind(now)
        .bind(new.started_at)
        .fetch_one(&self.pool)
        .await?;

        info!("Stored {} assessment {id} (overall {:.1})", new.tier, new.scores.overall);
        into_assessment(row)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Assessment, AppError> {
        let row = sqlx::query_as::<_, DreamAssessmentRow>(
            "SELECT * FROM dream_assessments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))?;

        into_assessment(row)
    }

    async fn update(&self, id: Uuid, fields: &AssessmentUpdate) -> Result<Assessment, AppError> {
        let row = sqlx::query_as::<_, DreamAssessmentRow>(
            r#"
            UPDATE dream_assessments SET
                contact_name = COALESCE($2, contact_name),
                contact_email = COALESCE($3, contact_email),
                contact_company = COALESCE($4, contact_company),
                contact_phone = COALESCE($5, contact_phone),
                pdf_requested = COALESCE($6, pdf_requested),
                consultation_requested = COALESCE($7, consultation_requested),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(clean(&fields.name))
        .bind(clean(&fields.email))
        .bind(clean(&fields.company))
        .bind(clean(&fields.phone))
        .bind(fields.pdf_requested)
        .bind(fields.consultation_requested)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))?;

        into_assessment(row)
    }

    async fn save_strategy(
        &self,
        id: Uuid,
        strategy: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<Assessment, AppError> {
        let row = sqlx::query_as::<_, DreamAssessmentRow>(
            r#"
            UPDATE dream_assessments SET
                strategy = $2,
                strategy_generated_at = $3,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(strategy)
        .bind(generated_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))?;

        into_assessment(row)
    }

    async fn ping(&self) -> Result<(), AppError> {
        crate::db::ping(&self.pool).await?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory (tests)
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub use memory::InMemoryAssessmentStore;

#[cfg(test)]
mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct InMemoryAssessmentStore {
        records: Mutex<HashMap<Uuid, Assessment>>,
    }

    impl InMemoryAssessmentStore {
        /// Seeds a record as-is, bypassing `create` (e.g. an in-progress assessment).
        pub fn insert(&self, assessment: Assessment) {
            self.records
                .lock()
                .unwrap()
                .insert(assessment.id, assessment);
        }

        fn modify(
            &self,
            id: Uuid,
            apply: impl FnOnce(&mut Assessment),
        ) -> Result<Assessment, AppError> {
            let mut records = self.records.lock().unwrap();
            let record = records.get_mut(&id).ok_or_else(|| not_found(id))?;
            apply(record);
            record.updated_at = Utc::now();
            Ok(record.clone())
        }
    }

    #[async_trait]
    impl AssessmentStore for InMemoryAssessmentStore {
        async fn create(&self, new: NewAssessment) -> Result<Assessment, AppError> {
            check_new_assessment(&new)?;
            let now = Utc::now();
            let contact = new.contact.unwrap_or_default();
            let assessment = Assessment {
                id: Uuid::new_v4(),
                tier: new.tier,
                status: AssessmentStatus::Completed,
                responses: new.responses,
                scores: Some(new.scores),
                contact: crate::models::assessment::ContactInfo {
                    name: clean(&contact.name),
                    email: clean(&contact.email),
                    company: clean(&contact.company),
                    phone: clean(&contact.phone),
                },
                referral_code: new.referral_code,
                strategy: None,
                strategy_generated_at: None,
                pdf_requested: false,
                consultation_requested: false,
                created_at: now,
                started_at: new.started_at,
                completed_at: Some(now),
                updated_at: now,
            };
            self.insert(assessment.clone());
            Ok(assessment)
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Assessment, AppError> {
            self.records
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or_else(|| not_found(id))
        }

        async fn update(
            &self,
            id: Uuid,
            fields: &AssessmentUpdate,
        ) -> Result<Assessment, AppError> {
            self.modify(id, |a| {
                if let Some(v) = clean(&fields.name) {
                    a.contact.name = Some(v);
                }
                if let Some(v) = clean(&fields.email) {
                    a.contact.email = Some(v);
                }
                if let Some(v) = clean(&fields.company) {
                    a.contact.company = Some(v);
                }
                if let Some(v) = clean(&fields.phone) {
                    a.contact.phone = Some(v);
                }
                if let Some(v) = fields.pdf_requested {
                    a.pdf_requested = v;
                }
                if let Some(v) = fields.consultation_requested {
                    a.consultation_requested = v;
                }
            })
        }

        async fn save_strategy(
            &self,
            id: Uuid,
            strategy: &str,
            generated_at: DateTime<Utc>,
        ) -> Result<Assessment, AppError> {
            self.modify(id, |a| {
                a.strategy = Some(strategy.to_string());
                a.strategy_generated_at = Some(generated_at);
            })
        }

        async fn ping(&self) -> Result<(), AppError> {
            Ok(())
        }
    }
}
