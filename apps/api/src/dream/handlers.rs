//! Axum route handlers for the DREAM assessment API.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dream::questions::{questions_for_tier, DreamQuestion};
use crate::dream::recommendations::{generate_recommendations, rank_pillars, PillarRanking};
use crate::dream::referral::ReferralContext;
use crate::dream::report::{consultation_email, results_email};
use crate::dream::scoring::score_responses;
use crate::dream::strategy::generate_and_store;
use crate::dream::validation::{describe_issues, is_valid_email, validate_responses};
use crate::errors::AppError;
use crate::models::assessment::{
    AssessmentStatus, AssessmentUpdate, ContactInfo, DreamScores, NewAssessment, Responses, Tier,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TierQuery {
    pub tier: Tier,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionListResponse {
    pub tier: Tier,
    pub question_count: usize,
    pub questions: Vec<&'static DreamQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAssessmentRequest {
    pub tier: Tier,
    pub responses: Responses,
    pub contact: Option<ContactInfo>,
    pub started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct SubmitAssessmentResponse {
    pub id: Uuid,
    pub tier: Tier,
    pub scores: DreamScores,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResultsResponse {
    pub id: Uuid,
    pub tier: Tier,
    pub status: AssessmentStatus,
    pub scores: Option<DreamScores>,
    pub pillar_ranking: Vec<PillarRanking>,
    pub recommendations: Vec<String>,
    pub responses: Responses,
    pub contact: ContactInfo,
    pub referral_code: Option<String>,
    pub pdf_requested: bool,
    pub consultation_requested: bool,
    pub has_strategy: bool,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssessmentResponse {
    pub success: bool,
    pub id: Uuid,
    pub email_sent: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyResponse {
    pub has_strategy: bool,
    pub strategy: Option<String>,
    pub generated_at: Option<DateTime<Utc>>,
}

/// Deserializes a JSON body, reporting shape problems as 400 validation errors.
fn parse_body<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, AppError> {
    serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/dream/questions?tier=
pub async fn handle_list_questions(
    query: Result<Query<TierQuery>, QueryRejection>,
) -> Result<Json<QuestionListResponse>, AppError> {
    let Query(query) = query?;
    let questions = questions_for_tier(query.tier);
    Ok(Json(QuestionListResponse {
        tier: query.tier,
        question_count: questions.len(),
        questions,
    }))
}

/// POST /api/v1/dream/assessments
///
/// Validates and scores the responses, then stores a completed assessment.
pub async fn handle_submit_assessment(
    State(state): State<AppState>,
    referral: ReferralContext,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitAssessmentResponse>), AppError> {
    let Json(body) = body?;
    let request: SubmitAssessmentRequest = parse_body(body)?;

    let issues = validate_responses(&request.responses);
    if !issues.is_empty() {
        return Err(AppError::Validation(describe_issues(&issues)));
    }
    if let Some(email) = request
        .contact
        .as_ref()
        .and_then(|c| c.email.as_deref())
        .filter(|e| !e.trim().is_empty())
    {
        if !is_valid_email(email) {
            return Err(AppError::Validation(format!("'{email}' is not a valid email address")));
        }
    }

    let scores = score_responses(&request.responses, request.tier);
    let assessment = state
        .store
        .create(NewAssessment {
            tier: request.tier,
            responses: request.responses,
            scores,
            contact: request.contact,
            referral_code: referral.code,
            started_at: request.started_at,
        })
        .await?;

    info!(
        "Assessment {} submitted: tier={}, overall={:.1}",
        assessment.id, assessment.tier, scores.overall
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitAssessmentResponse {
            id: assessment.id,
            tier: assessment.tier,
            scores,
        }),
    ))
}

/// GET /api/v1/dream/assessments/:id
pub async fn handle_get_assessment(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<AssessmentResultsResponse>, AppError> {
    let Path(id) = path?;
    let a = state.store.get_by_id(id).await?;

    let (pillar_ranking, recommendations) = match &a.scores {
        Some(scores) => (rank_pillars(scores), generate_recommendations(scores)),
        None => (Vec::new(), Vec::new()),
    };

    Ok(Json(AssessmentResultsResponse {
        id: a.id,
        tier: a.tier,
        status: a.status,
        scores: a.scores,
        pillar_ranking,
        recommendations,
        responses: a.responses,
        contact: a.contact,
        referral_code: a.referral_code,
        pdf_requested: a.pdf_requested,
        consultation_requested: a.consultation_requested,
        has_strategy: a.strategy.is_some(),
        created_at: a.created_at,
        started_at: a.started_at,
        completed_at: a.completed_at,
    }))
}

/// PATCH /api/v1/dream/assessments/:id
///
/// Attaches contact details and request flags. When the update asks for the PDF
/// report and an email address is on file, the report is emailed. Mail failures
/// are logged and reported as `emailSent: false`.
pub async fn handle_update_assessment(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdateAssessmentResponse>, AppError> {
    let Path(id) = path?;
    let Json(body) = body?;
    let fields: AssessmentUpdate = parse_body(body)?;

    if let Some(email) = fields.email.as_deref().filter(|e| !e.trim().is_empty()) {
        if !is_valid_email(email) {
            return Err(AppError::Validation(format!("'{email}' is not a valid email address")));
        }
    }

    let assessment = state.store.update(id, &fields).await?;
    let results_url = state.config.results_url(assessment.id);

    let mut email_sent = false;
    if fields.pdf_requested == Some(true) {
        match assessment.contact.email.as_deref() {
            Some(to) => {
                if let Some(message) = results_email(&assessment, to.trim(), &results_url) {
                    match state.mailer.send(&message).await {
                        Ok(()) => email_sent = true,
                        Err(e) => warn!("Results email for assessment {id} not sent: {e}"),
                    }
                }
            }
            None => info!("PDF requested for assessment {id} but no email on file"),
        }
    }

    if fields.consultation_requested == Some(true) {
        if let Some(inbox) = state.config.consultation_inbox.as_deref() {
            let message = consultation_email(&assessment, inbox, &results_url);
            if let Err(e) = state.mailer.send(&message).await {
                warn!("Consultation notice for assessment {id} not sent: {e}");
            }
        }
    }

    Ok(Json(UpdateAssessmentResponse {
        success: true,
        id,
        email_sent,
    }))
}

/// GET /api/v1/dream/assessments/:id/strategy
pub async fn handle_get_strategy(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<StrategyResponse>, AppError> {
    let Path(id) = path?;
    let assessment = state.store.get_by_id(id).await?;
    Ok(Json(StrategyResponse {
        has_strategy: assessment.strategy.is_some(),
        strategy: assessment.strategy,
        generated_at: assessment.strategy_generated_at,
    }))
}

/// POST /api/v1/dream/assessments/:id/strategy
///
/// Generates a fresh strategy and persists it, replacing any earlier one.
pub async fn handle_generate_strategy(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<StrategyResponse>, AppError> {
    let Path(id) = path?;
    let generated =
        generate_and_store(state.store.as_ref(), state.strategist.as_ref(), id).await?;
    Ok(Json(StrategyResponse {
        has_strategy: true,
        strategy: Some(generated.strategy),
        generated_at: Some(generated.generated_at),
    }))
}
