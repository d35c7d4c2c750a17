//! Strategy generation: turns a completed assessment into a long-form narrative.
//!
//! Pluggable via the `StrategyGenerator` trait (`Arc<dyn StrategyGenerator>` in
//! `AppState`). The production backend calls Claude through `llm_client`.
//!
//! Errors:
//! - `ServiceUnavailable` when no API key is configured or the key is rejected
//! - `GenerationFailed` for any other upstream failure
//! - `InvalidState` when the assessment is not `completed`

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::dream::prompts::{STRATEGY_MAX_TOKENS, STRATEGY_PROMPT_TEMPLATE, STRATEGY_SYSTEM};
use crate::dream::questions::{questions_for_tier, DreamQuestion, QuestionType};
use crate::dream::recommendations::rank_pillars;
use crate::dream::scoring::ScoreBand;
use crate::dream::store::AssessmentStore;
use crate::errors::AppError;
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, MARKDOWN_OUTPUT_INSTRUCTION};
use crate::llm_client::LlmClient;
use crate::models::assessment::{
    AnswerValue, AssessmentStatus, ContactInfo, DreamScores, Pillar, Responses, Tier,
};

/// Everything the generator may use about an assessment.
#[derive(Debug, Clone, Copy)]
pub struct StrategyRequest<'a> {
    pub tier: Tier,
    pub scores: &'a DreamScores,
    pub responses: &'a Responses,
    pub contact: &'a ContactInfo,
}

#[async_trait]
pub trait StrategyGenerator: Send + Sync {
    async fn generate(&self, request: StrategyRequest<'_>) -> Result<String, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmStrategyGenerator
// ────────────────────────────────────────────────────────────────────────────

/// Claude-backed generator. `None` means the AI service is not configured.
pub struct LlmStrategyGenerator {
    llm: Option<LlmClient>,
}

impl LlmStrategyGenerator {
    pub fn new(llm: Option<LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl StrategyGenerator for LlmStrategyGenerator {
    async fn generate(&self, request: StrategyRequest<'_>) -> Result<String, AppError> {
        let llm = self.llm.as_ref().ok_or_else(|| {
            AppError::ServiceUnavailable("ANTHROPIC_API_KEY is not configured".to_string())
        })?;

        let prompt = build_strategy_prompt(request);
        let system = format!("{STRATEGY_SYSTEM}\n\n{GROUNDING_INSTRUCTION}\n\n{MARKDOWN_OUTPUT_INSTRUCTION}");

        llm.complete(&prompt, &system, Some(STRATEGY_MAX_TOKENS))
            .await
            .map_err(|e| {
                if e.is_auth_error() {
                    AppError::ServiceUnavailable(format!("AI provider rejected credentials: {e}"))
                } else {
                    AppError::GenerationFailed(e.to_string())
                }
            })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestration
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GeneratedStrategy {
    pub strategy: String,
    pub generated_at: DateTime<Utc>,
}

/// Generates a strategy for a completed assessment and persists it,
/// replacing any earlier one.
pub async fn generate_and_store(
    store: &dyn AssessmentStore,
    generator: &dyn StrategyGenerator,
    id: Uuid,
) -> Result<GeneratedStrategy, AppError> {
    let assessment = store.get_by_id(id).await?;

    let scores = match (assessment.status, assessment.scores.as_ref()) {
        (AssessmentStatus::Completed, Some(scores)) => scores,
        (status, _) => {
            warn!("Strategy requested for assessment {id} in status {}", status.as_str());
            return Err(AppError::InvalidState(
                "Assessment must be completed before a strategy can be generated".to_string(),
            ));
        }
    };

    info!("Generating strategy for {} assessment {id}", assessment.tier);
    let strategy = generator
        .generate(StrategyRequest {
            tier: assessment.tier,
            scores,
            responses: &assessment.responses,
            contact: &assessment.contact,
        })
        .await?;

    let generated_at = Utc::now();
    store.save_strategy(id, &strategy, generated_at).await?;
    info!("Stored strategy for assessment {id} ({} chars)", strategy.len());

    Ok(GeneratedStrategy {
        strategy,
        generated_at,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt building
// ────────────────────────────────────────────────────────────────────────────

pub fn build_strategy_prompt(request: StrategyRequest<'_>) -> String {
    let company_line = match (&request.contact.company, &request.contact.name) {
        (Some(company), Some(name)) => format!("Business: {company} (contact: {name})"),
        (Some(company), None) => format!("Business: {company}"),
        (None, Some(name)) => format!("Business owner: {name}"),
        (None, None) => "Business: not provided".to_string(),
    };

    let score_table = Pillar::ALL
        .iter()
        .map(|&p| {
            let score = request.scores.pillar(p);
            format!("- {}: {:.1} ({})", p.label(), score, ScoreBand::for_score(score).label())
        })
        .chain(std::iter::once(format!(
            "- Overall: {:.1} ({})",
            request.scores.overall,
            ScoreBand::for_score(request.scores.overall).label()
        )))
        .collect::<Vec<_>>()
        .join("\n");

    let priority_order = rank_pillars(request.scores)
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {} ({:.1})", i + 1, r.pillar.label(), r.score))
        .collect::<Vec<_>>()
        .join("\n");

    let answers = questions_for_tier(request.tier)
        .into_iter()
        .filter_map(|q| {
            request
                .responses
                .get(q.id)
                .and_then(|a| describe_answer(q, a))
                .map(|answer| format!("- [{}] {} → {}", q.pillar.label(), q.prompt, answer))
        })
        .collect::<Vec<_>>();
    let answers = if answers.is_empty() {
        "- No answers recorded".to_string()
    } else {
        answers.join("\n")
    };

    STRATEGY_PROMPT_TEMPLATE
        .replace("{company_line}", &company_line)
        .replace("{tier_label}", request.tier.label())
        .replace("{score_table}", &score_table)
        .replace("{priority_order}", &priority_order)
        .replace("{answers}", &answers)
}

/// Human-readable answer text for prompts and reports.
pub fn describe_answer(question: &DreamQuestion, answer: &AnswerValue) -> Option<String> {
    match (question.kind, answer) {
        (QuestionType::SingleChoice, AnswerValue::Text(v)) => {
            question.option(v).map(|o| o.label.to_string())
        }
        (QuestionType::MultiChoice, AnswerValue::List(values)) => {
            let labels: Vec<&str> = values
                .iter()
                .filter_map(|v| question.option(v).map(|o| o.label))
                .collect();
            (!labels.is_empty()).then(|| labels.join(", "))
        }
        (QuestionType::Scale, answer) => {
            let bounds = question.scale?;
            answer
                .as_number()
                .map(|n| format!("{n} on a {}–{} scale", bounds.min, bounds.max))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::dream::store::InMemoryAssessmentStore;
    use crate::dream::questions::find_question;
    use crate::models::assessment::{Assessment, NewAssessment};

    struct FixedGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl StrategyGenerator for FixedGenerator {
        async fn generate(&self, request: StrategyRequest<'_>) -> Result<String, AppError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("strategy #{n} for {}", request.tier))
        }
    }

    fn scores() -> DreamScores {
        DreamScores {
            demand: 3.0,
            revenue: 8.0,
            engine: 5.0,
            admin: 2.0,
            marketing: 9.0,
            overall: 5.4,
        }
    }

    fn responses() -> Responses {
        let mut r = Responses::new();
        r.insert("d1".to_string(), AnswerValue::Text("developing".to_string()));
        r.insert("d2".to_string(), AnswerValue::Number(4.0));
        r.insert(
            "m2".to_string(),
            AnswerValue::List(vec!["email".to_string(), "seo".to_string()]),
        );
        r
    }

    async fn seeded(store: &InMemoryAssessmentStore) -> Assessment {
        store
            .create(NewAssessment {
                tier: Tier::Mini,
                responses: responses(),
                scores: scores(),
                contact: None,
                referral_code: None,
                started_at: None,
            })
            .await
            .unwrap()
    }

    #[test]
    fn test_prompt_contains_scores_priorities_and_answers() {
        let contact = ContactInfo {
            company: Some("Acme Studio".to_string()),
            ..ContactInfo::default()
        };
        let r = responses();
        let s = scores();
        let prompt = build_strategy_prompt(StrategyRequest {
            tier: Tier::Mini,
            scores: &s,
            responses: &r,
            contact: &contact,
        });

        assert!(prompt.contains("Business: Acme Studio"));
        assert!(prompt.contains("- Admin: 2.0 (Critical)"));
        assert!(prompt.contains("- Overall: 5.4 (Developing)"));
        assert!(prompt.contains("1. Admin (2.0)"));
        assert!(prompt.contains("5. Marketing (9.0)"));
        assert!(prompt.contains("Partly defined, applied inconsistently"));
        assert!(prompt.contains("Email marketing, SEO and content"));
        assert!(!prompt.contains('{'), "unreplaced placeholder in prompt");
    }

    #[test]
    fn test_describe_scale_answer() {
        let q = find_question("d2").unwrap();
        assert_eq!(
            describe_answer(q, &AnswerValue::Number(4.0)).as_deref(),
            Some("4 on a 1–5 scale")
        );
    }

    #[tokio::test]
    async fn test_unconfigured_generator_is_service_unavailable() {
        let generator = LlmStrategyGenerator::new(None);
        let (s, r, c) = (scores(), responses(), ContactInfo::default());
        let result = generator
            .generate(StrategyRequest {
                tier: Tier::Mini,
                scores: &s,
                responses: &r,
                contact: &c,
            })
            .await;
        assert!(matches!(result, Err(AppError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_generate_and_store_persists_and_overwrites() {
        let store = InMemoryAssessmentStore::default();
        let generator = FixedGenerator {
            calls: AtomicUsize::new(0),
        };
        let assessment = seeded(&store).await;

        let first = generate_and_store(&store, &generator, assessment.id).await.unwrap();
        assert_eq!(first.strategy, "strategy #1 for mini");

        let second = generate_and_store(&store, &generator, assessment.id).await.unwrap();
        let stored = store.get_by_id(assessment.id).await.unwrap();
        assert_eq!(stored.strategy.as_deref(), Some("strategy #2 for mini"));
        assert_eq!(stored.strategy_generated_at, Some(second.generated_at));
    }

    #[tokio::test]
    async fn test_generate_rejects_incomplete_assessment() {
        let store = InMemoryAssessmentStore::default();
        let generator = FixedGenerator {
            calls: AtomicUsize::new(0),
        };
        let mut assessment = seeded(&store).await;
        assessment.id = Uuid::new_v4();
        assessment.status = AssessmentStatus::InProgress;
        assessment.scores = None;
        store.insert(assessment.clone());

        let result = generate_and_store(&store, &generator, assessment.id).await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generate_unknown_assessment_is_not_found() {
        let store = InMemoryAssessmentStore::default();
        let generator = FixedGenerator {
            calls: AtomicUsize::new(0),
        };
        let result = generate_and_store(&store, &generator, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
