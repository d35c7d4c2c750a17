//! DREAM scoring: maps raw responses and a tier to per-pillar and overall scores.
//!
//! Per question contribution (0–10):
//! - single-choice → the chosen option's score
//! - multi-choice  → mean score of the distinct selected options
//! - scale         → linear normalisation of the value between the question bounds
//!
//! Pillar score = mean(contribution × weight) over answered in-tier questions,
//! clamped to [0, 10]. A pillar with no answered questions scores 0.
//! Overall = mean of the five pillar scores, clamped to [0, 10].

use std::collections::BTreeSet;

use serde::Serialize;

use crate::dream::questions::{DreamQuestion, QuestionType, QUESTIONS};
use crate::models::assessment::{AnswerValue, DreamScores, Pillar, Responses, Tier};

pub const MAX_SCORE: f64 = 10.0;

/// Qualitative bucket for a 0–10 score.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Critical,
    Developing,
    Strong,
}

impl ScoreBand {
    pub fn for_score(score: f64) -> Self {
        match score {
            s if s >= 7.0 => ScoreBand::Strong,
            s if s >= 4.0 => ScoreBand::Developing,
            _ => ScoreBand::Critical,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Critical => "Critical",
            ScoreBand::Developing => "Developing",
            ScoreBand::Strong => "Strong",
        }
    }
}

/// Scores `responses` against the standard question bank.
pub fn score_responses(responses: &Responses, tier: Tier) -> DreamScores {
    score_with_bank(QUESTIONS, responses, tier)
}

pub fn score_with_bank(questions: &[DreamQuestion], responses: &Responses, tier: Tier) -> DreamScores {
    let mut scores = DreamScores::default();

    for pillar in Pillar::ALL {
        let contributions: Vec<f64> = questions
            .iter()
            .filter(|q| q.pillar == pillar && q.in_tier(tier))
            .filter_map(|q| {
                responses
                    .get(q.id)
                    .and_then(|answer| question_contribution(q, answer))
                    .map(|c| c * q.weight)
            })
            .collect();

        scores.set_pillar(pillar, round_score(mean_clamped(&contributions)));
    }

    let pillar_scores: Vec<f64> = Pillar::ALL.iter().map(|p| scores.pillar(*p)).collect();
    scores.overall = round_score(mean_clamped(&pillar_scores));
    scores
}

/// Unweighted 0–10 contribution of a single answer, or `None` when the answer
/// cannot be resolved against the question (treated as unanswered).
pub fn question_contribution(question: &DreamQuestion, answer: &AnswerValue) -> Option<f64> {
    match (question.kind, answer) {
        (QuestionType::SingleChoice, AnswerValue::Text(value)) => {
            question.option(value).map(|o| o.score)
        }
        (QuestionType::MultiChoice, AnswerValue::List(values)) => {
            let selected: BTreeSet<&str> = values.iter().map(String::as_str).collect();
            let option_scores: Vec<f64> = selected
                .into_iter()
                .filter_map(|v| question.option(v).map(|o| o.score))
                .collect();
            if option_scores.is_empty() {
                None
            } else {
                Some(option_scores.iter().sum::<f64>() / option_scores.len() as f64)
            }
        }
        (QuestionType::Scale, answer) => {
            let bounds = question.scale?;
            let value = answer.as_number()?;
            let span = bounds.max - bounds.min;
            if span <= 0.0 {
                return None;
            }
            let clamped = value.clamp(bounds.min, bounds.max);
            Some((clamped - bounds.min) / span * MAX_SCORE)
        }
        _ => None,
    }
}

fn mean_clamped(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().sum::<f64>() / values.len() as f64).clamp(0.0, MAX_SCORE)
}

fn round_score(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}
