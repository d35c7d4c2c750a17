use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Enumerations
// ────────────────────────────────────────────────────────────────────────────

/// Assessment depth. Gates how many questions per pillar are asked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Mini,
    Medium,
    Indepth,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Mini, Tier::Medium, Tier::Indepth];

    /// Highest question rank (inclusive) included for each pillar at this tier.
    pub fn questions_per_pillar(self) -> u8 {
        match self {
            Tier::Mini => 2,
            Tier::Medium => 5,
            Tier::Indepth => 10,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Mini => "mini",
            Tier::Medium => "medium",
            Tier::Indepth => "indepth",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Mini => "Mini Assessment",
            Tier::Medium => "Standard Assessment",
            Tier::Indepth => "In-Depth Assessment",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| format!("unknown tier '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl AssessmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AssessmentStatus::InProgress => "in_progress",
            AssessmentStatus::Completed => "completed",
            AssessmentStatus::Abandoned => "abandoned",
        }
    }
}

impl FromStr for AssessmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(AssessmentStatus::InProgress),
            "completed" => Ok(AssessmentStatus::Completed),
            "abandoned" => Ok(AssessmentStatus::Abandoned),
            other => Err(format!("unknown assessment status '{other}'")),
        }
    }
}

/// The five DREAM business pillars, in their canonical order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Pillar {
    Demand,
    Revenue,
    Engine,
    Admin,
    Marketing,
}

impl Pillar {
    /// Canonical DREAM order. Also the tie-break order for recommendations.
    pub const ALL: [Pillar; 5] = [
        Pillar::Demand,
        Pillar::Revenue,
        Pillar::Engine,
        Pillar::Admin,
        Pillar::Marketing,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Pillar::Demand => "Demand",
            Pillar::Revenue => "Revenue",
            Pillar::Engine => "Engine",
            Pillar::Admin => "Admin",
            Pillar::Marketing => "Marketing",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Responses & scores
// ────────────────────────────────────────────────────────────────────────────

/// A single raw answer. Only strings, numbers and lists of strings are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl AnswerValue {
    /// Numeric view of the answer. Numeric strings are accepted since HTML forms post text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) if n.is_finite() => Some(*n),
            AnswerValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

/// Question id → answer. Ordered so persisted JSON and prompts are stable.
pub type Responses = BTreeMap<String, AnswerValue>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct DreamScores {
    pub demand: f64,
    pub revenue: f64,
    pub engine: f64,
    pub admin: f64,
    pub marketing: f64,
    pub overall: f64,
}

impl DreamScores {
    pub fn pillar(&self, pillar: Pillar) -> f64 {
        match pillar {
            Pillar::Demand => self.demand,
            Pillar::Revenue => self.revenue,
            Pillar::Engine => self.engine,
            Pillar::Admin => self.admin,
            Pillar::Marketing => self.marketing,
        }
    }

    pub fn set_pillar(&mut self, pillar: Pillar, score: f64) {
        match pillar {
            Pillar::Demand => self.demand = score,
            Pillar::Revenue => self.revenue = score,
            Pillar::Engine => self.engine = score,
            Pillar::Admin => self.admin = score,
            Pillar::Marketing => self.marketing = score,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Assessment
// ────────────────────────────────────────────────────────────────────────────

/// A persisted assessment. `scores` is `Some` exactly when `status` is `Completed`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: Uuid,
    pub tier: Tier,
    pub status: AssessmentStatus,
    pub responses: Responses,
    pub scores: Option<DreamScores>,
    pub contact: ContactInfo,
    pub referral_code: Option<String>,
    pub strategy: Option<String>,
    pub strategy_generated_at: Option<DateTime<Utc>>,
    pub pdf_requested: bool,
    pub consultation_requested: bool,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Input to `AssessmentStore::create`.
#[derive(Debug, Clone)]
pub struct NewAssessment {
    pub tier: Tier,
    pub responses: Responses,
    pub scores: DreamScores,
    pub contact: Option<ContactInfo>,
    pub referral_code: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}

/// Fields a caller may change after creation. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AssessmentUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub pdf_requested: Option<bool>,
    pub consultation_requested: Option<bool>,
}

// ────────────────────────────────────────────────────────────────────────────
// Database row
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, FromRow)]
pub struct DreamAssessmentRow {
    pub id: Uuid,
    pub tier: String,
    pub status: String,
    pub responses: Value,
    pub demand_score: Option<f64>,
    pub revenue_score: Option<f64>,
    pub engine_score: Option<f64>,
    pub admin_score: Option<f64>,
    pub marketing_score: Option<f64>,
    pub overall_score: Option<f64>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_company: Option<String>,
    pub contact_phone: Option<String>,
    pub referral_code: Option<String>,
    pub strategy: Option<String>,
    pub strategy_generated_at: Option<DateTime<Utc>>,
    pub pdf_requested: bool,
    pub consultation_requested: bool,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DreamAssessmentRow> for Assessment {
    type Error = anyhow::Error;

    fn try_from(row: DreamAssessmentRow) -> Result<Self, Self::Error> {
        let tier: Tier = row.tier.parse().map_err(anyhow::Error::msg)?;
        let status: AssessmentStatus = row.status.parse().map_err(anyhow::Error::msg)?;
        let responses: Responses = serde_json::from_value(row.responses)?;

        let scores = match (
            status,
            row.demand_score,
            row.revenue_score,
            row.engine_score,
            row.admin_score,
            row.marketing_score,
            row.overall_score,
        ) {
            (
                AssessmentStatus::Completed,
                Some(demand),
                Some(revenue),
                Some(engine),
                Some(admin),
                Some(marketing),
                Some(overall),
            ) => Some(DreamScores {
                demand,
                revenue,
                engine,
                admin,
                marketing,
                overall,
            }),
            (AssessmentStatus::Completed, ..) => {
                anyhow::bail!("completed assessment {} is missing scores", row.id)
            }
            _ => None,
        };

        Ok(Assessment {
            id: row.id,
            tier,
            status,
            responses,
            scores,
            contact: ContactInfo {
                name: row.contact_name,
                email: row.contact_email,
                company: row.contact_company,
                phone: row.contact_phone,
            },
            referral_code: row.referral_code,
            strategy: row.strategy,
            strategy_generated_at: row.strategy_generated_at,
            pdf_requested: row.pdf_requested,
            consultation_requested: row.consultation_requested,
            created_at: row.created_at,
            started_at: row.started_at,
            completed_at: row.completed_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn completed_row() -> DreamAssessmentRow {
        let now = Utc::now();
        DreamAssessmentRow {
            id: Uuid::new_v4(),
            tier: "mini".to_string(),
            status: "completed".to_string(),
            responses: json!({ "d1": "established", "d2": 4, "m1": ["seo", "email"] }),
            demand_score: Some(7.5),
            revenue_score: Some(5.0),
            engine_score: Some(2.0),
            admin_score: Some(0.0),
            marketing_score: Some(10.0),
            overall_score: Some(4.9),
            contact_name: Some("Avery".to_string()),
            contact_email: None,
            contact_company: None,
            contact_phone: None,
            referral_code: None,
            strategy: None,
            strategy_generated_at: None,
            pdf_requested: false,
            consultation_requested: false,
            created_at: now,
            started_at: None,
            completed_at: Some(now),
            updated_at: now,
        }
    }

    #[test]
    fn test_answer_value_shapes() {
        let r: Responses =
            serde_json::from_value(json!({ "a": "x", "b": 3, "c": ["p", "q"] })).unwrap();
        assert_eq!(r["a"], AnswerValue::Text("x".to_string()));
        assert_eq!(r["b"], AnswerValue::Number(3.0));
        assert_eq!(
            r["c"],
            AnswerValue::List(vec!["p".to_string(), "q".to_string()])
        );
    }

    #[test]
    fn test_answer_value_rejects_other_shapes() {
        assert!(serde_json::from_value::<Responses>(json!({ "a": true })).is_err());
        assert!(serde_json::from_value::<Responses>(json!({ "a": { "x": 1 } })).is_err());
        assert!(serde_json::from_value::<Responses>(json!({ "a": [1, 2] })).is_err());
    }

    #[test]
    fn test_numeric_string_is_a_number() {
        assert_eq!(AnswerValue::Text(" 4 ".to_string()).as_number(), Some(4.0));
        assert_eq!(AnswerValue::Text("four".to_string()).as_number(), None);
        assert_eq!(AnswerValue::List(vec![]).as_number(), None);
    }

    #[test]
    fn test_tier_round_trips_through_str() {
        for tier in Tier::ALL {
            assert_eq!(tier.as_str().parse::<Tier>().unwrap(), tier);
        }
        assert!("huge".parse::<Tier>().is_err());
    }

    #[test]
    fn test_row_conversion_completed() {
        let assessment = Assessment::try_from(completed_row()).unwrap();
        assert_eq!(assessment.tier, Tier::Mini);
        let scores = assessment.scores.unwrap();
        assert_eq!(scores.pillar(Pillar::Marketing), 10.0);
        assert_eq!(assessment.contact.name.as_deref(), Some("Avery"));
    }

    #[test]
    fn test_row_conversion_completed_without_scores_fails() {
        let mut row = completed_row();
        row.overall_score = None;
        assert!(Assessment::try_from(row).is_err());
    }

    #[test]
    fn test_row_conversion_in_progress_has_no_scores() {
        let mut row = completed_row();
        row.status = "in_progress".to_string();
        let assessment = Assessment::try_from(row).unwrap();
        assert!(assessment.scores.is_none());
    }

    #[test]
    fn test_update_rejects_unknown_fields() {
        let err = serde_json::from_value::<AssessmentUpdate>(json!({ "overallScore": 10 }));
        assert!(err.is_err());
    }
}
