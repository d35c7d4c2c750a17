//! Email deliverables: the results report sent to the visitor and the
//! consultation notice sent to the internal inbox.

use crate::dream::recommendations::{generate_recommendations, rank_pillars};
use crate::dream::scoring::ScoreBand;
use crate::email::EmailMessage;
use crate::models::assessment::{Assessment, DreamScores, Pillar};

/// Builds the results report for `to`. Returns `None` when the assessment has no scores.
pub fn results_email(assessment: &Assessment, to: &str, results_url: &str) -> Option<EmailMessage> {
    let scores = assessment.scores.as_ref()?;
    let greeting = match assessment.contact.name.as_deref() {
        Some(name) => format!("Hi {name},"),
        None => "Hi there,".to_string(),
    };
    let recommendations = generate_recommendations(scores);
    let overall_band = ScoreBand::for_score(scores.overall);

    let mut text = format!(
        "{greeting}\n\nHere are the results of your {}.\n\nOverall DREAM score: {:.1}/10 ({})\n\n",
        assessment.tier.label(),
        scores.overall,
        overall_band.label()
    );
    for line in score_lines(scores) {
        text.push_str(&format!("- {line}\n"));
    }
    text.push_str("\nWhere to focus first:\n");
    for (i, rec) in recommendations.iter().enumerate() {
        text.push_str(&format!("{}. {rec}\n", i + 1));
    }
    text.push_str(&format!("\nView your full results: {results_url}\n"));

    let mut html = format!(
        "<p>{}</p><p>Here are the results of your {}.</p>\
         <h2>Overall DREAM score: {:.1}/10 ({})</h2><ul>",
        escape_html(&greeting),
        assessment.tier.label(),
        scores.overall,
        overall_band.label()
    );
    for line in score_lines(scores) {
        html.push_str(&format!("<li>{}</li>", escape_html(&line)));
    }
    html.push_str("</ul><h3>Where to focus first</h3><ol>");
    for rec in &recommendations {
        html.push_str(&format!("<li>{}</li>", escape_html(rec)));
    }
    html.push_str(&format!(
        "</ol><p><a href=\"{0}\">View your full results</a></p>",
        escape_html(results_url)
    ));

    Some(EmailMessage {
        to: to.to_string(),
        subject: format!("Your DREAM score: {:.1}/10", scores.overall),
        html,
        text,
        reply_to: None,
    })
}

/// Internal notice that a visitor asked for a consultation.
pub fn consultation_email(assessment: &Assessment, inbox: &str, results_url: &str) -> EmailMessage {
    let contact = &assessment.contact;
    let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    let weakest = assessment
        .scores
        .as_ref()
        .and_then(|s| rank_pillars(s).first().map(|r| format!("{} ({:.1})", r.pillar.label(), r.score)))
        .unwrap_or_else(|| "n/a".to_string());

    let details = [
        ("Name", field(&contact.name)),
        ("Email", field(&contact.email)),
        ("Company", field(&contact.company)),
        ("Phone", field(&contact.phone)),
        ("Tier", assessment.tier.label().to_string()),
        (
            "Overall",
            assessment
                .scores
                .map(|s| format!("{:.1}", s.overall))
                .unwrap_or_else(|| "n/a".to_string()),
        ),
        ("Weakest pillar", weakest),
        ("Referral", field(&assessment.referral_code)),
        ("Results", results_url.to_string()),
    ];

    let text = details
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("\n");
    let html = format!(
        "<ul>{}</ul>",
        details
            .iter()
            .map(|(k, v)| format!("<li><strong>{k}:</strong> {}</li>", escape_html(v)))
            .collect::<String>()
    );

    EmailMessage {
        to: inbox.to_string(),
        subject: format!(
            "Consultation request: {}",
            contact.company.as_deref().or(contact.name.as_deref()).unwrap_or("DREAM lead")
        ),
        html,
        text,
        reply_to: contact.email.clone(),
    }
}

fn score_lines(scores: &DreamScores) -> Vec<String> {
    Pillar::ALL
        .iter()
        .map(|&p| {
            let score = scores.pillar(p);
            format!("{}: {:.1}/10 ({})", p.label(), score, ScoreBand::for_score(score).label())
        })
        .collect()
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::assessment::{AssessmentStatus, ContactInfo, Responses, Tier};

    fn assessment(scores: Option<DreamScores>) -> Assessment {
        let now = Utc::now();
        Assessment {
            id: Uuid::new_v4(),
            tier: Tier::Medium,
            status: if scores.is_some() {
                AssessmentStatus::Completed
            } else {
                AssessmentStatus::InProgress
            },
            responses: Responses::new(),
            scores,
            contact: ContactInfo {
                name: Some("Sam <script>".to_string()),
                email: Some("sam@example.com".to_string()),
                company: Some("Fern & Co".to_string()),
                phone: None,
            },
            referral_code: Some("SPRING24".to_string()),
            strategy: None,
            strategy_generated_at: None,
            pdf_requested: true,
            consultation_requested: true,
            created_at: now,
            started_at: None,
            completed_at: scores.map(|_| now),
            updated_at: now,
        }
    }

    fn scores() -> DreamScores {
        DreamScores {
            demand: 6.5,
            revenue: 2.5,
            engine: 7.0,
            admin: 4.0,
            marketing: 8.5,
            overall: 5.7,
        }
    }

    #[test]
    fn test_results_email_contents() {
        let a = assessment(Some(scores()));
        let email = results_email(&a, "sam@example.com", "https://example.com/r/1").unwrap();

        assert_eq!(email.subject, "Your DREAM score: 5.7/10");
        assert!(email.text.contains("Revenue: 2.5/10 (Critical)"));
        assert!(email.text.contains("1. Revenue:"));
        assert!(email.text.contains("https://example.com/r/1"));
        assert!(email.html.contains("Sam &lt;script&gt;"));
        assert!(!email.html.contains("<script>"));
    }

    #[test]
    fn test_results_email_requires_scores() {
        assert!(results_email(&assessment(None), "sam@example.com", "x").is_none());
    }

    #[test]
    fn test_consultation_email() {
        let a = assessment(Some(scores()));
        let email = consultation_email(&a, "sales@example.com", "https://example.com/r/1");

        assert_eq!(email.to, "sales@example.com");
        assert_eq!(email.subject, "Consultation request: Fern & Co");
        assert_eq!(email.reply_to.as_deref(), Some("sam@example.com"));
        assert!(email.text.contains("Weakest pillar: Revenue (2.5)"));
        assert!(email.text.contains("Referral: SPRING24"));
        assert!(email.html.contains("Fern &amp; Co"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}
