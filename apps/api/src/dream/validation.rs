use serde::Serialize;

use crate::dream::questions::{find_question, DreamQuestion, QuestionType};
use crate::models::assessment::{AnswerValue, Responses};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResponseIssue {
    pub question_id: String,
    pub reason: String,
}

/// Checks every answer against the shape its question type requires.
/// Collects all issues rather than stopping at the first.
pub fn validate_responses(responses: &Responses) -> Vec<ResponseIssue> {
    responses
        .iter()
        .filter_map(|(id, answer)| {
            let reason = match find_question(id) {
                None => Some("unknown question".to_string()),
                Some(question) => check_answer(question, answer),
            };
            reason.map(|reason| ResponseIssue {
                question_id: id.clone(),
                reason,
            })
        })
        .collect()
}

fn check_answer(question: &DreamQuestion, answer: &AnswerValue) -> Option<String> {
    match question.kind {
        QuestionType::SingleChoice => match answer {
            AnswerValue::Text(value) if question.option(value).is_some() => None,
            AnswerValue::Text(value) => Some(format!("'{value}' is not a valid option")),
            _ => Some("expected a single option value".to_string()),
        },
        QuestionType::MultiChoice => match answer {
            AnswerValue::List(values) if values.is_empty() => {
                Some("select at least one option".to_string())
            }
            AnswerValue::List(values) => {
                let unknown: Vec<&str> = values
                    .iter()
                    .map(String::as_str)
                    .filter(|v| question.option(v).is_none())
                    .collect();
                if unknown.is_empty() {
                    None
                } else {
                    Some(format!("unknown options: {}", unknown.join(", ")))
                }
            }
            _ => Some("expected a list of option values".to_string()),
        },
        QuestionType::Scale => {
            let Some(bounds) = question.scale else {
                return Some("question has no scale configured".to_string());
            };
            match answer.as_number() {
                Some(n) if n >= bounds.min && n <= bounds.max => None,
                Some(n) => Some(format!(
                    "{n} is outside the scale {}–{}",
                    bounds.min, bounds.max
                )),
                None => Some("expected a number".to_string()),
            }
        }
    }
}

/// Renders issues as a single human-readable validation message.
pub fn describe_issues(issues: &[ResponseIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.question_id, i.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Loose email check: one '@' with a non-empty local part and a dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responses(pairs: Vec<(&str, AnswerValue)>) -> Responses {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_valid_answers_pass() {
        let r = responses(vec![
            ("d1", AnswerValue::Text("established".to_string())),
            ("d2", AnswerValue::Number(4.0)),
            ("d3", AnswerValue::List(vec!["content".to_string(), "paid".to_string()])),
            ("r2", AnswerValue::Text("3".to_string())),
        ]);
        assert!(validate_responses(&r).is_empty());
    }

    #[test]
    fn test_unknown_question_rejected() {
        let r = responses(vec![("zz9", AnswerValue::Number(1.0))]);
        let issues = validate_responses(&r);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].question_id, "zz9");
    }

    #[test]
    fn test_bad_single_choice() {
        let r = responses(vec![
            ("d1", AnswerValue::Text("legendary".to_string())),
            ("r1", AnswerValue::Number(2.0)),
        ]);
        assert_eq!(validate_responses(&r).len(), 2);
    }

    #[test]
    fn test_bad_multi_choice() {
        let r = responses(vec![
            ("d3", AnswerValue::List(vec![])),
            ("e3", AnswerValue::List(vec!["teleport".to_string()])),
            ("a4", AnswerValue::Text("payroll".to_string())),
        ]);
        let issues = validate_responses(&r);
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().any(|i| i.reason.contains("teleport")));
    }

    #[test]
    fn test_scale_out_of_range() {
        let r = responses(vec![
            ("d2", AnswerValue::Number(6.0)),
            ("d5", AnswerValue::Number(-1.0)),
            ("e2", AnswerValue::Text("lots".to_string())),
        ]);
        assert_eq!(validate_responses(&r).len(), 3);
    }

    #[test]
    fn test_describe_issues() {
        let issues = vec![
            ResponseIssue {
                question_id: "d1".to_string(),
                reason: "bad".to_string(),
            },
            ResponseIssue {
                question_id: "d2".to_string(),
                reason: "worse".to_string(),
            },
        ];
        assert_eq!(describe_issues(&issues), "d1: bad; d2: worse");
    }

    #[test]
    fn test_email_check() {
        assert!(is_valid_email("owner@example.com"));
        assert!(is_valid_email("  first.last@mail.example.co.uk "));
        assert!(!is_valid_email("owner@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("owner@localhost"));
        assert!(!is_valid_email("owner@@example.com"));
        assert!(!is_valid_email("own er@example.com"));
        assert!(!is_valid_email("not-an-email"));
    }
}
