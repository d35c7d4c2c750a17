use anyhow::{Context, Result};
use secrecy::SecretString;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
///
/// The AI and email credentials are optional: without them the strategy
/// endpoint answers 503 and report emails are skipped.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: Option<SecretString>,
    pub resend_api_key: Option<SecretString>,
    pub email_from: String,
    /// Internal inbox notified when a visitor asks for a consultation.
    pub consultation_inbox: Option<String>,
    /// Public site origin, used to build result links in emails.
    pub site_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY").map(SecretString::new),
            resend_api_key: optional_env("RESEND_API_KEY").map(SecretString::new),
            email_from: optional_env("EMAIL_FROM")
                .unwrap_or_else(|| "DREAM Assessment <results@dreamframework.co>".to_string()),
            consultation_inbox: optional_env("CONSULTATION_INBOX"),
            site_url: optional_env("SITE_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Link to the public results page for an assessment.
    pub fn results_url(&self, assessment_id: uuid::Uuid) -> String {
        format!("{}/dream/results/{}", self.site_url, assessment_id)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an optional variable; blank values count as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/dream_test".to_string(),
            anthropic_api_key: None,
            resend_api_key: None,
            email_from: "DREAM Assessment <results@example.com>".to_string(),
            consultation_inbox: Some("sales@example.com".to_string()),
            site_url: "https://example.com".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_url() {
        let config = Config::for_tests();
        let id = uuid::Uuid::nil();
        assert_eq!(
            config.results_url(id),
            "https://example.com/dream/results/00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_optional_env_blank_is_unset() {
        std::env::set_var("DREAM_TEST_BLANK_VAR", "   ");
        assert_eq!(optional_env("DREAM_TEST_BLANK_VAR"), None);
        std::env::set_var("DREAM_TEST_SET_VAR", " value ");
        assert_eq!(optional_env("DREAM_TEST_SET_VAR").as_deref(), Some("value"));
    }
}
