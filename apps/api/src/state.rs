use std::sync::Arc;

use crate::config::Config;
use crate::dream::store::AssessmentStore;
use crate::dream::strategy::StrategyGenerator;
use crate::email::Mailer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence boundary. Default: PgAssessmentStore.
    pub store: Arc<dyn AssessmentStore>,
    /// Pluggable strategy backend. Default: LlmStrategyGenerator.
    pub strategist: Arc<dyn StrategyGenerator>,
    /// Outbound email. ResendMailer when RESEND_API_KEY is set, DisabledMailer otherwise.
    pub mailer: Arc<dyn Mailer>,
    pub config: Config,
}
