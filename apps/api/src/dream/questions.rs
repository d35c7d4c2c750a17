//! The DREAM question bank.
//!
//! Questions are ranked 1..=20 within their pillar. A tier includes every question
//! whose rank is at most `Tier::questions_per_pillar()`, so tier membership is
//! derived and never stored. Choice options and scale bounds feed the scorer.

use serde::Serialize;

use crate::models::assessment::{Pillar, Tier};

/// Highest rank a question may carry within its pillar.
pub const MAX_RANK: u8 = 20;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    SingleChoice,
    Scale,
    MultiChoice,
}

#[derive(Debug, Serialize)]
pub struct AnswerOption {
    pub value: &'static str,
    pub label: &'static str,
    /// Contribution on the 0–10 scale.
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleBounds {
    pub min: f64,
    pub max: f64,
    pub min_label: &'static str,
    pub max_label: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DreamQuestion {
    pub id: &'static str,
    pub pillar: Pillar,
    pub rank: u8,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub prompt: &'static str,
    #[serde(skip_serializing_if = "no_options")]
    pub options: &'static [AnswerOption],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleBounds>,
    pub weight: f64,
}

fn no_options(options: &&'static [AnswerOption]) -> bool {
    options.is_empty()
}

impl DreamQuestion {
    pub fn in_tier(&self, tier: Tier) -> bool {
        debug_assert!((1..=MAX_RANK).contains(&self.rank), "rank out of range: {}", self.id);
        self.rank <= tier.questions_per_pillar()
    }

    pub fn option(&self, value: &str) -> Option<&'static AnswerOption> {
        self.options.iter().find(|o| o.value == value)
    }

    const fn single(
        id: &'static str,
        pillar: Pillar,
        rank: u8,
        prompt: &'static str,
        options: &'static [AnswerOption],
    ) -> Self {
        DreamQuestion {
            id,
            pillar,
            rank,
            kind: QuestionType::SingleChoice,
            prompt,
            options,
            scale: None,
            weight: 1.0,
        }
    }

    const fn multi(
        id: &'static str,
        pillar: Pillar,
        rank: u8,
        prompt: &'static str,
        options: &'static [AnswerOption],
    ) -> Self {
        DreamQuestion {
            id,
            pillar,
            rank,
            kind: QuestionType::MultiChoice,
            prompt,
            options,
            scale: None,
            weight: 1.0,
        }
    }

    const fn scale(
        id: &'static str,
        pillar: Pillar,
        rank: u8,
        prompt: &'static str,
        bounds: ScaleBounds,
    ) -> Self {
        DreamQuestion {
            id,
            pillar,
            rank,
            kind: QuestionType::Scale,
            prompt,
            options: &[],
            scale: Some(bounds),
            weight: 1.0,
        }
    }

    const fn weighted(self, weight: f64) -> Self {
        DreamQuestion { weight, ..self }
    }
}

const fn opt(value: &'static str, label: &'static str, score: f64) -> AnswerOption {
    AnswerOption {
        value,
        label,
        score,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared option sets and scales
// ────────────────────────────────────────────────────────────────────────────

const MATURITY: &[AnswerOption] = &[
    opt("none", "We don't do this yet", 0.0),
    opt("ad_hoc", "Ad hoc, when someone remembers", 3.0),
    opt("developing", "Partly defined, applied inconsistently", 5.0),
    opt("established", "Documented and applied consistently", 8.0),
    opt("optimized", "Measured and continuously improved", 10.0),
];

const FREQUENCY: &[AnswerOption] = &[
    opt("never", "Never", 0.0),
    opt("yearly", "Once a year or less", 3.0),
    opt("quarterly", "Quarterly", 5.0),
    opt("monthly", "Monthly", 8.0),
    opt("weekly", "Weekly or more often", 10.0),
];

const RELIABILITY: &[AnswerOption] = &[
    opt("rarely", "Rarely", 0.0),
    opt("sometimes", "Sometimes", 3.0),
    opt("usually", "Usually", 5.0),
    opt("almost_always", "Almost always", 8.0),
    opt("always", "Always, with data to prove it", 10.0),
];

const ONE_TO_FIVE: ScaleBounds = ScaleBounds {
    min: 1.0,
    max: 5.0,
    min_label: "Not at all",
    max_label: "Completely",
};

const ZERO_TO_TEN: ScaleBounds = ScaleBounds {
    min: 0.0,
    max: 10.0,
    min_label: "Very poor",
    max_label: "Excellent",
};

const LEAD_CHANNELS: &[AnswerOption] = &[
    opt("none", "None consistently", 0.0),
    opt("referrals", "Word of mouth and referrals", 6.0),
    opt("paid", "Paid advertising", 7.0),
    opt("content", "Content and SEO", 8.0),
    opt("outbound", "Outbound prospecting", 7.0),
    opt("partners", "Partnerships", 8.0),
    opt("system", "A documented multi-channel acquisition system", 10.0),
];

const DEMAND_SIGNALS: &[AnswerOption] = &[
    opt("none", "We don't track demand signals", 0.0),
    opt("search", "Search trends and keyword volume", 6.0),
    opt("website", "Website and landing page analytics", 7.0),
    opt("social", "Social engagement", 5.0),
    opt("sales_calls", "Insights logged from sales conversations", 8.0),
    opt("dashboard", "A unified demand dashboard", 10.0),
];

const PREDICTABILITY: &[AnswerOption] = &[
    opt("unpredictable", "Highly unpredictable", 0.0),
    opt("seasonal", "Swings with seasons or big deals", 3.0),
    opt("somewhat", "Somewhat predictable", 5.0),
    opt("mostly", "Mostly predictable", 8.0),
    opt("recurring", "Contracted or recurring", 10.0),
];

const REPEAT_SHARE: &[AnswerOption] = &[
    opt("under_10", "Under 10%", 0.0),
    opt("10_25", "10–25%", 3.0),
    opt("25_50", "25–50%", 5.0),
    opt("50_75", "50–75%", 8.0),
    opt("over_75", "Over 75%", 10.0),
];

const REVENUE_STREAMS: &[AnswerOption] = &[
    opt("none", "No consistent stream yet", 0.0),
    opt("projects", "One-off projects", 3.0),
    opt("retainers", "Retainers", 8.0),
    opt("products", "Productised services or products", 7.0),
    opt("licensing", "Licensing or royalties", 6.0),
    opt("subscriptions", "Subscriptions", 10.0),
];

const AUTOMATION: &[AnswerOption] = &[
    opt("none", "Nothing is automated", 0.0),
    opt("onboarding", "Client onboarding", 7.0),
    opt("scheduling", "Scheduling", 6.0),
    opt("reporting", "Reporting", 7.0),
    opt("invoicing", "Invoicing", 6.0),
    opt("end_to_end", "End-to-end delivery workflow", 10.0),
];

const BOOKS_CURRENCY: &[AnswerOption] = &[
    opt("behind", "Months behind", 0.0),
    opt("quarterly", "Caught up each quarter", 3.0),
    opt("monthly", "Reconciled monthly", 5.0),
    opt("weekly", "Reconciled weekly", 8.0),
    opt("realtime", "Real-time with live reporting", 10.0),
];

const ADMIN_SYSTEMS: &[AnswerOption] = &[
    opt("none", "None of them", 0.0),
    opt("bookkeeping", "Bookkeeping", 7.0),
    opt("payroll", "Payroll", 7.0),
    opt("hiring", "Hiring and onboarding", 6.0),
    opt("legal", "Contracts and legal", 6.0),
    opt("all", "All of the above, with owners and checklists", 10.0),
];

const MARKETING_CHANNELS: &[AnswerOption] = &[
    opt("none", "None actively", 0.0),
    opt("social", "Social media", 5.0),
    opt("email", "Email marketing", 8.0),
    opt("seo", "SEO and content", 8.0),
    opt("paid", "Paid media", 7.0),
    opt("events", "Events and speaking", 5.0),
    opt("integrated", "An integrated, measured channel mix", 10.0),
];

// ────────────────────────────────────────────────────────────────────────────
// Question bank
// ────────────────────────────────────────────────────────────────────────────

use Pillar::{Admin, Demand, Engine, Marketing, Revenue};

/// The full bank, ordered by pillar then rank.
pub static QUESTIONS: &[DreamQuestion] = &[
    // Demand
    DreamQuestion::single("d1", Demand, 1, "How clearly defined is your ideal customer profile?", MATURITY),
    DreamQuestion::scale("d2", Demand, 2, "How predictable is your monthly flow of new inbound leads?", ONE_TO_FIVE),
    DreamQuestion::multi("d3", Demand, 3, "Which channels consistently bring you qualified leads?", LEAD_CHANNELS),
    DreamQuestion::single("d4", Demand, 4, "How well do you understand why customers choose you over competitors?", MATURITY).weighted(1.2),
    DreamQuestion::scale("d5", Demand, 5, "How confident are you in your sales pipeline for the next 90 days?", ZERO_TO_TEN),
    DreamQuestion::single("d6", Demand, 6, "How often do you review lead volume and quality?", FREQUENCY),
    DreamQuestion::single("d7", Demand, 7, "Do you have a documented value proposition for each customer segment?", MATURITY),
    DreamQuestion::scale("d8", Demand, 8, "How closely does your offer match what the market is asking for today?", ONE_TO_FIVE),
    DreamQuestion::single("d9", Demand, 9, "How often do you collect feedback on unmet customer needs?", FREQUENCY),
    DreamQuestion::multi("d10", Demand, 10, "Which demand signals do you track?", DEMAND_SIGNALS),
    // Revenue
    DreamQuestion::single("r1", Revenue, 1, "How predictable is your monthly revenue?", PREDICTABILITY),
    DreamQuestion::scale("r2", Revenue, 2, "How confident are you that your pricing reflects the value you deliver?", ONE_TO_FIVE),
    DreamQuestion::single("r3", Revenue, 3, "What share of revenue comes from repeat or recurring customers?", REPEAT_SHARE).weighted(1.2),
    DreamQuestion::single("r4", Revenue, 4, "How do you track your sales pipeline and conversion rates?", MATURITY),
    DreamQuestion::multi("r5", Revenue, 5, "Which revenue streams does the business run?", REVENUE_STREAMS),
    DreamQuestion::scale("r6", Revenue, 6, "How healthy are your profit margins compared with your industry?", ZERO_TO_TEN),
    DreamQuestion::single("r7", Revenue, 7, "How often do you review pricing and packaging?", FREQUENCY),
    DreamQuestion::single("r8", Revenue, 8, "How consistent is your close rate from month to month?", RELIABILITY),
    DreamQuestion::scale("r9", Revenue, 9, "How well do you know your customer lifetime value?", ONE_TO_FIVE),
    DreamQuestion::single("r10", Revenue, 10, "How deliberately do you run upsells and cross-sells?", MATURITY),
    // Engine
    DreamQuestion::single("e1", Engine, 1, "How documented are your core delivery processes?", MATURITY),
    DreamQuestion::scale("e2", Engine, 2, "How well would the business run for two weeks without you?", ONE_TO_FIVE),
    DreamQuestion::multi("e3", Engine, 3, "Which parts of delivery are automated?", AUTOMATION),
    DreamQuestion::single("e4", Engine, 4, "How consistently do you hit delivery deadlines?", RELIABILITY).weighted(1.2),
    DreamQuestion::scale("e5", Engine, 5, "How satisfied are customers with the quality of delivery?", ZERO_TO_TEN),
    DreamQuestion::single("e6", Engine, 6, "How often do you measure team capacity and utilisation?", FREQUENCY),
    DreamQuestion::single("e7", Engine, 7, "How clearly are roles and responsibilities defined?", MATURITY),
    DreamQuestion::scale("e8", Engine, 8, "How easily could you double delivery volume?", ONE_TO_FIVE),
    DreamQuestion::single("e9", Engine, 9, "How do you capture and reuse lessons learned?", MATURITY),
    DreamQuestion::single("e10", Engine, 10, "How well integrated are your delivery tools?", MATURITY),
    // Admin
    DreamQuestion::single("a1", Admin, 1, "How up to date are your financial books?", BOOKS_CURRENCY),
    DreamQuestion::scale("a2", Admin, 2, "How confident are you in your cash-flow forecast?", ONE_TO_FIVE),
    DreamQuestion::single("a3", Admin, 3, "How are contracts, policies and compliance managed?", MATURITY),
    DreamQuestion::multi("a4", Admin, 4, "Which admin functions are systematised?", ADMIN_SYSTEMS),
    DreamQuestion::single("a5", Admin, 5, "How often does leadership review KPIs?", FREQUENCY).weighted(1.2),
    DreamQuestion::scale("a6", Admin, 6, "How free is your week from admin work you could delegate?", ZERO_TO_TEN),
    DreamQuestion::single("a7", Admin, 7, "How ready is your legal and tax structure for growth?", MATURITY),
    DreamQuestion::single("a8", Admin, 8, "How are customer data and documents stored and secured?", MATURITY),
    DreamQuestion::scale("a9", Admin, 9, "How prepared are you for an audit or due diligence today?", ONE_TO_FIVE),
    DreamQuestion::single("a10", Admin, 10, "How are budgets set and tracked?", MATURITY),
    // Marketing
    DreamQuestion::single("m1", Marketing, 1, "How consistent is your brand message across channels?", MATURITY),
    DreamQuestion::multi("m2", Marketing, 2, "Which marketing channels do you actively run?", MARKETING_CHANNELS),
    DreamQuestion::scale("m3", Marketing, 3, "How well do you measure marketing return on investment?", ONE_TO_FIVE),
    DreamQuestion::single("m4", Marketing, 4, "How often do you publish new content?", FREQUENCY),
    DreamQuestion::single("m5", Marketing, 5, "How documented is your marketing plan?", MATURITY).weighted(1.2),
    DreamQuestion::scale("m6", Marketing, 6, "How strong is your online reputation (reviews, testimonials, case studies)?", ZERO_TO_TEN),
    DreamQuestion::single("m7", Marketing, 7, "How do you nurture leads who are not ready to buy yet?", MATURITY),
    DreamQuestion::single("m8", Marketing, 8, "How often do you test new campaigns or messages?", FREQUENCY),
    DreamQuestion::scale("m9", Marketing, 9, "How smoothly does marketing hand leads over to sales?", ONE_TO_FIVE),
    DreamQuestion::single("m10", Marketing, 10, "How well do you know your customer acquisition cost?", MATURITY),
];

pub fn find_question(id: &str) -> Option<&'static DreamQuestion> {
    QUESTIONS.iter().find(|q| q.id == id)
}

/// Questions asked at `tier`, in pillar then rank order.
pub fn questions_for_tier(tier: Tier) -> Vec<&'static DreamQuestion> {
    let mut questions: Vec<_> = QUESTIONS.iter().filter(|q| q.in_tier(tier)).collect();
    questions.sort_by_key(|q| (q.pillar, q.rank));
    questions
}
