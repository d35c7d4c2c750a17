// Prompt constants for DREAM strategy generation.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for the strategy narrative.
pub const STRATEGY_SYSTEM: &str = "You are a senior growth consultant who works with \
    owner-led service businesses using the DREAM framework: Demand, Revenue, Engine, Admin and Marketing. \
    You write direct, practical strategy briefs in plain English for busy founders.";

/// Strategy prompt template. Replace `{company_line}`, `{tier_label}`, `{score_table}`,
/// `{priority_order}` and `{answers}` before sending.
pub const STRATEGY_PROMPT_TEMPLATE: &str = r#"Write a personalised growth strategy for the business below, based on its DREAM assessment.

{company_line}
Assessment depth: {tier_label}

## Scores (0-10)
{score_table}

## Pillars from weakest to strongest
{priority_order}

## Answers given
{answers}

Structure the strategy with these sections:
1. Executive summary (3-4 sentences on where the business stands overall)
2. Top priority: the weakest pillar, why it matters now, and three concrete actions for the next 30 days
3. Second priority: the next weakest pillar with two actions for the next 90 days
4. Strengths to leverage: how the strongest pillar can fund or accelerate the fixes above
5. 90-day roadmap: a month-by-month plan

Keep it under 700 words."#;

/// Token budget for a strategy narrative.
pub const STRATEGY_MAX_TOKENS: u32 = 2048;
