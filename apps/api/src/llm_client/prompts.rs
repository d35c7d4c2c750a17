// Shared prompt fragments. Each feature that calls the LLM keeps its own
// prompts.rs next to it and appends these where relevant.

/// Keeps generated narratives grounded in the data we send.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Base every observation on the scores and answers provided. \
    Do NOT invent revenue figures, headcounts, client names or results that are not in the input. \
    If the input does not support a claim, leave it out.";

/// Output formatting rules for narratives rendered as markdown on the website and in email.
pub const MARKDOWN_OUTPUT_INSTRUCTION: &str = "\
    Format the answer as GitHub-flavoured markdown using `##` section headings and short bullet lists. \
    Do NOT wrap the answer in code fences. \
    Do NOT add a preamble or sign-off.";
