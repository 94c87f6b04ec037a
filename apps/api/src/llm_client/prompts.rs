// Cross-cutting prompt fragments shared by every generator call.
// Feature-specific prompts live next to the feature (history/prompts.rs, generation/prompts.rs).

/// System prompt used by backends that accept one. Enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every drafting prompt. Ground truth always wins over the job description.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Every position title, company, date range and metric you output must come \
    from the candidate's job history. Do NOT invent, inflate, or move metrics between \
    positions. Do NOT use the job description's company or title for any position.";
