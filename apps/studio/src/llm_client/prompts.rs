// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it
// and composes these cross-cutting pieces into its templates.

/// Instruction that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    OUTPUT: You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Anti-fabrication rule appended to every rewrite prompt.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: Do NOT invent employers, titles, dates, degrees, certifications, \
    skills or achievements. Every statement must be supported by the original \
    document. If the job asks for something the candidate does not have, leave it out.";
