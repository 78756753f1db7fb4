// LLM prompt constants for the rewrite module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Rewrite prompt template. Replace `{job_context}`, `{resume_json}`,
/// `{no_fabrication_instruction}` and `{json_only_instruction}` before sending.
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"ACT AS: Senior career auditor and applicant tracking system (ATS) specialist.
GOAL: Rewrite the résumé below to maximize its match rate for the target job while staying truthful.

--- TARGET JOB ---
{job_context}

--- ORIGINAL RÉSUMÉ (JSON) ---
{resume_json}

INTEGRITY RULES:
1. {no_fabrication_instruction}
2. ATS VOCABULARY: Use the job's terminology to describe what the candidate ALREADY has.
3. FOCUS: Improve "resumo" and "experiencias" with strong action verbs.
4. STRUCTURE: Keep exactly the same JSON keys and nesting as the original. Do not rename,
   translate, add or remove keys. "nome", "contato" and "experiencias" must be present.

{json_only_instruction}
"#;
