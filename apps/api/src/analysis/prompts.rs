// All LLM prompt constants for the Analysis module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{DATA_NOT_INSTRUCTIONS, JSON_ONLY_PREAMBLE};

/// ATS review prompt. Replace `{target_role}` (JSON-quoted) before sending;
/// the resume block is appended after it.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are a senior technical recruiter reviewing a resume the way an ATS (applicant tracking system) and a hiring manager would.

TARGET ROLE: {target_role}

Return a JSON object with this EXACT schema (no extra fields):
{
  "atsScore": 0,
  "strengths": ["string"],
  "weakAreas": ["string"],
  "missingSkills": ["string"],
  "projectGaps": ["string"],
  "quickFixes": ["string"],
  "oneLineVerdict": "string"
}

FIELD RULES:
- atsScore: integer from 0 to 100, how likely this resume passes ATS screening for the target role
- strengths, weakAreas, missingSkills, projectGaps, quickFixes: arrays of short strings; use [] when nothing applies
- oneLineVerdict: a single sentence

BEHAVIOUR RULES:
1. Be realistic; do not inflate the score to be encouraging
2. Write in a beginner-friendly tone; explain jargon briefly when you use it
3. If there is no portfolio, GitHub profile, or deployed/live project link, call it out in projectGaps
4. missingSkills must be specific to the target role, not generic advice
5. quickFixes must be concrete edits the candidate can make today
6. {data_rule}
7. Return ONLY the JSON object. No markdown, no code fences, no commentary"#;

/// Builds the analysis prompt. Pure and deterministic: same inputs, same string.
pub fn build_analysis_prompt(target_role: &str, resume_text: &str) -> String {
    // JSON quoting escapes quotes and newlines in caller-supplied roles.
    let quoted_role = serde_json::Value::String(target_role.to_string()).to_string();
    let fence = fence_for(resume_text);

    let mut prompt = String::with_capacity(
        JSON_ONLY_PREAMBLE.len() + ANALYSIS_PROMPT_TEMPLATE.len() + resume_text.len() + 64,
    );
    prompt.push_str(JSON_ONLY_PREAMBLE);
    prompt.push_str("\n\n");
    prompt.push_str(
        &ANALYSIS_PROMPT_TEMPLATE
            .replace("{data_rule}", DATA_NOT_INSTRUCTIONS)
            .replace("{target_role}", &quoted_role),
    );
    prompt.push_str("\n\nRESUME:\n");
    prompt.push_str(&fence);
    prompt.push('\n');
    prompt.push_str(resume_text);
    prompt.push('\n');
    prompt.push_str(&fence);
    prompt
}

/// A backtick fence longer than any backtick run inside `text`, so the
/// resume cannot close the block early.
fn fence_for(text: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in text.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}
