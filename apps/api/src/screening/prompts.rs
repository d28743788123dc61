// All LLM prompt constants for the Screening module.

pub const SCREENING_SYSTEM: &str = "You are an experienced HR specialist who evaluates \
    how well a candidate matches a position. Answer in the language of the requirements.";

/// Per-resume screening prompt. Replace `{requirements}` and `{resume_text}` before sending.
pub const SCREENING_PROMPT_TEMPLATE: &str = r#"Assess whether the following candidate matches the position requirements.

POSITION REQUIREMENTS:
{requirements}

CANDIDATE RESUME:
{resume_text}

Return a JSON object with this EXACT schema:
{
  "match_score": 85,
  "strengths": ["Strength 1", "Strength 2"],
  "weaknesses": ["Weakness 1"],
  "recommendations": "Whether to interview, and why",
  "key_highlights": ["Highlight 1"],
  "concerns": ["Concern 1"]
}

match_score is an integer from 0 to 100."#;
