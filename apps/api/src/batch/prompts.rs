// All LLM prompt constants for the Batch module.

pub const BATCH_QUERY_SYSTEM: &str = "You are a professional HR screening assistant. \
    You read every resume in full and select the candidates that satisfy a request. \
    Answer in the language of the request.";

/// Batch query prompt. Replace `{resume_count}`, `{query}` and `{resumes_json}` before sending.
pub const BATCH_QUERY_PROMPT_TEMPLATE: &str = r#"I have {resume_count} resumes to screen against the following request.

REQUEST:
{query}

Read the full text of every resume below (the `full_text` field): work history, projects,
education and every other detail. Then return the candidates that satisfy the request.

Return a JSON object with this EXACT schema:
{
  "matched_candidates": [
    {
      "doc_id": "the exact doc_id of the resume",
      "filename": "File name",
      "name": "Candidate name",
      "reason": "Why this candidate matches, citing the resume",
      "highlights": ["Concrete experience 1", "Concrete project 2"]
    }
  ],
  "summary": "One sentence summarising the screening",
  "match_count": 1
}

Use ONLY doc_id values that appear below. Return an empty matched_candidates array when nobody matches.

RESUMES:
{resumes_json}"#;
