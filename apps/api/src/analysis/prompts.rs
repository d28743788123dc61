// All LLM prompt constants for the Analysis module.

/// System prompt for resume extraction.
pub const RESUME_ANALYSIS_SYSTEM: &str = "You are a professional HR resume analyst. \
    Extract the key facts of a resume into structured JSON. \
    Answer in the language of the resume.";

/// Resume extraction prompt template. Replace `{resume_text}` before sending.
pub const RESUME_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyse the following resume and extract its key information.

Return a JSON object with this EXACT schema:
{
  "name": "Candidate name",
  "contact": {"email": "Email address", "phone": "Phone number"},
  "education": [
    {"degree": "Bachelor / Master / PhD", "school": "School name", "major": "Major", "graduation_year": "2020"}
  ],
  "experience_years": 5,
  "work_experience": [
    {"company": "Company", "position": "Position", "period": "2019-2023", "description": "What they did"}
  ],
  "skills": ["Skill 1", "Skill 2"],
  "projects": [
    {"name": "Project", "role": "Role", "description": "Description", "technologies": ["Tech 1"]}
  ],
  "summary": "One or two sentences on the candidate's core strengths"
}

Rules:
1. Omit a field or leave it empty when the resume does not contain it
2. Extract skills as completely as possible
3. Derive experience_years from the work experience periods
4. Return JSON only

RESUME:
{resume_text}"#;
