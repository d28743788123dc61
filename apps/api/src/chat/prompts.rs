// All LLM prompt constants for the Document chat module.

pub const DOCUMENT_CHAT_SYSTEM: &str = "You are a professional HR assistant who analyses \
    resumes and answers questions about them. The user has uploaded a resume; read it carefully \
    and answer in the language of the user's question.";

/// Opening turn of every conversation. Replace `{document_text}`.
pub const DOCUMENT_ANALYSIS_PROMPT_TEMPLATE: &str = r#"This is the complete content of a resume:

{document_text}

Analyse this resume, extract the key information and summarise the candidate."#;
