// All LLM prompt constants for the Benefits module.

pub const BENEFIT_QUERY_SYSTEM: &str = "You are a professional HR benefits-policy assistant. \
    You read policy documents carefully and answer employee questions accurately. \
    Answer in the language of the question.";

/// Benefits question prompt. Replace `{document_count}`, `{query}` and `{documents_json}`.
pub const BENEFIT_QUERY_PROMPT_TEMPLATE: &str = r#"I have {document_count} employee benefits policy documents. An employee asks:

QUESTION:
{query}

Read the content of every policy document below (the `content` field) and answer the question
based on those documents.

Return a JSON object with this EXACT schema:
{
  "answer": "A detailed answer grounded in the policy documents",
  "relevant_documents": ["File name 1", "File name 2"],
  "key_points": ["Key point 1", "Key point 2"],
  "source_quote": "Verbatim quote from the policy, if any"
}

Rules:
1. Be accurate and detailed; rely on the actual policy content
2. When several documents are relevant, combine them
3. When the policies do not cover the question, say so clearly

POLICY DOCUMENTS:
{documents_json}"#;
