// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Instruction appended to every system prompt that expects structured output.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Common instruction for every prompt that quotes candidate or policy documents.
pub const EVIDENCE_INSTRUCTION: &str = "\
    Base every statement on the documents provided. \
    Do NOT infer, interpolate, or invent details. \
    If the documents do not support an answer, say so explicitly.";

/// Returns at most `max_chars` characters of `text`, never splitting a UTF-8 character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Fills `{key}` placeholders of a prompt template in a single pass.
/// Inserted values are never scanned again, so a placeholder inside caller text stays literal.
/// Braces that do not enclose a known key (e.g. JSON examples) are copied as-is.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut prompt = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        prompt.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let filled = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (close, *value))
        });

        match filled {
            Some((close, value)) => {
                prompt.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                prompt.push('{');
                rest = after;
            }
        }
    }

    prompt.push_str(rest);
    prompt
}
