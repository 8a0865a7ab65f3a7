//! Prompt for the grammar and tone review.
//!
//! The model acts as a conservative legal-document editor: it flags only
//! severe grammar problems and clearly inappropriate tone, and answers with
//! a JSON object holding `grammar_errors` and `tone_errors` arrays.

const SYSTEM_INSTRUCTION: &str = "\
You are a conservative legal document quality analyzer. \
Only flag critical errors. Return valid JSON only.";

const REVIEW_INSTRUCTIONS: &str = "\
INSTRUCTIONS:
1. Grammar & Spelling - ONLY flag a sentence with 2+ of these SEVERE errors:
   - Subject-verb disagreement (\"They was\" -> \"They were\")
   - Double negatives (\"don't have no\" -> \"don't have any\")
   - Broken sentence structure (missing subject or verb)
   - Spelling mistakes that change meaning
   Do NOT flag minor punctuation, style preferences or complex sentences.

2. Tone & Plain Language - ONLY flag a sentence that contains:
   - Harsh or aggressive language (\"shut up\", insults)
   - Extreme informality in a formal context (\"ain't\", \"gonna\", \"y'all\")
   - Excessive jargon (3+ complex legal terms that obscure meaning)
   Do NOT flag proper legal terminology (\"pursuant\", \"aforementioned\").

3. Threshold: grammar only when the sentence is unreadable or confusing;
   tone only when clearly inappropriate for a professional setting.

OUTPUT FORMAT (JSON only, no markdown, no explanation):
{
  \"grammar_errors\": [
    {\"sentence_index\": 0, \"error_type\": \"grammar\",
     \"original_sentence\": \"...\", \"corrected_sentence\": \"...\"}
  ],
  \"tone_errors\": [
    {\"sentence_index\": 0, \"error_type\": \"tone_analysis\",
     \"original_sentence\": \"...\", \"corrected_sentence\": \"...\",
     \"tone_category\": \"harsh|jargon|informal\"}
  ]
}
If there are no critical issues of a kind, return an empty array for it.";

/// `(system_msg, user_msg)` for an OpenAI-compatible chat endpoint.
pub fn build_review_chat(text: &str) -> (String, String) {
    let user_msg = format!(
        "You are a professional legal document editor. \
         Analyze the following text for ONLY CRITICAL issues:\n\n\
         TEXT TO ANALYZE:\n{text}\n\n{REVIEW_INSTRUCTIONS}"
    );
    (SYSTEM_INSTRUCTION.to_string(), user_msg)
}

/// Collapse every run of whitespace to a single space and trim.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_embeds_text() {
        let (system, user) = build_review_chat("They was late.");
        assert!(system.contains("JSON"));
        assert!(user.contains("TEXT TO ANALYZE:\nThey was late."));
        assert!(user.contains("\"tone_errors\""));
    }

    #[test]
    fn whitespace_is_normalized() {
        assert_eq!(normalize_whitespace("  a\n\n b\t c  "), "a b c");
        assert_eq!(normalize_whitespace("   "), "");
    }
}
