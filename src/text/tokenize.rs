//! Word tokenization for spelling analysis.

/// Lower-cased alphabetic word tokens of `text`, in order of appearance.
///
/// A word is a maximal run of alphabetic characters; digits, apostrophes,
/// punctuation and whitespace all end a word.
///
/// ```
/// use grammar_assist::text::word_tokens;
///
/// assert_eq!(word_tokens("Don't file 2x!"), vec!["don", "t", "file", "x"]);
/// ```
pub fn word_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch.is_alphabetic() {
            current.extend(ch.to_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Distinct tokens in first-seen order.
pub fn unique_tokens(tokens: &[String]) -> Vec<&str> {
    let mut seen = std::collections::HashSet::new();
    tokens
        .iter()
        .map(String::as_str)
        .filter(|token| seen.insert(*token))
        .collect()
}
