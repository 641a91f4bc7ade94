/// Cut `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

/// Cut `text` to `max_chars` characters and append `...` if anything was removed.
pub fn ellipsize(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", truncate_chars(text, max_chars))
    } else {
        text.to_string()
    }
}

/// Collapse runs of whitespace (including newlines from nested markup) into single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
