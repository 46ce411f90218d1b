/// Marker appended when a summary is cut at the word bound.
pub const TRUNCATION_MARKER: &str = " …";

/// Truncate `text` to at most `max_words` whitespace-separated words,
/// appending the truncation marker when anything was cut.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return words.join(" ");
    }
    let mut out = words[..max_words].join(" ");
    out.push_str(TRUNCATION_MARKER);
    out
}

/// Strip Markdown code-fence markup from a model reply and return the
/// JSON-looking payload between the outermost braces.
///
/// This is deliberately conservative: it removes fences and trims, but
/// performs no repair of the JSON itself. Malformed payloads (including
/// trailing commas) are left for the decoder to reject.
pub fn strip_code_fences(reply: &str) -> String {
    let mut s = reply.trim();

    if let Some(rest) = s.strip_prefix("```json") {
        s = rest;
    } else if let Some(rest) = s.strip_prefix("```") {
        s = rest;
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    let s = s.trim();

    // Keep only the outermost object; models like to add prose around it.
    match (s.find('{'), s.rfind('}')) {
        (Some(start), Some(end)) if start < end => s[start..=end].to_string(),
        _ => s.to_string(),
    }
}

/// Greedy word wrap to a maximum line width in characters. Words longer
/// than the width get a line of their own.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_words("one two three", 5), "one two three");
    }

    #[test]
    fn long_text_is_cut_with_marker() {
        let out = truncate_words("a b c d e", 3);
        assert_eq!(out, format!("a b c{TRUNCATION_MARKER}"));
    }

    #[test]
    fn exact_bound_has_no_marker() {
        let out = truncate_words("a b c", 3);
        assert_eq!(out, "a b c");
    }

    #[test]
    fn strips_json_fence() {
        let reply = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(reply), "{\"a\": 1}");
    }

    #[test]
    fn strips_bare_fence_and_prose() {
        let reply = "Here is the result:\n```\n{\"a\": 1}\n```\nLet me know!";
        assert_eq!(strip_code_fences(reply), "{\"a\": 1}");
    }

    #[test]
    fn unfenced_object_passes_through() {
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 15);
        assert!(lines.iter().all(|l| l.chars().count() <= 15));
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn wrap_handles_overlong_word() {
        let lines = wrap_text("tiny incomprehensibilities tiny", 10);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "incomprehensibilities");
    }
}
