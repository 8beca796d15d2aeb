// src/util.rs — Shared utility functions

/// One-line preview of a prompt for logs and tree dumps.
///
/// Whitespace runs (including newlines) collapse to a single space, and the
/// result is cut to at most `max_chars` characters with a trailing `…`.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut out: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}
