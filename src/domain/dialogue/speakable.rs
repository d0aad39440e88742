//! Speakable-text shaping for the speech synthesis boundary.
//!
//! The synthesis port only receives plain, punctuation-light text:
//! markup is stripped and heavy punctuation is flattened so guidance
//! pulled from a formatted backend still reads naturally aloud.

/// Shapes arbitrary advisory text into plain speakable form.
///
/// Markdown-style markup characters are removed, list bullets become
/// sentence breaks, and dense punctuation collapses to commas. The
/// result keeps only periods, commas, and question marks.
pub fn speakable(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let line = line
            .trim()
            .trim_start_matches(&['#', '>', '-', '*', '•'][..])
            .trim();
        if line.is_empty() {
            continue;
        }
        if !out.is_empty() && !out.ends_with(['.', ',', '?']) {
            out.push('.');
        }
        if !out.is_empty() {
            out.push(' ');
        }
        for ch in line.chars() {
            match ch {
                '*' | '_' | '`' | '#' | '~' | '[' | ']' | '(' | ')' | '"' => {}
                ';' | ':' | '—' | '–' | '|' => out.push(','),
                '!' => out.push('.'),
                _ => out.push(ch),
            }
        }
    }
    // collapse doubled separators left behind by stripping
    let mut cleaned = String::with_capacity(out.len());
    let mut last_sep = false;
    for ch in out.chars() {
        let sep = matches!(ch, ',' | '.');
        if sep && last_sep {
            continue;
        }
        if ch == ' ' && cleaned.ends_with(' ') {
            continue;
        }
        last_sep = sep;
        cleaned.push(ch);
    }
    cleaned.trim().to_string()
}
