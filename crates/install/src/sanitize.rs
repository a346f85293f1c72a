const MAX_NAME_LEN: usize = 255;
const FALLBACK_NAME: &str = "unnamed-skill";

/// Turn an arbitrary asset name into a safe directory or file name.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9._]` to a
/// single `-`, truncates to 255 characters, and trims leading or trailing
/// `.` and `-`. A name with nothing left becomes `unnamed-skill`.
///
/// Idempotent: sanitizing an already-sanitized name returns it unchanged.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    let mut collapsed = String::with_capacity(name.len());
    let mut in_run = false;
    for ch in name.to_lowercase().chars() {
        if matches!(ch, 'a'..='z' | '0'..='9' | '.' | '_') {
            collapsed.push(ch);
            in_run = false;
        } else if !in_run {
            collapsed.push('-');
            in_run = true;
        }
    }

    let truncated: String = collapsed.chars().take(MAX_NAME_LEN).collect();
    let trimmed = truncated.trim_matches(['.', '-']);
    if trimmed.is_empty() {
        return FALLBACK_NAME.to_string();
    }
    trimmed.to_string()
}
