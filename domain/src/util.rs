//! Shared utility functions.

/// Truncate a string to at most `max_bytes` without splitting a UTF-8
/// character boundary.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Shorten text for error details and log lines, marking the cut with `...`.
pub fn abbreviate(s: &str, max_bytes: usize) -> String {
    let cut = truncate_str(s, max_bytes);
    if cut.len() == s.len() {
        s.to_string()
    } else {
        format!("{}...", cut)
    }
}

/// Replace every occurrence of each non-empty secret with `[REDACTED]`.
pub fn redact_all<'a>(text: &str, secrets: impl IntoIterator<Item = &'a str>) -> String {
    secrets
        .into_iter()
        .filter(|s| !s.is_empty())
        .fold(text.to_string(), |acc, secret| {
            acc.replace(secret, crate::client::REDACTED)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_multibyte_boundary() {
        let s = "あのね";
        assert_eq!(truncate_str(s, 4), "あ");
        assert_eq!(truncate_str(s, 9), "あのね");
        assert_eq!(truncate_str("", 10), "");
    }

    #[test]
    fn abbreviate_marks_cut() {
        assert_eq!(abbreviate("status 500: boom", 10), "status 500...");
        assert_eq!(abbreviate("short", 10), "short");
    }

    #[test]
    fn redact_all_skips_empty_secrets() {
        let out = redact_all("token s3cr3t and s3cr3t", ["s3cr3t", ""]);
        assert_eq!(out, "token [REDACTED] and [REDACTED]");
    }
}
