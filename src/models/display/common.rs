//! Common display utilities and helpers

/// Truncate to at most `max_chars` characters, ending in "..." when cut
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate_string("Shine.", 10), "Shine.");
    }

    #[test]
    fn test_truncate_long_string() {
        let cut = truncate_string("Trust your intuition today.", 12);
        assert_eq!(cut, "Trust you...");
        assert_eq!(cut.chars().count(), 12);
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_string("♈♉♊♋♌♍", 5), "♈♉...");
    }
}
