//! Comment moderation
//!
//! A fixed banned-word list checked as a case-insensitive substring match.
//! Matches surface as a form validation error on the comment text, never as
//! an HTTP error.

/// Words that are not allowed to appear in comment text.
pub const BAD_WORDS: &[&str] = &["редиска", "негодяй"];

/// The validation message shown when a banned word is found.
pub const WARNING: &str = "Не ругайтесь!";

/// Find the first banned word contained in `text`, if any.
pub fn find_banned_word(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    BAD_WORDS.iter().copied().find(|word| lowered.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clean_text_passes() {
        assert_eq!(find_banned_word("Отличная статья!"), None);
        assert_eq!(find_banned_word(""), None);
    }

    #[test]
    fn test_banned_word_is_found() {
        assert_eq!(find_banned_word("редиска"), Some("редиска"));
        assert_eq!(find_banned_word("Ты просто негодяй."), Some("негодяй"));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert_eq!(find_banned_word("РЕДИСКА"), Some("редиска"));
        assert_eq!(find_banned_word("РеДиСкА"), Some("редиска"));
    }

    #[test]
    fn test_match_is_substring() {
        assert_eq!(find_banned_word("он редиска и хулиган"), Some("редиска"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Surrounding a banned word with arbitrary text never hides it.
        #[test]
        fn prop_embedded_banned_word_is_always_found(
            prefix in "[a-zA-Zа-яА-Я ]{0,20}",
            suffix in "[a-zA-Zа-яА-Я ]{0,20}",
        ) {
            let text = format!("{}редиска{}", prefix, suffix);
            prop_assert_eq!(find_banned_word(&text), Some("редиска"));
        }

        /// ASCII-only text can never trip the (cyrillic) word list.
        #[test]
        fn prop_ascii_text_passes(text in "[a-zA-Z0-9 .,!?]{0,64}") {
            prop_assert_eq!(find_banned_word(&text), None);
        }
    }
}
