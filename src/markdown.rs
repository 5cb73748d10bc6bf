//! Markdown cleanup and word extraction.
//!
//! Cleaning is a fixed sequence of regex substitutions. It is intentionally
//! lossy: link labels are dropped along with their URLs, and unterminated
//! fences or links are left to whatever the patterns happen to match.

use regex::Regex;
use std::sync::LazyLock;

/// Fenced code blocks, spanning newlines.
static FENCED_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());

/// Inline code spans on a single line.
static INLINE_CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`.*?`").unwrap());

static IMAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[.*?\]\(.*?\)").unwrap());

static LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[.*?\]\(.*?\)").unwrap());

/// Leftover emphasis, heading, quote, and list markers.
static FORMATTING_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*_~#>`-]").unwrap());

static WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[a-zA-Z]{2,}\b").unwrap());

/// Strip markdown syntax, leaving text suitable for [`extract_words`].
///
/// Code (fenced and inline), images, and links are removed entirely.
/// Formatting characters are then deleted in place.
pub fn clean_markdown(text: &str) -> String {
    let text = FENCED_CODE_REGEX.replace_all(text, "");
    let text = INLINE_CODE_REGEX.replace_all(&text, "");
    let text = IMAGE_REGEX.replace_all(&text, "");
    let text = LINK_REGEX.replace_all(&text, "");
    FORMATTING_REGEX.replace_all(&text, "").into_owned()
}

/// Alphabetic words of two or more ASCII letters, in order of appearance.
///
/// Numbers, single letters, and anything glued to digits or non-ASCII
/// letters (e.g. `abc123`, `café`) are skipped. Case is preserved and
/// duplicates are kept.
pub fn extract_words(text: &str) -> Vec<&str> {
    WORD_REGEX.find_iter(text).map(|m| m.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_code_block_only() {
        let doc = "```rust\nfn main() {\n    println!(\"hi\");\n}\n```";
        assert!(clean_markdown(doc).trim().is_empty());
    }

    #[test]
    fn test_fenced_code_block_surrounded_by_text() {
        let doc = "Before\n```\nlet x = 1;\n```\nAfter";
        assert_eq!(extract_words(&clean_markdown(doc)), vec!["Before", "After"]);
    }

    #[test]
    fn test_inline_code_removed() {
        let cleaned = clean_markdown("Run `cargo build` first");
        assert_eq!(extract_words(&cleaned), vec!["Run", "first"]);
    }

    #[test]
    fn test_inline_code_does_not_span_lines() {
        let cleaned = clean_markdown("a `stray\nline` here");
        // No closing backtick on the first line, so nothing is removed as
        // code; the backticks themselves are stripped as formatting.
        assert_eq!(cleaned, "a stray\nline here");
    }

    #[test]
    fn test_image_removed() {
        let cleaned = clean_markdown("Logo: ![the logo](https://example.com/logo.png) end");
        assert_eq!(extract_words(&cleaned), vec!["Logo", "end"]);
    }

    #[test]
    fn test_link_label_and_url_removed() {
        let cleaned = clean_markdown("See [the docs](https://docs.rs/regex/1.0) for more");
        let words = extract_words(&cleaned);
        assert_eq!(words, vec!["See", "for", "more"]);
        assert!(!cleaned.contains("docs.rs"));
        assert!(!cleaned.contains("the docs"));
    }

    #[test]
    fn test_formatting_characters_stripped() {
        let cleaned = clean_markdown("# Title\n> quoted *bold* _it_ ~~gone~~ - item");
        assert_eq!(cleaned, " Title\n quoted bold it gone  item");
    }

    #[test]
    fn test_unterminated_fence_left_alone() {
        let cleaned = clean_markdown("```\nunclosed code");
        assert_eq!(extract_words(&cleaned), vec!["unclosed", "code"]);
    }

    #[test]
    fn test_extract_words_skips_numbers_and_single_letters() {
        assert_eq!(
            extract_words("hello, world! 123 a bb"),
            vec!["hello", "world", "bb"]
        );
    }

    #[test]
    fn test_extract_words_keeps_case_and_duplicates() {
        assert_eq!(extract_words("Word word WORD"), vec!["Word", "word", "WORD"]);
    }

    #[test]
    fn test_extract_words_requires_word_boundaries() {
        assert_eq!(extract_words("abc123 café x2y ok"), vec!["ok"]);
    }

    #[test]
    fn test_clean_markdown_idempotent_on_plain_text() {
        let plain = "Just some plain text.\nWith two lines, and punctuation!";
        let once = clean_markdown(plain);
        assert_eq!(once, plain);
        assert_eq!(clean_markdown(&once), once);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_markdown(""), "");
        assert!(extract_words("").is_empty());
    }
}
