// Shared utility functions

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate a string to at most `max_width` display columns, appending an
/// ellipsis when anything was cut.
///
/// Counts display width rather than bytes, so emojis and CJK take two
/// columns, and never cuts inside a multi-byte character. Scanned payloads
/// and log messages are arbitrary text, so byte-index truncation is not an
/// option here.
pub fn truncate_ellipsis(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    // Leave one column for the ellipsis
    let target_width = max_width.saturating_sub(1);

    let mut current_width = 0;
    let mut truncate_at = 0;
    for (i, c) in s.char_indices() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > target_width {
            break;
        }
        current_width += char_width;
        truncate_at = i + c.len_utf8();
    }

    let mut out = s[..truncate_at].to_string();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorter_strings_pass_through() {
        assert_eq!(truncate_ellipsis("hello", 10), "hello");
        assert_eq!(truncate_ellipsis("", 5), "");
    }

    #[test]
    fn ascii_is_cut_with_ellipsis() {
        assert_eq!(truncate_ellipsis("hello world", 6), "hello…");
    }

    #[test]
    fn multibyte_payloads_never_split_a_character() {
        // 2 bytes per char; byte-index truncation would land mid-character
        let payload = "é".repeat(30);
        let cut = truncate_ellipsis(&payload, 10);
        assert_eq!(cut, format!("{}…", "é".repeat(9)));
        assert!(cut.is_char_boundary(cut.len()));
    }

    #[test]
    fn wide_characters_count_two_columns() {
        // Each CJK character occupies two display columns
        assert_eq!(truncate_ellipsis("日本語のテキスト", 7), "日本語…");
    }
}
