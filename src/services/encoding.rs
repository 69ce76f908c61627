//! Base64 rendering helpers shared by the signature services.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::domain::constants::BASE64_LINE_WIDTH;

/// Base64-encode and wrap at the profile's 76-column width.
#[must_use]
pub fn base64_block(data: &[u8]) -> String {
    wrap_at_columns(&STANDARD.encode(data), BASE64_LINE_WIDTH)
}

/// Re-wrap an existing single-line Base64 body at the given width.
#[must_use]
pub fn wrap_at_columns(text: &str, width: usize) -> String {
    text.as_bytes()
        .chunks(width)
        // Base64 alphabet is ASCII, so byte chunks are valid char boundaries.
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_body_stays_single_line() {
        assert_eq!(wrap_at_columns("abcd", 76), "abcd");
    }

    #[test]
    fn long_body_breaks_at_width() {
        let body = "A".repeat(80);
        let wrapped = wrap_at_columns(&body, 76);
        let lines: Vec<&str> = wrapped.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 76);
        assert_eq!(lines[1].len(), 4);
    }

    #[test]
    fn exact_multiple_has_no_trailing_newline() {
        let body = "A".repeat(152);
        let wrapped = wrap_at_columns(&body, 76);
        assert!(!wrapped.ends_with('\n'));
        assert_eq!(wrapped.lines().count(), 2);
    }

    #[test]
    fn sha512_digest_encodes_to_two_lines() {
        let digest = [0u8; 64];
        let block = base64_block(&digest);
        assert_eq!(block.lines().count(), 2);
        assert_eq!(block.replace('\n', "").len(), 88);
    }
}
