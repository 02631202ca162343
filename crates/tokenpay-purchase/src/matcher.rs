// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Name and account comparison.
//!
//! Providers return receiver names with inconsistent case and spacing, and
//! account numbers partly masked (`2519****4243`). These helpers compare
//! tolerantly on formatting and strictly on content.

const MASK_CHARS: [char; 4] = ['*', 'x', 'X', '•'];

/// Trims, lower-cases and collapses runs of whitespace to one space.
pub fn normalize_name(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Exact equality after [`normalize_name`]. No fuzzy matching.
pub fn names_match(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

/// Keeps only ASCII digits.
pub fn only_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Compares a possibly masked account against a full one.
///
/// With mask characters present, the leading digit run must prefix the
/// digits of `full` and the trailing digit run must suffix them; either run
/// may be absent. Without a mask, the digit sequences must be equal.
pub fn account_matches(masked_or_full: &str, full: &str) -> bool {
    let masked = masked_or_full.trim();
    let full = only_digits(full);

    if !masked.contains(MASK_CHARS) {
        return only_digits(masked) == full;
    }

    let prefix: String = masked.chars().take_while(char::is_ascii_digit).collect();
    let mut suffix: Vec<char> = masked
        .chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .collect();
    suffix.reverse();
    let suffix: String = suffix.into_iter().collect();

    (prefix.is_empty() || full.starts_with(&prefix)) && (suffix.is_empty() || full.ends_with(&suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn masked_account_examples() {
        assert!(account_matches("2519****4243", "251912344243"));
        assert!(!account_matches("2519****4243", "251912344244"));
        assert!(!account_matches("2519****4243", "261912344243"));
        assert!(account_matches("251912345678", "251912345678"));
    }

    #[test]
    fn masked_digits_are_not_compared() {
        // Only the visible runs count, so any middle digits match.
        assert!(account_matches("2519****4243", "251999994243"));
    }

    #[test]
    fn other_mask_characters() {
        assert!(account_matches("1000xxxxx6789", "1000123456789"));
        assert!(account_matches("1000XXXXX6789", "1000123456789"));
        assert!(account_matches("1000•••••6789", "1000123456789"));
        assert!(!account_matches("1000•••••6780", "1000123456789"));
    }

    #[test]
    fn one_sided_masks() {
        assert!(account_matches("****4243", "251912344243"));
        assert!(!account_matches("****4244", "251912344243"));
        assert!(account_matches("2519****", "251912344243"));
        assert!(!account_matches("2518****", "251912344243"));
    }

    #[test]
    fn unmasked_comparison_ignores_formatting() {
        assert!(account_matches("+251 912 344 243", "251912344243"));
        assert!(!account_matches("251912344242", "251912344243"));
    }

    #[test]
    fn name_examples() {
        assert!(names_match(" John   Doe ", "john doe"));
        assert!(!names_match("John Doe", "Jon Doe"));
        assert!(names_match("ABEBE\tKEBEDE", "Abebe Kebede"));
    }

    #[test]
    fn only_digits_strips_everything_else() {
        assert_eq!(only_digits("2519-12 34a4243"), "251912344243");
        assert_eq!(only_digits("****"), "");
    }

    proptest! {
        #[test]
        fn unmasked_account_matches_itself(digits in "[0-9]{8,16}") {
            prop_assert!(account_matches(&digits, &digits));
        }

        #[test]
        fn masking_the_middle_still_matches(digits in "[0-9]{12}", keep in 1usize..6) {
            let masked = format!("{}****{}", &digits[..keep], &digits[digits.len() - keep..]);
            prop_assert!(account_matches(&masked, &digits));
        }

        #[test]
        fn changing_the_last_digit_breaks_the_match(digits in "[0-9]{12}") {
            let last = digits.as_bytes()[11] - b'0';
            let other = format!("{}{}", &digits[..11], (last + 1) % 10);
            let masked = format!("{}****{}", &digits[..4], &digits[8..]);
            prop_assert!(!account_matches(&masked, &other));
        }

        #[test]
        fn names_match_is_case_and_space_insensitive(words in proptest::collection::vec("[a-zA-Z]{1,8}", 1..4)) {
            let spaced = format!("  {}  ", words.join("   "));
            let upper = words.join(" ").to_uppercase();
            prop_assert!(names_match(&spaced, &upper));
        }
    }
}
