//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

use depwhy::Error;
use depwhy::config::parse_delimiter;

/// Validate the edge-list separator.
///
/// Accepts exactly one character, or the names `tab` / `\t` for a tab, with
/// the same rules as the config file and `DEPWHY_DELIMITER`.
pub fn parse_separator(s: &str) -> Result<char, String> {
    parse_delimiter(s).map_err(|e| match e {
        Error::Config(message) => message,
        other => other.to_string(),
    })
}

/// Validate the number of paths to find.
pub fn parse_count(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("Count must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("Invalid count '{s}': expected a positive integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::comma(",", ',')]
    #[case::space(" ", ' ')]
    #[case::semicolon(";", ';')]
    #[case::tab_name("tab", '\t')]
    #[case::tab_escape("\\t", '\t')]
    #[case::literal_tab("\t", '\t')]
    fn separator_valid(#[case] input: &str, #[case] expected: char) {
        assert_eq!(parse_separator(input), Ok(expected));
    }

    #[rstest]
    #[case::empty("", "empty")]
    #[case::dot(".", "segments")]
    #[case::two_chars(",,", "single character")]
    fn separator_invalid(#[case] input: &str, #[case] expected_error: &str) {
        let err = parse_separator(input).expect_err("should be rejected");
        assert!(
            err.contains(expected_error),
            "Expected error to contain '{expected_error}', got: '{err}'"
        );
    }

    #[rstest]
    #[case::one("1", 1)]
    #[case::padded(" 12 ", 12)]
    fn count_valid(#[case] input: &str, #[case] expected: usize) {
        assert_eq!(parse_count(input), Ok(expected));
    }

    #[rstest]
    #[case::zero("0")]
    #[case::negative("-3")]
    #[case::word("three")]
    fn count_invalid(#[case] input: &str) {
        assert!(parse_count(input).is_err());
    }
}
