//! Ordered pattern matching shared by every field extractor.
//!
//! Pattern lists are written most-specific-first (`DOB: <date>` before a bare
//! `<date>`), and the first pattern that matches anywhere in the haystack wins
//! even if a later pattern would match earlier in the text.

use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Compile patterns case-insensitively.
///
/// Meant for the static pattern tables; an invalid pattern there is a
/// programming error and panics on first use.
pub fn compile_patterns(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .unwrap_or_else(|e| panic!("invalid built-in pattern {:?}: {}", p, e))
        })
        .collect()
}

/// Return the first capture group of the first pattern that matches.
///
/// Patterns without a capture group yield the whole match. Empty (after
/// trimming) captures do not count as a match.
pub fn first_match(haystack: &str, patterns: &[Regex]) -> Option<String> {
    patterns.iter().find_map(|pattern| capture(haystack, pattern))
}

/// Same contract as [`first_match`] for patterns only known at run time.
///
/// Patterns that fail to compile are skipped.
pub fn extract(haystack: &str, patterns: &[&str]) -> Option<String> {
    for pattern in patterns {
        let regex = match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => regex,
            Err(e) => {
                warn!("Skipping invalid pattern {:?}: {}", pattern, e);
                continue;
            }
        };
        if let Some(value) = capture(haystack, &regex) {
            return Some(value);
        }
    }
    None
}

fn capture(haystack: &str, pattern: &Regex) -> Option<String> {
    let caps = pattern.captures(haystack)?;
    let matched = caps.get(1).or_else(|| caps.get(0))?;
    let value = matched.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Minimum length of a value taken from the rest of a keyword line.
pub const MIN_KEYWORD_VALUE_LEN: usize = 3;

/// Find a keyword token on a line and return the rest of that line.
///
/// Lines are scanned in order and, for each line, keywords in order. A keyword
/// may span several words (`GIVEN NAME`) and matches whole tokens without
/// regard to case or surrounding `:`, `#`, `.` punctuation. Values shorter than
/// [`MIN_KEYWORD_VALUE_LEN`] characters are treated as noise and the scan
/// continues.
pub fn extract_after_keyword<S: AsRef<str>>(lines: &[S], keywords: &[&str]) -> Option<String> {
    for line in lines {
        let tokens: Vec<&str> = line.as_ref().split_whitespace().collect();
        let normalized: Vec<String> = tokens.iter().map(|t| normalize_token(t)).collect();

        for keyword in keywords {
            let words: Vec<String> = keyword
                .split_whitespace()
                .map(|w| w.to_uppercase())
                .collect();
            if words.is_empty() || words.len() > normalized.len() {
                continue;
            }

            let Some(start) = normalized
                .windows(words.len())
                .position(|window| window == words.as_slice())
            else {
                continue;
            };

            let value = tokens[start + words.len()..]
                .iter()
                .copied()
                .filter(|t| !t.chars().all(is_label_punctuation))
                .collect::<Vec<_>>()
                .join(" ");
            let value = value.trim();

            if value.chars().count() >= MIN_KEYWORD_VALUE_LEN {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Return the first line (trimmed) whose uppercase form contains any keyword.
pub fn line_containing<S: AsRef<str>>(lines: &[S], keywords: &[&str]) -> Option<String> {
    lines
        .iter()
        .map(|line| line.as_ref())
        .find(|line| {
            let upper = line.to_uppercase();
            keywords.iter().any(|k| upper.contains(k))
        })
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
}

fn is_label_punctuation(c: char) -> bool {
    matches!(c, ':' | '#' | '.')
}

fn normalize_token(token: &str) -> String {
    token.trim_matches(is_label_punctuation).to_uppercase()
}
