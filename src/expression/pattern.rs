//! Pattern translation for LIKE and RLIKE.

use crate::expression::{ExpressionError, ExpressionResult};
use regex::{Regex, RegexBuilder};

#[derive(Debug, Clone, Copy, PartialEq)]
enum LikeToken {
    /// `%`
    AnySequence,
    /// `_`
    AnyChar,
    Literal(char),
}

fn tokenize_like(pattern: &str) -> Vec<LikeToken> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        let token = match c {
            '%' => LikeToken::AnySequence,
            '_' => LikeToken::AnyChar,
            '\\' => LikeToken::Literal(chars.next().unwrap_or('\\')),
            other => LikeToken::Literal(other),
        };
        tokens.push(token);
    }
    tokens
}

/// Translate a LIKE pattern into regex syntax.
///
/// `%` becomes a lazy `.*?`, `_` becomes `.`, a backslash escapes the next
/// character, and everything else matches literally. The result is anchored
/// at both ends unless the pattern starts or ends with `%`.
pub fn like_to_regex(pattern: &str) -> String {
    let mut tokens = tokenize_like(pattern).into_iter().peekable();
    let mut regex = String::with_capacity(pattern.len() + 8);

    if tokens.peek() == Some(&LikeToken::AnySequence) {
        tokens.next();
    } else {
        regex.push('^');
    }

    let mut tokens: Vec<LikeToken> = tokens.collect();
    let anchor_end = tokens.last() != Some(&LikeToken::AnySequence);
    if !anchor_end {
        tokens.pop();
    }

    for token in tokens {
        match token {
            LikeToken::AnySequence => regex.push_str(".*?"),
            LikeToken::AnyChar => regex.push('.'),
            LikeToken::Literal(c) => regex.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }

    if anchor_end {
        regex.push('$');
    }
    regex
}

/// Compile a LIKE pattern: case-sensitive, `.` also matches newlines.
pub fn compile_like(pattern: &str, size_limit: usize) -> ExpressionResult<Regex> {
    let translated = like_to_regex(pattern);
    log::trace!("LIKE '{}' translated to /{}/s", pattern, translated);
    RegexBuilder::new(&translated)
        .dot_matches_new_line(true)
        .size_limit(size_limit)
        .build()
        .map_err(|e| ExpressionError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}

/// Compile an RLIKE/REGEXP pattern as written.
pub fn compile_rlike(
    pattern: &str,
    case_insensitive: bool,
    size_limit: usize,
) -> ExpressionResult<Regex> {
    log::trace!(
        "compiling RLIKE /{}/ (case_insensitive={})",
        pattern,
        case_insensitive
    );
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .size_limit(size_limit)
        .build()
        .map_err(|e| ExpressionError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}
