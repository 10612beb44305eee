//! src/search/predicate.rs
//! ============================================================================
//! # Search predicate compilation
//!
//! Turns a [`FilterQuery`] into a reusable match function. Compilation is
//! deterministic: the same query always yields a predicate with the same
//! behavior, so nothing here needs caching for correctness.
//!
//! An empty query compiles to `None`, which every consumer treats as
//! "pass everything". A regex that fails to build is reported as a
//! [`RegexError`] value, never as a panic.

use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::trace;

use crate::search::query::FilterQuery;

/// Pattern rejected by the regex compiler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid regular expression /{pattern}/: {message}")]
pub struct RegexError {
    pub pattern: String,
    pub message: String,
}

impl RegexError {
    fn from_regex(pattern: &str, err: &regex::Error) -> Self {
        Self {
            pattern: pattern.to_string(),
            message: err.to_string(),
        }
    }
}

/// Compiled match function over candidate strings.
#[derive(Debug, Clone)]
pub enum SearchPredicate {
    /// Containment test; `needle` is already lowercased when `match_case`
    /// is off.
    Substring { needle: String, match_case: bool },

    Pattern(Regex),
}

impl SearchPredicate {
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Substring {
                needle,
                match_case: true,
            } => candidate.contains(needle.as_str()),

            Self::Substring {
                needle,
                match_case: false,
            } => {
                if candidate.is_ascii() && needle.is_ascii() {
                    contains_ignore_ascii_case(candidate, needle)
                } else {
                    candidate.to_lowercase().contains(needle.as_str())
                }
            }

            Self::Pattern(regex) => regex.is_match(candidate),
        }
    }
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    haystack
        .as_bytes()
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Compiles `query` into a predicate.
///
/// `Ok(None)` means no filtering. `Err` only occurs in regex mode.
pub fn compile(query: &FilterQuery) -> Result<Option<SearchPredicate>, RegexError> {
    if query.is_empty() {
        return Ok(None);
    }

    if query.use_regex {
        let regex = RegexBuilder::new(&query.text)
            .case_insensitive(!query.match_case)
            .build()
            .map_err(|err| RegexError::from_regex(&query.text, &err))?;

        trace!(pattern = %query.text, match_case = query.match_case, "compiled regex predicate");
        return Ok(Some(SearchPredicate::Pattern(regex)));
    }

    let needle = if query.match_case {
        query.text.to_string()
    } else {
        query.text.as_str().to_lowercase()
    };

    Ok(Some(SearchPredicate::Substring {
        needle,
        match_case: query.match_case,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn substring(text: &str, match_case: bool) -> SearchPredicate {
        compile(&FilterQuery::new(text).with_match_case(match_case))
            .expect("substring never fails")
            .expect("non-empty query")
    }

    #[test]
    fn test_empty_text_compiles_to_none_for_all_modes() {
        for match_case in [false, true] {
            for use_regex in [false, true] {
                let query = FilterQuery::new("")
                    .with_match_case(match_case)
                    .with_regex(use_regex);
                assert!(matches!(compile(&query), Ok(None)));
            }
        }
    }

    #[test]
    fn test_match_case_substring() {
        let pred = substring("AB", true);
        assert!(pred.matches("xABy"));
        assert!(!pred.matches("xaby"));
    }

    #[test]
    fn test_ignore_case_substring() {
        let pred = substring("ab", false);
        assert!(pred.matches("AB"));
        assert!(pred.matches("ab"));
        assert!(pred.matches("CAbin"));
        assert!(!pred.matches("a b"));

        let upper = substring("Ab", false);
        assert!(upper.matches("xaBy"));
    }

    #[test]
    fn test_ignore_case_non_ascii() {
        let pred = substring("ÄRGER", false);
        assert!(pred.matches("viel ärger"));
        assert!(!pred.matches("arger"));
    }

    #[test]
    fn test_invalid_regex_is_an_error_value() {
        let err = compile(&FilterQuery::new("[").with_regex(true)).unwrap_err();
        assert_eq!(err.pattern, "[");
        assert!(!err.message.is_empty());
        assert!(err.to_string().starts_with("invalid regular expression /[/"));
    }

    #[test]
    fn test_regex_case_sensitivity_follows_toggle() {
        let insensitive = compile(&FilterQuery::new("^cworld$").with_regex(true))
            .unwrap()
            .unwrap();
        assert!(insensitive.matches("CWorld"));

        let sensitive = compile(
            &FilterQuery::new("^cworld$")
                .with_regex(true)
                .with_match_case(true),
        )
        .unwrap()
        .unwrap();
        assert!(!sensitive.matches("CWorld"));
        assert!(sensitive.matches("cworld"));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let query = FilterQuery::new("Pawn").with_match_case(false);
        let a = compile(&query).unwrap().unwrap();
        let b = compile(&query).unwrap().unwrap();
        for candidate in ["CCitadelPlayerPawn", "pawn", "Controller", ""] {
            assert_eq!(a.matches(candidate), b.matches(candidate));
        }
    }

    #[test]
    fn test_substring_needle_is_folded_once() {
        let pred = substring("PaWn", false);
        assert!(matches!(
            &pred,
            SearchPredicate::Substring { needle, match_case: false } if needle == "pawn"
        ));
        assert!(pred.matches("CCitadelPlayerPawn"));
    }

    #[test]
    fn test_regex_validity_can_depend_on_case_folding() {
        // folding every `k` into a class blows the compiled size limit
        let sensitive = FilterQuery::new("k{64000}").with_regex(true).with_match_case(true);
        assert!(compile(&sensitive).is_ok());

        let insensitive = FilterQuery::new("k{64000}").with_regex(true);
        assert!(compile(&insensitive).is_err());
    }
}
