//! Node range expressions
//!
//! A range expression names a set of nodes compactly:
//!
//! - `node1` is a single literal node name
//! - `node[1-3]` expands to `node1`, `node2`, `node3`
//! - `node[1-2],login,login` mixes both forms; duplicates collapse
//!
//! Expansion is fail-fast: the first malformed term aborts the whole
//! expression. The resulting [`IdentifierSet`] is deduplicated and sorted
//! lexicographically, so callers must not rely on input order surviving.

mod error;

pub use error::RangeError;

use std::collections::BTreeSet;
use std::fmt;

/// A single comma-separated term of a range expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeTerm {
    /// Plain node name, already stripped of stray brackets
    Literal(String),
    /// `prefix[low-high]`, inclusive on both ends
    Interval { prefix: String, low: u64, high: u64 },
}

impl RangeTerm {
    /// Parse one term.
    ///
    /// A term is treated as an interval only when it contains `[`, `-` and `]`.
    /// Anything else is a literal with stray brackets removed.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidTerm` when the interval syntax is malformed
    /// and `RangeError::InvertedBounds` when `low > high`.
    pub fn parse(term: &str) -> Result<Self, RangeError> {
        if !(term.contains('[') && term.contains('-') && term.contains(']')) {
            let literal: String = term.chars().filter(|c| *c != '[' && *c != ']').collect();
            return Ok(Self::Literal(literal));
        }

        let (prefix, rest) = term.split_once('[').ok_or_else(|| RangeError::invalid(term))?;
        let body = rest
            .strip_suffix(']')
            .ok_or_else(|| RangeError::invalid(term))?;
        if prefix.contains(']') || body.contains('[') || body.contains(']') {
            return Err(RangeError::invalid(term));
        }

        let (low, high) = body.split_once('-').ok_or_else(|| RangeError::invalid(term))?;
        let low: u64 = low.trim().parse().map_err(|_| RangeError::invalid(term))?;
        let high: u64 = high.trim().parse().map_err(|_| RangeError::invalid(term))?;
        if low > high {
            return Err(RangeError::InvertedBounds {
                term: term.to_string(),
                low,
                high,
            });
        }

        Ok(Self::Interval {
            prefix: prefix.to_string(),
            low,
            high,
        })
    }

    fn expand_into(&self, out: &mut BTreeSet<String>) {
        match self {
            Self::Literal(name) => {
                out.insert(name.clone());
            }
            Self::Interval { prefix, low, high } => {
                out.extend((*low..=*high).map(|i| format!("{prefix}{i}")));
            }
        }
    }
}

/// Deduplicated, sorted node names produced by [`expand`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierSet(Vec<String>);

impl IdentifierSet {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.binary_search_by(|probe| probe.as_str().cmp(name)).is_ok()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<BTreeSet<String>> for IdentifierSet {
    fn from(set: BTreeSet<String>) -> Self {
        Self(set.into_iter().collect())
    }
}

impl FromIterator<String> for IdentifierSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        iter.into_iter().collect::<BTreeSet<_>>().into()
    }
}

impl IntoIterator for IdentifierSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a IdentifierSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for IdentifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

/// Split an expression into parsed terms, skipping empty ones.
///
/// # Errors
/// Returns the first term's `RangeError`.
pub fn parse_terms(expression: &str) -> Result<Vec<RangeTerm>, RangeError> {
    expression
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(RangeTerm::parse)
        .collect()
}

/// Expand a range expression into a sorted, deduplicated set of node names.
///
/// # Errors
/// Returns `RangeError` for the first malformed term, or `RangeError::Empty`
/// when the expression names no node.
pub fn expand(expression: &str) -> Result<IdentifierSet, RangeError> {
    let terms = parse_terms(expression)?;

    let mut names = BTreeSet::new();
    for term in &terms {
        term.expand_into(&mut names);
    }

    if names.is_empty() {
        return Err(RangeError::Empty {
            expression: expression.to_string(),
        });
    }
    Ok(names.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(expr: &str) -> Vec<String> {
        expand(expr).unwrap().into_vec()
    }

    #[test]
    fn test_single_literal() {
        assert_eq!(names("node1"), vec!["node1"]);
    }

    #[test]
    fn test_simple_interval() {
        assert_eq!(names("node[1-3]"), vec!["node1", "node2", "node3"]);
    }

    #[test]
    fn test_inverted_interval_is_rejected() {
        let err = expand("node[3-1]").unwrap_err();
        assert_eq!(
            err,
            RangeError::InvertedBounds {
                term: "node[3-1]".into(),
                low: 3,
                high: 1
            }
        );
        assert_eq!(err.term(), Some("node[3-1]"));
    }

    #[test]
    fn test_duplicates_removed() {
        assert_eq!(names("a,a,b"), vec!["a", "b"]);
    }

    #[test]
    fn test_mixed_terms_sorted_lexicographically() {
        assert_eq!(names("node[1-2],nodeX"), vec!["node1", "node2", "nodeX"]);
    }

    #[test]
    fn test_sort_is_lexicographic_not_numeric() {
        assert_eq!(names("n[9-11]"), vec!["n10", "n11", "n9"]);
    }

    #[test]
    fn test_literal_strips_stray_brackets() {
        assert_eq!(names("node[7]"), vec!["node7"]);
        assert_eq!(names("ra]ck[1"), vec!["rack1"]);
    }

    #[test]
    fn test_literal_with_dash_is_kept() {
        assert_eq!(names("head-node"), vec!["head-node"]);
    }

    #[test]
    fn test_non_numeric_bound() {
        let err = expand("node[a-3]").unwrap_err();
        assert_eq!(err, RangeError::invalid("node[a-3]"));
        assert!(err.to_string().contains("node[a-3]"));
    }

    #[test]
    fn test_missing_bound() {
        assert!(expand("node[1-]").is_err());
        assert!(expand("node[-4]").is_err());
    }

    #[test]
    fn test_trailing_text_after_bracket() {
        assert_eq!(
            expand("node[1-3]x").unwrap_err(),
            RangeError::invalid("node[1-3]x")
        );
    }

    #[test]
    fn test_reversed_brackets() {
        assert!(expand("node]1-3[").is_err());
    }

    #[test]
    fn test_fail_fast_on_first_bad_term() {
        let err = expand("ok[1-2],bad[x-y],worse[5-1]").unwrap_err();
        assert_eq!(err.term(), Some("bad[x-y]"));
    }

    #[test]
    fn test_empty_terms_skipped() {
        assert_eq!(names("a,,b,"), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_expression() {
        assert!(matches!(expand(""), Err(RangeError::Empty { .. })));
        assert!(matches!(expand(" , "), Err(RangeError::Empty { .. })));
    }

    #[test]
    fn test_single_element_interval() {
        assert_eq!(names("c[5-5]"), vec!["c5"]);
    }

    #[test]
    fn test_overlapping_intervals_dedup() {
        let set = expand("n[1-5],n[3-7]").unwrap();
        assert_eq!(set.len(), 7);
        assert!(set.contains("n6"));
        assert!(!set.contains("n8"));
    }

    #[test]
    fn test_display_joins_with_commas() {
        assert_eq!(expand("b,a").unwrap().to_string(), "a,b");
    }
}
