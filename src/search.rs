//! Linear search and filtering over history entries
//!
//! A query either matches text (with a configurable position-in-string mode)
//! or addresses one entry by its 1-based index. A fragment selector can
//! restrict matching to a subset of each sequence's text fragments. The
//! engine is order-agnostic: it scans whatever slice it is given and reports
//! matches in that order.

use crate::error::ValidationError;
use crate::sequence::{SpeechSequence, FRAGMENT_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the query addresses entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchMode {
    /// Match against each entry's text
    #[default]
    Text,
    /// Address one entry by 1-based position
    Index,
}

/// Where in the candidate string the query must sit (text mode only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PositionMode {
    /// Substring match
    #[default]
    Anywhere,
    /// Exact equality
    Full,
    /// Candidate starts with the query
    Beginning,
    /// Contained, but neither a prefix nor a suffix
    Middle,
    /// Candidate ends with the query
    End,
    /// Inverted: entries that do NOT contain the query
    Nowhere,
}

impl fmt::Display for PositionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PositionMode::Anywhere => "anywhere",
            PositionMode::Full => "full",
            PositionMode::Beginning => "beginning",
            PositionMode::Middle => "middle",
            PositionMode::End => "end",
            PositionMode::Nowhere => "nowhere",
        };
        write!(f, "{name}")
    }
}

/// Which text fragments of each sequence take part in matching
///
/// Parsed from the user-facing selector string: `"0"` (or blank) selects all
/// fragments, `"2"` or `"1,3"` an include-list, and a leading `-` turns the
/// list into an exclude-list (`"-1"` = all but the first). Indices are
/// 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FragmentSelector {
    #[default]
    All,
    Include(Vec<usize>),
    Exclude(Vec<usize>),
}

impl FragmentSelector {
    pub fn parse(selector: &str) -> Result<Self, ValidationError> {
        let selector = selector.trim();
        if selector.is_empty() || selector == "0" {
            return Ok(FragmentSelector::All);
        }
        let (exclude, body) = match selector.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, selector),
        };
        let mut indices = Vec::new();
        for part in body.split([',', ' ']).filter(|p| !p.is_empty()) {
            let index: usize = part
                .parse()
                .map_err(|_| ValidationError::InvalidSelector(selector.to_string()))?;
            if index == 0 {
                return Err(ValidationError::InvalidSelector(selector.to_string()));
            }
            indices.push(index);
        }
        if indices.is_empty() {
            return Err(ValidationError::InvalidSelector(selector.to_string()));
        }
        if exclude {
            Ok(FragmentSelector::Exclude(indices))
        } else {
            Ok(FragmentSelector::Include(indices))
        }
    }

    /// Concatenate the selected fragments of a sequence
    pub fn select(&self, sequence: &SpeechSequence) -> String {
        let fragments: Vec<&str> = match self {
            FragmentSelector::All => sequence.fragments().collect(),
            FragmentSelector::Include(list) => sequence
                .fragments()
                .enumerate()
                .filter(|(i, _)| list.contains(&(i + 1)))
                .map(|(_, f)| f)
                .collect(),
            FragmentSelector::Exclude(list) => sequence
                .fragments()
                .enumerate()
                .filter(|(i, _)| !list.contains(&(i + 1)))
                .map(|(_, f)| f)
                .collect(),
        };
        fragments.join(FRAGMENT_SEPARATOR)
    }
}

/// One search request
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub query: String,
    pub mode: SearchMode,
    pub case_sensitive: bool,
    pub position: PositionMode,
    pub fragments: FragmentSelector,
}

/// One matching entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// Position in the scanned slice
    pub index: usize,
    /// The candidate text that matched (fragment-selected, unnormalized)
    pub text: String,
}

/// Scan `sequences` and return matches in scan order.
///
/// An empty query is not an error: it yields an empty result set, which the
/// caller may present differently from "no matches found".
pub fn search(
    sequences: &[&SpeechSequence],
    query: &SearchQuery,
) -> Result<Vec<SearchMatch>, ValidationError> {
    if query.query.is_empty() {
        return Ok(Vec::new());
    }
    match query.mode {
        SearchMode::Index => search_by_index(sequences, query),
        SearchMode::Text => Ok(search_by_text(sequences, query)),
    }
}

fn search_by_index(
    sequences: &[&SpeechSequence],
    query: &SearchQuery,
) -> Result<Vec<SearchMatch>, ValidationError> {
    let raw = query.query.trim();
    let index: usize = raw
        .parse()
        .map_err(|_| ValidationError::NotANumber(raw.to_string()))?;
    if index < 1 || index > sequences.len() {
        return Err(ValidationError::IndexOutOfRange {
            index,
            len: sequences.len(),
        });
    }
    let text = query.fragments.select(sequences[index - 1]);
    Ok(vec![SearchMatch {
        index: index - 1,
        text,
    }])
}

fn search_by_text(sequences: &[&SpeechSequence], query: &SearchQuery) -> Vec<SearchMatch> {
    let needle = fold(&normalize(&query.query), query.case_sensitive);
    let mut matches = Vec::new();
    for (index, sequence) in sequences.iter().enumerate() {
        let candidate = query.fragments.select(sequence);
        let haystack = fold(&normalize(&candidate), query.case_sensitive);
        if position_matches(&haystack, &needle, query.position) {
            matches.push(SearchMatch {
                index,
                text: candidate,
            });
        }
    }
    matches
}

/// Line-ending normalization applied to both query and candidate
fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n")
}

fn fold(text: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        text.to_string()
    } else {
        text.to_lowercase()
    }
}

fn position_matches(haystack: &str, needle: &str, position: PositionMode) -> bool {
    match position {
        PositionMode::Anywhere => haystack.contains(needle),
        PositionMode::Full => haystack == needle,
        PositionMode::Beginning => haystack.starts_with(needle),
        PositionMode::Middle => {
            haystack.contains(needle)
                && !haystack.starts_with(needle)
                && !haystack.ends_with(needle)
        }
        PositionMode::End => haystack.ends_with(needle),
        PositionMode::Nowhere => !haystack.contains(needle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::SpeechElement;

    fn fixtures(texts: &[&str]) -> Vec<SpeechSequence> {
        texts.iter().map(|t| SpeechSequence::from_text(*t)).collect()
    }

    fn refs(sequences: &[SpeechSequence]) -> Vec<&SpeechSequence> {
        sequences.iter().collect()
    }

    fn text_query(query: &str) -> SearchQuery {
        SearchQuery {
            query: query.to_string(),
            ..SearchQuery::default()
        }
    }

    #[test]
    fn test_case_insensitive_substring_match() {
        let seqs = fixtures(&["hello world", "goodbye", "HELLO"]);
        let matches = search(&refs(&seqs), &text_query("hello")).unwrap();
        let indices: Vec<usize> = matches.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_case_sensitive_substring_match() {
        let seqs = fixtures(&["hello world", "goodbye", "HELLO"]);
        let query = SearchQuery {
            case_sensitive: true,
            ..text_query("hello")
        };
        let matches = search(&refs(&seqs), &query).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "hello world");
    }

    #[test]
    fn test_position_modes() {
        let seqs = fixtures(&["ab", "abc", "cab", "cabc", "xyz"]);
        let cases = [
            (PositionMode::Anywhere, vec![0, 1, 2, 3]),
            (PositionMode::Full, vec![0]),
            (PositionMode::Beginning, vec![0, 1]),
            (PositionMode::Middle, vec![3]),
            (PositionMode::End, vec![0, 2]),
            (PositionMode::Nowhere, vec![4]),
        ];
        for (position, expected) in cases {
            let query = SearchQuery {
                position,
                ..text_query("ab")
            };
            let matches = search(&refs(&seqs), &query).unwrap();
            let indices: Vec<usize> = matches.iter().map(|m| m.index).collect();
            assert_eq!(indices, expected, "position mode {position}");
        }
    }

    #[test]
    fn test_crlf_candidates_match_lf_queries() {
        let seqs = fixtures(&["line one\r\nline two"]);
        let matches = search(&refs(&seqs), &text_query("one\nline")).unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_empty_query_yields_empty_result() {
        let seqs = fixtures(&["anything"]);
        assert_eq!(search(&refs(&seqs), &text_query("")).unwrap(), Vec::new());
        let query = SearchQuery {
            mode: SearchMode::Index,
            ..text_query("")
        };
        assert_eq!(search(&refs(&seqs), &query).unwrap(), Vec::new());
    }

    #[test]
    fn test_empty_buffer_is_tolerated() {
        let matches = search(&[], &text_query("anything")).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_search_by_index_is_one_based() {
        let seqs = fixtures(&["newest", "middle", "oldest"]);
        let query = SearchQuery {
            mode: SearchMode::Index,
            ..text_query("2")
        };
        let matches = search(&refs(&seqs), &query).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].index, 1);
        assert_eq!(matches[0].text, "middle");
    }

    #[test]
    fn test_search_by_index_out_of_range() {
        let seqs = fixtures(&["a", "b", "c"]);
        let query = SearchQuery {
            mode: SearchMode::Index,
            ..text_query("5")
        };
        assert_eq!(
            search(&refs(&seqs), &query),
            Err(ValidationError::IndexOutOfRange { index: 5, len: 3 })
        );
    }

    #[test]
    fn test_search_by_index_rejects_non_numeric() {
        let seqs = fixtures(&["a"]);
        let query = SearchQuery {
            mode: SearchMode::Index,
            ..text_query("two")
        };
        assert_eq!(
            search(&refs(&seqs), &query),
            Err(ValidationError::NotANumber("two".to_string()))
        );
    }

    #[test]
    fn test_fragment_selector_parsing() {
        assert_eq!(FragmentSelector::parse("0").unwrap(), FragmentSelector::All);
        assert_eq!(FragmentSelector::parse("").unwrap(), FragmentSelector::All);
        assert_eq!(
            FragmentSelector::parse("2").unwrap(),
            FragmentSelector::Include(vec![2])
        );
        assert_eq!(
            FragmentSelector::parse("1,3").unwrap(),
            FragmentSelector::Include(vec![1, 3])
        );
        assert_eq!(
            FragmentSelector::parse("-1").unwrap(),
            FragmentSelector::Exclude(vec![1])
        );
        assert!(FragmentSelector::parse("x").is_err());
        assert!(FragmentSelector::parse("1,0").is_err());
        assert!(FragmentSelector::parse("-").is_err());
    }

    #[test]
    fn test_fragment_selector_restricts_matching() {
        let seq = SpeechSequence::new(vec![
            SpeechElement::Text("checkbox".to_string()),
            SpeechElement::Text("checked".to_string()),
        ]);
        let seqs = vec![seq];
        let query = SearchQuery {
            fragments: FragmentSelector::Include(vec![2]),
            position: PositionMode::Full,
            ..text_query("checked")
        };
        let matches = search(&refs(&seqs), &query).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "checked");

        let query = SearchQuery {
            fragments: FragmentSelector::Exclude(vec![1]),
            position: PositionMode::Full,
            ..text_query("checked")
        };
        assert_eq!(search(&refs(&seqs), &query).unwrap().len(), 1);
    }
}
