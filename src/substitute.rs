//! Single-pass placeholder substitution.
//!
//! Tokens are matched with a leftmost-longest Aho-Corasick automaton
//! rather than by sequential substring replacement. Matches are
//! non-overlapping and the longest token always wins, so a token whose
//! literal shares a prefix with another can never be partially or doubly
//! substituted.

use aho_corasick::{AhoCorasick, MatchKind};
use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::jeton::PlaceholderMap;

/// A compiled set of token → value substitutions.
///
/// Compile once per generation call, apply to every paragraph.
pub struct Substitutions {
    automaton: AhoCorasick,
    values: Vec<String>,
}

impl Substitutions {
    /// Compile a placeholder map into a single-pass matcher.
    pub fn compile(map: &PlaceholderMap) -> Result<Self> {
        let patterns: Vec<&str> = map.entries().map(|(jeton, _)| jeton.literal()).collect();
        let values: Vec<String> = map.entries().map(|(_, valeur)| valeur.to_string()).collect();

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&patterns)
            .map_err(|e| Error::Tokens(e.to_string()))?;

        Ok(Self { automaton, values })
    }

    /// Replace every known token in `text`.
    ///
    /// Returns `Cow::Borrowed` when nothing matched, so callers can tell
    /// untouched text apart without comparing strings.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if self.values.is_empty() || self.automaton.find(text).is_none() {
            return Cow::Borrowed(text);
        }
        Cow::Owned(self.automaton.replace_all(text, &self.values))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
