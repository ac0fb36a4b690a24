//! Search query strings for the manga site

use serde::{Deserialize, Serialize};
use std::fmt;

/// Terms excluded from every search.
pub const ALWAYS_EXCLUDED: &[&str] = &["AI绘图"];

/// Included and excluded search terms.
///
/// # Examples
///
/// ```
/// use mangagrid::search::SearchQuery;
///
/// let q = SearchQuery::parse("full color+english-ntr");
/// assert_eq!(q.include, vec!["full color", "english"]);
/// assert_eq!(q.to_string(), "+full color +english -ntr -AI绘图");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(mut self, term: impl Into<String>) -> Self {
        self.include.push(term.into());
        self
    }

    pub fn exclude(mut self, term: impl Into<String>) -> Self {
        self.exclude.push(term.into());
        self
    }

    /// Parse chat input: text before the first `+` or `-` is included, and
    /// every later term is included or excluded by the sign before it.
    pub fn parse(input: &str) -> Self {
        let mut query = Self::new();
        let mut include = true;
        let mut term = String::new();
        for c in input.chars() {
            if c == '+' || c == '-' {
                query.push(include, &term);
                term.clear();
                include = c == '+';
            } else {
                term.push(c);
            }
        }
        query.push(include, &term);
        query
    }

    fn push(&mut self, include: bool, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            return;
        }
        if include {
            self.include.push(term.to_string());
        } else {
            self.exclude.push(term.to_string());
        }
    }

    /// Render as `"+a +b -c -x"` where `always_excluded` terms come last and
    /// appear once even when also listed in `exclude`. Blank terms are skipped.
    pub fn to_query_string(&self, always_excluded: &[&str]) -> String {
        let include = self
            .include
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| format!("+{}", t));
        let exclude = self
            .exclude
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty() && !always_excluded.contains(t))
            .map(|t| format!("-{}", t));
        let fixed = always_excluded.iter().map(|t| format!("-{}", t));
        include.chain(exclude).chain(fixed).collect::<Vec<_>>().join(" ")
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string(ALWAYS_EXCLUDED))
    }
}

/// Page to show for a request: past the end means the last page, and page
/// numbers start at 1.
pub fn clamp_page(requested: u32, max_page: u32) -> u32 {
    requested.min(max_page).max(1)
}
