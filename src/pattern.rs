//! Substring-wildcard path patterns used by include/exclude filters.
//!
//! A pattern matches when it occurs anywhere in the path: `foo` behaves like
//! `*foo*`. Inside a pattern `*`, `?` and `[...]` are wildcards and every
//! other character is literal, including both path separators. Matching is
//! case-insensitive (ASCII folding only). Patterns are never anchored and a
//! run of `*` counts as one `*`, so `*.Tests.ps1`, `build*` and `a**b` all
//! keep their contains meaning.

use glob::{MatchOptions, Pattern};

const MATCH_OPTS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    compiled: Option<Pattern>,
}

impl PathPattern {
    pub fn new(source: &str) -> Self {
        let core = squeeze_stars(source.trim_matches('*'));
        // An unclosed `[` is not a valid glob; match it as a literal substring.
        let compiled = Pattern::new(&wrap(&core))
            .or_else(|_| Pattern::new(&wrap(&Pattern::escape(&core))))
            .ok();
        PathPattern {
            source: source.to_string(),
            compiled,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Test the pattern against both separator-normalized forms of `path`.
    pub fn matches_path(&self, path: &str) -> bool {
        let (forward, backward) = normalized_forms(path);
        match &self.compiled {
            Some(p) => p.matches_with(&forward, MATCH_OPTS) || p.matches_with(&backward, MATCH_OPTS),
            None => {
                let needle = self.source.to_ascii_lowercase();
                forward.to_ascii_lowercase().contains(&needle)
                    || backward.to_ascii_lowercase().contains(&needle)
            }
        }
    }
}

/// `*core*`, or a lone `*` for an empty core.
fn wrap(core: &str) -> String {
    if core.is_empty() {
        "*".to_string()
    } else {
        format!("*{}*", core)
    }
}

/// Collapse every run of `*` to a single `*`; glob rejects `**` that is not
/// a whole path component.
fn squeeze_stars(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

/// `path` with every `\` turned into `/`, and with every `/` turned into `\`.
pub fn normalized_forms(path: &str) -> (String, String) {
    (path.replace('\\', "/"), path.replace('/', "\\"))
}

/// Compile a list of raw patterns.
pub fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Vec<PathPattern> {
    patterns.iter().map(|p| PathPattern::new(p.as_ref())).collect()
}

/// True when any pattern in `patterns` matches `path`.
pub fn any_matches(patterns: &[PathPattern], path: &str) -> bool {
    patterns.iter().any(|p| p.matches_path(path))
}
