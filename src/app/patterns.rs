use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Splits a delimiter-separated pattern string on any run of `;` or `,`.
///
/// Tokens are trimmed and empty ones dropped. Never fails.
pub fn parse_patterns(raw: &str) -> Vec<String> {
    raw.split([';', ','])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Like [`parse_patterns`], but falls back to `default` when nothing usable was given.
pub fn parse_patterns_or_default(raw: &str, default: &str) -> Vec<String> {
    let parsed = parse_patterns(raw);
    if parsed.is_empty() {
        parse_patterns(default)
    } else {
        parsed
    }
}

/// Canonical form of a pattern list, accepted back by [`parse_patterns`].
pub fn join_patterns(patterns: &[String]) -> String {
    patterns.join(";")
}

/// Compiled patterns, matched against paths relative to the scan root.
///
/// Every pattern is anchored with `**/`, so `*.cs` matches at any depth and
/// `src/*.cs` matches any `src` directory below the root.
pub struct PatternSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl PatternSet {
    pub fn new(patterns: &[String]) -> Self {
        let mut builder = GlobSetBuilder::new();
        let mut accepted = Vec::with_capacity(patterns.len());

        for pat in patterns {
            let anchored = format!("**/{}", pat.trim_start_matches('/'));
            let glob = GlobBuilder::new(&anchored)
                .literal_separator(true)
                .case_insensitive(host_is_case_insensitive())
                .build();
            match glob {
                Ok(glob) => {
                    builder.add(glob);
                    accepted.push(pat.clone());
                }
                Err(err) => log::warn!("Skipping invalid glob pattern '{}': {}", pat, err),
            }
        }

        let set = builder.build().unwrap_or_else(|err| {
            log::warn!("Failed to build pattern set: {}", err);
            GlobSet::empty()
        });

        Self {
            patterns: accepted,
            set,
        }
    }

    /// Patterns that compiled, in their original order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Indices (into [`PatternSet::patterns`]) of every pattern matching `relative`.
    pub fn matching(&self, relative: &Path) -> Vec<usize> {
        self.set.matches(relative)
    }
}

fn host_is_case_insensitive() -> bool {
    cfg!(any(windows, target_os = "macos"))
}
