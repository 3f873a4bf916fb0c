//! Disabled-endpoint rules and the per-request gate decision.
//!
//! # Responsibilities
//! - Bind compiled patterns to the HTTP methods they disable
//! - Merge repeated patterns by method-set union
//! - Answer `is_disabled(method, path)` for every request
//!
//! # Design Decisions
//! - Built once at startup, immutable afterwards (shared via `Arc`)
//! - Linear scan: rule sets are small and matching is allocation-light
//! - Methods stored upper-case; lookups upper-case the request method

use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};

use crate::routing::pattern::{split_path, PatternError, UrlPattern};

/// A pattern bound to the set of methods it disables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pattern: UrlPattern,
    methods: BTreeSet<String>,
}

impl Rule {
    pub fn pattern(&self) -> &UrlPattern {
        &self.pattern
    }

    /// Upper-case method names, sorted.
    pub fn methods(&self) -> &BTreeSet<String> {
        &self.methods
    }
}

/// Immutable set of disabling rules, in order of first configuration.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// Build a rule set from `(pattern, methods)` pairs.
    pub fn from_entries<I, P, M, S>(entries: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = (P, M)>,
        P: AsRef<str>,
        M: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = Self::builder();
        for (pattern, methods) in entries {
            builder.add(pattern.as_ref(), methods)?;
        }
        Ok(builder.build())
    }

    /// Returns true if a request with this method and path must be declined.
    pub fn is_disabled(&self, method: &str, path: &str) -> bool {
        if self.rules.is_empty() {
            return false;
        }

        let method = canonical_method(method);
        let segments = split_path(path);
        self.rules.iter().any(|rule| {
            rule.methods.contains(&*method) && rule.pattern.matches_segments(&segments)
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Accumulates rules before freezing them into a [`RuleSet`].
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: Vec<Rule>,
    index: HashMap<String, usize>,
}

impl RuleSetBuilder {
    /// Compile `pattern` and add `methods` to it.
    ///
    /// A pattern that normalizes to one already added extends that rule.
    /// Blank method names are skipped.
    pub fn add<M, S>(&mut self, pattern: &str, methods: M) -> Result<&mut Self, PatternError>
    where
        M: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pattern = UrlPattern::compile(pattern)?;
        Ok(self.insert(pattern, methods))
    }

    /// Add `methods` to an already compiled pattern.
    pub fn insert<M, S>(&mut self, pattern: UrlPattern, methods: M) -> &mut Self
    where
        M: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let methods = methods
            .into_iter()
            .map(|m| m.as_ref().trim().to_ascii_uppercase())
            .filter(|m| !m.is_empty());

        match self.index.get(pattern.as_str()) {
            Some(&idx) => self.rules[idx].methods.extend(methods),
            None => {
                self.index.insert(pattern.as_str().to_string(), self.rules.len());
                self.rules.push(Rule {
                    pattern,
                    methods: methods.collect(),
                });
            }
        }
        self
    }

    pub fn build(self) -> RuleSet {
        RuleSet { rules: self.rules }
    }
}

fn canonical_method(method: &str) -> Cow<'_, str> {
    if method.bytes().any(|b| b.is_ascii_lowercase()) {
        Cow::Owned(method.to_ascii_uppercase())
    } else {
        Cow::Borrowed(method)
    }
}
