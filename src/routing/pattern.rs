//! URL pattern compilation and matching.
//!
//! # Responsibilities
//! - Parse a configured pattern into typed segments
//! - Match concrete request paths against the compiled segments
//! - Reject malformed patterns at startup
//!
//! # Pattern Syntax
//! ```text
//! /api/users           literal segments
//! /api/users/:id       one non-empty segment
//! /api/users/:id?      zero or one segment
//! /files/:name.html    non-empty prefix + literal suffix
//! /files/:base?.:ext   one segment split on '.' (also '-', ...)
//! /api/*               exactly one non-empty segment
//! /api/+               one or more trailing segments (final only)
//! ```
//!
//! # Design Decisions
//! - Segments are a closed enum; one match arm per kind
//! - Case-sensitive, no percent-decoding
//! - Trailing slashes are trimmed from patterns and paths alike
//! - Matching is total: a compiled pattern never fails at request time

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while compiling a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,

    #[error("pattern `{0}` must start with '/'")]
    MissingLeadingSlash(String),

    #[error("pattern `{0}` contains an empty segment")]
    EmptySegment(String),

    #[error("pattern `{pattern}`: parameter in segment `{segment}` has no name")]
    UnnamedParameter { pattern: String, segment: String },

    #[error("pattern `{pattern}`: unexpected `{marker}` in segment `{segment}`")]
    UnexpectedMarker {
        pattern: String,
        segment: String,
        marker: char,
    },

    #[error(
        "pattern `{pattern}`: optional marker in segment `{segment}` may only end a parameter \
         or precede a second parameter"
    )]
    MisplacedOptional { pattern: String, segment: String },

    #[error("pattern `{0}`: `+` may only appear as the final segment")]
    PlusNotLast(String),
}

/// A single compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param,
    OptionalParam,
    ParamSuffix(String),
    ParamPair { first_optional: bool, separator: char },
    Star,
    Plus,
}

impl Segment {
    /// Returns true if this segment consumes exactly `value`.
    /// `Plus` and elided `OptionalParam` are handled by the caller.
    fn matches_one(&self, value: &str) -> bool {
        match self {
            Segment::Literal(literal) => literal == value,
            Segment::Param | Segment::OptionalParam | Segment::Star | Segment::Plus => {
                !value.is_empty()
            }
            Segment::ParamSuffix(suffix) => {
                value.len() > suffix.len() && value.ends_with(suffix.as_str())
            }
            Segment::ParamPair {
                first_optional,
                separator,
            } => value.match_indices(*separator).any(|(at, sep)| {
                (*first_optional || at > 0) && at + sep.len() < value.len()
            }),
        }
    }
}

/// A compiled URL pattern.
///
/// Equality and hashing use the normalized string form, so `/a/` and `/a`
/// are the same pattern.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    source: String,
    segments: Vec<Segment>,
}

impl UrlPattern {
    /// Compile a pattern string.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        let Some(body) = pattern.strip_prefix('/') else {
            return Err(PatternError::MissingLeadingSlash(pattern.to_string()));
        };
        let body = body.trim_end_matches('/');

        let mut segments = Vec::new();
        if !body.is_empty() {
            for raw in body.split('/') {
                if raw.is_empty() {
                    return Err(PatternError::EmptySegment(pattern.to_string()));
                }
                segments.push(parse_segment(pattern, raw)?);
            }
        }

        if let Some(pos) = segments.iter().position(|s| *s == Segment::Plus) {
            if pos + 1 != segments.len() {
                return Err(PatternError::PlusNotLast(pattern.to_string()));
            }
        }

        Ok(Self {
            source: format!("/{}", body),
            segments,
        })
    }

    /// The normalized pattern string.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if `path` matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.matches_segments(&split_path(path))
    }

    pub(crate) fn matches_segments(&self, path: &[&str]) -> bool {
        match_from(&self.segments, path)
    }
}

fn match_from(tokens: &[Segment], path: &[&str]) -> bool {
    let Some((token, rest)) = tokens.split_first() else {
        return path.is_empty();
    };

    match token {
        // Only ever the final token.
        Segment::Plus => !path.is_empty() && path.iter().all(|s| !s.is_empty()),
        Segment::OptionalParam => {
            let consumed = match path.split_first() {
                Some((head, tail)) => token.matches_one(head) && match_from(rest, tail),
                None => false,
            };
            consumed || match_from(rest, path)
        }
        _ => match path.split_first() {
            Some((head, tail)) => token.matches_one(head) && match_from(rest, tail),
            None => false,
        },
    }
}

/// Split a request path into segments, ignoring the leading slash and any
/// trailing slashes. The root path yields no segments.
pub(crate) fn split_path(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path).trim_end_matches('/');
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

pub(crate) fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_marker(c: char) -> bool {
    matches!(c, ':' | '?' | '*' | '+')
}

fn parse_segment(pattern: &str, raw: &str) -> Result<Segment, PatternError> {
    let unexpected = |marker: char| PatternError::UnexpectedMarker {
        pattern: pattern.to_string(),
        segment: raw.to_string(),
        marker,
    };

    match raw {
        "*" => return Ok(Segment::Star),
        "+" => return Ok(Segment::Plus),
        _ => {}
    }

    let Some(param) = raw.strip_prefix(':') else {
        return match raw.chars().find(|c| is_marker(*c)) {
            Some(marker) => Err(unexpected(marker)),
            None => Ok(Segment::Literal(raw.to_string())),
        };
    };

    let name_len = param.find(|c: char| !is_ident(c)).unwrap_or(param.len());
    if name_len == 0 {
        return Err(PatternError::UnnamedParameter {
            pattern: pattern.to_string(),
            segment: raw.to_string(),
        });
    }

    let rest = &param[name_len..];
    let (optional, rest) = match rest.strip_prefix('?') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };

    let mut chars = rest.chars();
    let Some(separator) = chars.next() else {
        return Ok(if optional {
            Segment::OptionalParam
        } else {
            Segment::Param
        });
    };
    if is_marker(separator) {
        return Err(unexpected(separator));
    }

    let after = chars.as_str();
    if let Some(second) = after.strip_prefix(':') {
        if second.is_empty() {
            return Err(PatternError::UnnamedParameter {
                pattern: pattern.to_string(),
                segment: raw.to_string(),
            });
        }
        return match second.chars().find(|c| !is_ident(*c)) {
            Some(c) => Err(unexpected(c)),
            None => Ok(Segment::ParamPair {
                first_optional: optional,
                separator,
            }),
        };
    }

    if optional {
        return Err(PatternError::MisplacedOptional {
            pattern: pattern.to_string(),
            segment: raw.to_string(),
        });
    }
    match rest.chars().find(|c| is_marker(*c)) {
        Some(marker) => Err(unexpected(marker)),
        None => Ok(Segment::ParamSuffix(rest.to_string())),
    }
}

impl FromStr for UrlPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl PartialEq for UrlPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for UrlPattern {}

impl Hash for UrlPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}
