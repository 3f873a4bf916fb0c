//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every disabled pattern entry so bad rules stop startup
//! - Validate value ranges (timeouts > 0, bind address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::Method;
use thiserror::Error;

use crate::config::schema::{DeprecatedApiConfig, GateConfig, PatternEntry, RoutesFile};
use crate::routing::{PatternError, RuleSet, UrlPattern};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("deprecated_api.patterns[{index}]: {source}")]
    Pattern {
        index: usize,
        #[source]
        source: PatternError,
    },

    #[error("deprecated_api.patterns[{index}]: `{entry}` is missing a `[METHOD, ...]` list")]
    MissingMethods { index: usize, entry: String },

    #[error("deprecated_api.patterns[{index}]: empty HTTP method")]
    EmptyMethod { index: usize },

    #[error("deprecated_api.patterns[{index}]: `{method}` is not a valid HTTP method")]
    InvalidMethod { index: usize, method: String },

    #[error("listener.bind_address `{0}` is not a valid socket address")]
    BindAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,

    #[error("routes[{index}]: `{path}` must use `{{name}}` placeholders, not `:name`")]
    RoutePlaceholder { index: usize, path: String },

    #[error("routes[{index}]: `{method}` is not a valid HTTP method")]
    RouteMethod { index: usize, method: String },

    #[error("routes[{index}]: `{path}` must start with `/`")]
    RouteLeadingSlash { index: usize, path: String },

    #[error("routes[{index}]: `{path}` has malformed `{{...}}` captures")]
    RouteTemplate { index: usize, path: String },

    #[error("routes[{index}]: `{method} {path}` is already registered")]
    DuplicateRoute {
        index: usize,
        method: String,
        path: String,
    },
}

/// Validate the full configuration.
///
/// Pattern entries are checked one by one; the rule set itself is built
/// once, by [`compile_rules`] at startup.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    for (index, entry) in config.deprecated_api.patterns.iter().enumerate() {
        check_entry(index, entry, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Compile the disabled patterns into a rule set.
///
/// Every entry is checked; the error list covers all bad entries.
pub fn compile_rules(config: &DeprecatedApiConfig) -> Result<RuleSet, Vec<ValidationError>> {
    let mut builder = RuleSet::builder();
    let mut errors = Vec::new();

    for (index, entry) in config.patterns.iter().enumerate() {
        if let Some((pattern, methods)) = check_entry(index, entry, &mut errors) {
            builder.insert(pattern, methods);
        }
    }

    if errors.is_empty() {
        Ok(builder.build())
    } else {
        Err(errors)
    }
}

/// Check one pattern entry, pushing its problems onto `errors`.
///
/// Returns the compiled pattern and its methods when the entry is sound.
fn check_entry<'a>(
    index: usize,
    entry: &'a PatternEntry,
    errors: &mut Vec<ValidationError>,
) -> Option<(UrlPattern, Vec<&'a str>)> {
    let Some((pattern, methods)) = entry.parts() else {
        errors.push(ValidationError::MissingMethods {
            index,
            entry: format!("{:?}", entry),
        });
        return None;
    };

    let before = errors.len();
    for method in &methods {
        let method = method.trim();
        if method.is_empty() {
            errors.push(ValidationError::EmptyMethod { index });
        } else if Method::from_bytes(method.to_ascii_uppercase().as_bytes()).is_err() {
            errors.push(ValidationError::InvalidMethod {
                index,
                method: method.to_string(),
            });
        }
    }

    let compiled = match UrlPattern::compile(pattern) {
        Ok(compiled) => Some(compiled),
        Err(source) => {
            errors.push(ValidationError::Pattern { index, source });
            None
        }
    };

    if errors.len() > before {
        tracing::debug!(index, pattern, "Rejected deprecated API pattern entry");
        return None;
    }
    compiled.map(|compiled| (compiled, methods))
}

/// Validate a routes file before its routes are registered with axum.
pub fn validate_routes(file: &RoutesFile) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen: HashSet<(&str, String)> = HashSet::new();

    for (index, route) in file.routes.iter().enumerate() {
        let path = route.path.as_str();
        if !path.starts_with('/') {
            errors.push(ValidationError::RouteLeadingSlash {
                index,
                path: route.path.clone(),
            });
        }
        if path.split('/').any(|segment| segment.starts_with(':')) {
            errors.push(ValidationError::RoutePlaceholder {
                index,
                path: route.path.clone(),
            });
        }
        if !braces_well_formed(path) {
            errors.push(ValidationError::RouteTemplate {
                index,
                path: route.path.clone(),
            });
        }

        for method in &route.methods {
            let canonical = method.trim().to_ascii_uppercase();
            if Method::from_bytes(canonical.as_bytes()).is_err() {
                errors.push(ValidationError::RouteMethod {
                    index,
                    method: method.clone(),
                });
            } else if !seen.insert((path, canonical.clone())) {
                errors.push(ValidationError::DuplicateRoute {
                    index,
                    method: canonical,
                    path: route.path.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Every `{` closes in the same segment, names something, and a `{*rest}`
/// capture is the last segment.
fn braces_well_formed(path: &str) -> bool {
    let segments: Vec<&str> = path.split('/').collect();
    segments.iter().enumerate().all(|(i, segment)| {
        let mut open = None;
        for (pos, c) in segment.char_indices() {
            match (c, open) {
                ('{', None) => open = Some(pos),
                ('}', Some(start)) => {
                    let capture = &segment[start + 1..pos];
                    let catch_all = capture.starts_with('*');
                    let name = capture.trim_start_matches('*');
                    if name.is_empty() || (catch_all && i + 1 != segments.len()) {
                        return false;
                    }
                    open = None;
                }
                ('{', Some(_)) | ('}', None) => return false,
                _ => {}
            }
        }
        open.is_none()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteDescriptor;

    fn deprecated(patterns: Vec<PatternEntry>) -> DeprecatedApiConfig {
        DeprecatedApiConfig {
            disabled: true,
            patterns,
        }
    }

    #[test]
    fn test_compile_rules() {
        let rules = compile_rules(&deprecated(vec![
            PatternEntry::Inline("/api/v1/test [GET, post]".into()),
            PatternEntry::table("/api/v1/test/", ["delete"]),
        ]))
        .unwrap();

        assert_eq!(rules.len(), 1);
        assert!(rules.is_disabled("POST", "/api/v1/test"));
        assert!(rules.is_disabled("DELETE", "/api/v1/test"));
    }

    #[test]
    fn test_all_errors_reported() {
        let errors = compile_rules(&deprecated(vec![
            PatternEntry::Inline("/api/v1/test".into()),
            PatternEntry::table("/a/+/b", ["GET"]),
            PatternEntry::table("/ok", ["GET"]),
            PatternEntry::Inline("/c [GET, ]".into()),
            PatternEntry::table("/d", ["G T"]),
        ]))
        .unwrap_err();

        assert_eq!(errors.len(), 4);
        assert!(matches!(errors[0], ValidationError::MissingMethods { index: 0, .. }));
        assert!(matches!(
            errors[1],
            ValidationError::Pattern {
                index: 1,
                source: PatternError::PlusNotLast(_)
            }
        ));
        assert_eq!(errors[2], ValidationError::EmptyMethod { index: 3 });
        assert!(matches!(errors[3], ValidationError::InvalidMethod { index: 4, .. }));
    }

    #[test]
    fn test_validate_config_ranges() {
        let mut config = GateConfig::default();
        assert!(validate_config(&config).is_ok());

        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ValidationError::BindAddress(_)));
        assert_eq!(errors[1], ValidationError::RequestTimeout);
    }

    #[test]
    fn test_validate_routes() {
        let file = RoutesFile {
            routes: vec![
                RouteDescriptor::new("/api/users/{id}", ["GET"]),
                RouteDescriptor::new("/api/users/:id", ["GET"]),
                RouteDescriptor::new("/api/items", ["G T"]),
            ],
        };
        let errors = validate_routes(&file).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ValidationError::RoutePlaceholder { index: 1, .. }));
        assert!(matches!(errors[1], ValidationError::RouteMethod { index: 2, .. }));
    }

    fn routes(routes: Vec<RouteDescriptor>) -> RoutesFile {
        RoutesFile { routes }
    }

    #[test]
    fn test_route_without_leading_slash() {
        let errors = validate_routes(&routes(vec![RouteDescriptor::new("api/items", ["GET"])]))
            .unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::RouteLeadingSlash {
                index: 0,
                path: "api/items".into()
            }]
        );
    }

    #[test]
    fn test_route_with_malformed_captures() {
        for path in ["/a/{id", "/a/id}", "/a/{}", "/a/{*rest}/b", "/a/{*}"] {
            let errors =
                validate_routes(&routes(vec![RouteDescriptor::new(path, ["GET"])])).unwrap_err();
            assert!(
                matches!(errors[..], [ValidationError::RouteTemplate { index: 0, .. }]),
                "{path}: {errors:?}"
            );
        }

        let file = routes(vec![
            RouteDescriptor::new("/a/{id}", ["GET"]),
            RouteDescriptor::new("/files/{*rest}", ["GET"]),
            RouteDescriptor::new("/", ["GET"]),
        ]);
        assert!(validate_routes(&file).is_ok());
    }

    #[test]
    fn test_route_method_repeated_ignoring_case() {
        let errors = validate_routes(&routes(vec![RouteDescriptor::new("/a", ["GET", "get"])]))
            .unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateRoute {
                index: 0,
                method: "GET".into(),
                path: "/a".into()
            }]
        );
    }

    #[test]
    fn test_route_repeated_across_entries() {
        let errors = validate_routes(&routes(vec![
            RouteDescriptor::new("/a", ["GET"]),
            RouteDescriptor::new("/b", ["GET"]),
            RouteDescriptor::new("/a", ["POST", " get "]),
        ]))
        .unwrap_err();
        assert!(matches!(
            errors[..],
            [ValidationError::DuplicateRoute { index: 2, .. }]
        ));
    }

    #[test]
    fn test_validate_config_checks_entries() {
        let mut config = GateConfig::default();
        config.deprecated_api.patterns = vec![
            PatternEntry::table("/ok", ["GET"]),
            PatternEntry::table("//bad", ["GET"]),
            PatternEntry::table("/c", ["G T"]),
        ];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ValidationError::Pattern { index: 1, .. }));
        assert!(matches!(errors[1], ValidationError::InvalidMethod { index: 2, .. }));

        config.deprecated_api.patterns.truncate(1);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::EmptyMethod { index: 2 };
        assert_eq!(err.to_string(), "deprecated_api.patterns[2]: empty HTTP method");
    }
}
