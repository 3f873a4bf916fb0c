//! Registered routes as seen by the endpoint reporter.

use serde::{Deserialize, Serialize};

use crate::routing::pattern::{is_ident, split_path};

/// Word substituted for every path-parameter placeholder in a route template.
///
/// Rules written against templates use it verbatim, e.g. `/api/users/param`
/// covers the route `/api/users/:id`.
pub const PARAM_PLACEHOLDER: &str = "param";

/// A registered path template plus its HTTP methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    pub path: String,
    pub methods: Vec<String>,
}

impl RouteDescriptor {
    pub fn new<I, S>(path: impl Into<String>, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            methods: methods.into_iter().map(Into::into).collect(),
        }
    }
}

/// Source of the current route table.
pub trait RouteTable {
    /// Snapshot of all registered routes. Order is not significant.
    fn routes(&self) -> Vec<RouteDescriptor>;
}

impl RouteTable for [RouteDescriptor] {
    fn routes(&self) -> Vec<RouteDescriptor> {
        self.to_vec()
    }
}

impl RouteTable for Vec<RouteDescriptor> {
    fn routes(&self) -> Vec<RouteDescriptor> {
        self.clone()
    }
}

/// Rewrite a route template into a concrete path, replacing each parameter
/// placeholder with [`PARAM_PLACEHOLDER`].
///
/// Understands `:name`, `:name?`, `{name}`, `{*name}`, `*name`, `*` and `+`.
pub fn normalize_template(template: &str) -> String {
    let segments: Vec<String> = split_path(template)
        .into_iter()
        .map(normalize_segment)
        .collect();
    format!("/{}", segments.join("/"))
}

fn normalize_segment(segment: &str) -> String {
    if segment == "+" || segment.starts_with('*') {
        return PARAM_PLACEHOLDER.to_string();
    }

    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ':' => {
                while chars.next_if(|c| is_ident(*c)).is_some() {}
                chars.next_if_eq(&'?');
                out.push_str(PARAM_PLACEHOLDER);
            }
            '{' => {
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                }
                out.push_str(PARAM_PLACEHOLDER);
            }
            _ => out.push(c),
        }
    }
    out
}
