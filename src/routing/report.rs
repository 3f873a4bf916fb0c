//! Disabled-endpoint report.
//!
//! Cross-references the route table against the rule set and lists every
//! route that has at least one disabled method, e.g.
//! `/api/users/:id [GET,POST]`. Output is sorted and independent of route
//! registration order and rule order.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::routing::pattern::split_path;
use crate::routing::route_table::{normalize_template, RouteTable};
use crate::routing::rules::RuleSet;

/// A route and the subset of its methods that are disabled.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DisabledEndpoint {
    pub path: String,
    pub methods: BTreeSet<String>,
}

impl fmt::Display for DisabledEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let methods: Vec<&str> = self.methods.iter().map(String::as_str).collect();
        write!(f, "{} [{}]", self.path, methods.join(","))
    }
}

/// Typed form of [`disabled_endpoints`], sorted by path.
pub fn disabled_endpoint_records<T>(routes: &T, rules: &RuleSet) -> Vec<DisabledEndpoint>
where
    T: RouteTable + ?Sized,
{
    // Routers commonly register one descriptor per method.
    let mut grouped: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for route in routes.routes() {
        grouped
            .entry(route.path)
            .or_default()
            .extend(route.methods.iter().map(|m| m.trim().to_ascii_uppercase()));
    }

    grouped
        .into_iter()
        .filter_map(|(path, registered)| {
            let normalized = normalize_template(&path);
            let segments = split_path(&normalized);

            let methods: BTreeSet<String> = rules
                .rules()
                .iter()
                .filter(|rule| rule.pattern().matches_segments(&segments))
                .flat_map(|rule| rule.methods().intersection(&registered).cloned())
                .collect();

            (!methods.is_empty()).then_some(DisabledEndpoint { path, methods })
        })
        .collect()
}

/// Lines of the form `"<path> [<METHOD>,...]"`, sorted lexicographically.
pub fn disabled_endpoints<T>(routes: &T, rules: &RuleSet) -> Vec<String>
where
    T: RouteTable + ?Sized,
{
    let mut lines: Vec<String> = disabled_endpoint_records(routes, rules)
        .iter()
        .map(ToString::to_string)
        .collect();
    lines.sort();
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::route_table::RouteDescriptor;

    #[test]
    fn test_basic_report() {
        let routes = vec![
            RouteDescriptor::new("/api/users/:id", ["GET"]),
            RouteDescriptor::new("/api/users/:id", ["POST"]),
            RouteDescriptor::new("/api/items", ["DELETE"]),
            RouteDescriptor::new("/health", ["GET"]),
        ];
        let rules = RuleSet::from_entries([
            ("/api/users/param", vec!["GET", "POST"]),
            ("/api/items", vec!["DELETE"]),
        ])
        .unwrap();

        assert_eq!(
            disabled_endpoints(&routes, &rules),
            vec!["/api/items [DELETE]", "/api/users/:id [GET,POST]"]
        );
    }

    #[test]
    fn test_no_matches() {
        let routes = vec![
            RouteDescriptor::new("/active", ["GET"]),
            RouteDescriptor::new("/something", ["POST"]),
        ];
        let rules = RuleSet::from_entries([("/notfound", vec!["GET"])]).unwrap();
        assert!(disabled_endpoints(&routes, &rules).is_empty());
    }

    #[test]
    fn test_multiple_groups() {
        let routes = vec![
            RouteDescriptor::new("/v2/data/:id", ["GET"]),
            RouteDescriptor::new("/v1/data/:id", ["GET"]),
        ];
        let rules = RuleSet::from_entries([
            ("/v1/data/param", vec!["GET"]),
            ("/v2/data/param", vec!["GET"]),
        ])
        .unwrap();

        assert_eq!(
            disabled_endpoints(&routes, &rules),
            vec!["/v1/data/:id [GET]", "/v2/data/:id [GET]"]
        );
    }

    #[test]
    fn test_unregistered_methods_ignored() {
        let routes = vec![RouteDescriptor::new("/api/items", ["GET"])];
        let rules = RuleSet::from_entries([("/api/items", vec!["DELETE", "GET"])]).unwrap();
        assert_eq!(disabled_endpoints(&routes, &rules), vec!["/api/items [GET]"]);
    }

    #[test]
    fn test_overlapping_rules_union() {
        let routes = vec![RouteDescriptor::new("/api/items/{id}", ["GET", "PUT", "DELETE"])];
        let rules = RuleSet::from_entries([
            ("/api/items/*", vec!["DELETE"]),
            ("/api/items/:id?", vec!["PUT"]),
            ("/api/+", vec!["DELETE"]),
        ])
        .unwrap();
        assert_eq!(
            disabled_endpoints(&routes, &rules),
            vec!["/api/items/{id} [DELETE,PUT]"]
        );
    }

    #[test]
    fn test_param_route_against_patterns() {
        let rules = RuleSet::from_entries([
            ("/a/*", vec!["GET"]),
            ("/b/:name.html", vec!["GET"]),
            ("/c/literal", vec!["GET"]),
        ])
        .unwrap();
        let routes = vec![
            RouteDescriptor::new("/a/:id", ["GET"]),
            RouteDescriptor::new("/b/:name.html", ["GET"]),
            RouteDescriptor::new("/b/:name", ["GET"]),
            RouteDescriptor::new("/c/:id", ["GET"]),
        ];
        assert_eq!(
            disabled_endpoints(&routes, &rules),
            vec!["/a/:id [GET]", "/b/:name.html [GET]"]
        );
    }

    #[test]
    fn test_report_is_idempotent_and_order_independent() {
        let mut routes = vec![
            RouteDescriptor::new("/z", ["GET"]),
            RouteDescriptor::new("/a", ["get"]),
            RouteDescriptor::new("/m/:id", ["POST", "GET"]),
        ];
        let rules = RuleSet::from_entries([("/+", vec!["GET", "POST"])]).unwrap();
        let reversed_rules =
            RuleSet::from_entries([("/+", vec!["POST"]), ("/+", vec!["GET"])]).unwrap();

        let first = disabled_endpoints(&routes, &rules);
        assert_eq!(first, disabled_endpoints(&routes, &rules));
        routes.reverse();
        assert_eq!(first, disabled_endpoints(&routes, &reversed_rules));
        assert_eq!(first, vec!["/a [GET]", "/m/:id [GET,POST]", "/z [GET]"]);
    }

    #[test]
    fn test_record_display() {
        let record = DisabledEndpoint {
            path: "/api".into(),
            methods: ["POST".to_string(), "GET".to_string()].into_iter().collect(),
        };
        assert_eq!(record.to_string(), "/api [GET,POST]");
    }
}
