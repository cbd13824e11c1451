//! Compiled endpoint model.

use std::fmt;

use crate::converter::Endpoint;
use crate::error::RuleError;
use crate::rule::{Rule, Value};
use crate::{ContextSet, Error, Field, Result};

/// Sentinel is the compiled form of one endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sentinel {
    /// HTTP method, `*` or empty for any
    pub method: String,
    /// Non-empty path segments
    pub path: Vec<String>,
    /// Rules in evaluation order
    pub rules: Vec<Rule>,
}

impl Sentinel {
    /// Compile one endpoint.
    ///
    /// The first rule that fails to parse, or names an unknown context,
    /// aborts compilation of the endpoint.
    pub fn from_endpoint(endpoint: &Endpoint) -> Result<Self> {
        let rules = endpoint
            .rules
            .iter()
            .map(|text| {
                parse_rule(text).map_err(|source| Error::InvalidRule {
                    endpoint: endpoint.label(),
                    rule: text.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            method: endpoint.method.clone(),
            path: split_path(&endpoint.path),
            rules,
        })
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} /{}", self.method, self.path.join("/"))?;
        for rule in &self.rules {
            write!(f, "\n  {}", rule)?;
        }
        Ok(())
    }
}

fn parse_rule(text: &str) -> std::result::Result<Rule, RuleError> {
    let rule = Rule::parse(text)?;

    let ctx_values = rule
        .clauses
        .iter()
        .flat_map(|clause| &clause.statements)
        .filter(|stmt| stmt.field == Some(Field::Ctx))
        .map(|stmt| stmt.value.as_ref().and_then(Value::literal).unwrap_or(""));

    for list in ctx_values {
        if let Err(Error::UnknownContext(name)) = ContextSet::parse_list(list) {
            return Err(RuleError::UnknownContext(name));
        }
    }

    Ok(rule)
}

/// Split a path on `/`, dropping empty segments.
pub fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Compile all endpoints, preserving their order.
///
/// Any invalid rule aborts the whole run.
pub fn build_sentinels(endpoints: &[Endpoint]) -> Result<Vec<Sentinel>> {
    endpoints
        .iter()
        .map(|endpoint| {
            let sentinel = Sentinel::from_endpoint(endpoint)?;
            log::debug!(
                "Compiled {}: {} path segments, {} rules",
                endpoint.label(),
                sentinel.path.len(),
                sentinel.rules.len()
            );
            Ok(sentinel)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use crate::{Operator, Statement};

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("/api/*"), vec!["api", "*"]);
        assert!(split_path("/").is_empty());
        assert!(split_path("").is_empty());
        assert_eq!(split_path("/a//b/"), vec!["a", "b"]);
        assert_eq!(split_path("users/{id}"), vec!["users", "{id}"]);
    }

    #[test]
    fn test_from_endpoint() {
        let endpoint = Endpoint::new(
            "POST",
            "/api/users/",
            vec!["$ctx == 'json_obj' $key == 'role' : block".to_string(), "pass".to_string()],
        );

        let sentinel = Sentinel::from_endpoint(&endpoint).unwrap();

        assert_eq!(sentinel.method, "POST");
        assert_eq!(sentinel.path, vec!["api", "users"]);
        assert_eq!(sentinel.rules.len(), 2);
        assert_eq!(
            sentinel.rules[1].clauses[0].statements,
            vec![Statement::terminal(Operator::Pass)]
        );
    }

    #[test]
    fn test_build_preserves_order() {
        let endpoints = vec![
            Endpoint::new("GET", "/b", vec![]),
            Endpoint::new("GET", "/a", vec![]),
            Endpoint::new("GET", "/b", vec![]),
        ];

        let sentinels = build_sentinels(&endpoints).unwrap();
        let paths: Vec<_> = sentinels.iter().map(|s| s.path.join("/")).collect();
        assert_eq!(paths, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_invalid_rule_aborts_run() {
        let endpoints = vec![
            Endpoint::new("GET", "/ok", vec!["pass".to_string()]),
            Endpoint::new("PUT", "/bad", vec!["pass".to_string(), "$val == 'open".to_string()]),
        ];

        match build_sentinels(&endpoints) {
            Err(Error::InvalidRule {
                endpoint,
                rule,
                source,
            }) => {
                assert_eq!(endpoint, "PUT /bad");
                assert_eq!(rule, "$val == 'open");
                assert_eq!(source, RuleError::UnterminatedLiteral { delimiter: '\'' });
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_context_names_endpoint_and_rule() {
        let endpoint = Endpoint::new(
            "POST",
            "/api/users",
            vec!["pass".to_string(), "$ctx == 'json|jsonx' : block".to_string()],
        );

        match Sentinel::from_endpoint(&endpoint) {
            Err(Error::InvalidRule {
                endpoint,
                rule,
                source,
            }) => {
                assert_eq!(endpoint, "POST /api/users");
                assert_eq!(rule, "$ctx == 'json|jsonx' : block");
                assert_eq!(source, RuleError::UnknownContext("jsonx".to_string()));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_ctx_without_literal_is_rejected() {
        let endpoint = Endpoint::new("GET", "/", vec!["$ctx == /json/ : block".to_string()]);
        assert!(matches!(
            Sentinel::from_endpoint(&endpoint),
            Err(Error::InvalidRule {
                source: RuleError::UnknownContext(_),
                ..
            })
        ));
    }

    #[test]
    fn test_error_message_names_rule() {
        let endpoint = Endpoint::new("GET", "/x", vec!["$ctx == 'json' : deny".to_string()]);
        let err = Sentinel::from_endpoint(&endpoint).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("deny"), "{}", message);
        assert!(message.contains("GET /x"), "{}", message);
    }
}
