//! JSON endpoint configuration loader.

use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;

use crate::Result;

/// One endpoint entry of the configuration file.
///
/// ```json
/// { "method": "POST", "path": "/api/users", "rules": ["$ctx == 'json_obj' ... : block"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Endpoint {
    /// HTTP method, `*` or empty for any
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,
    /// Slash-separated path pattern
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    /// Rule strings, in evaluation order
    #[serde(default, deserialize_with = "null_as_default")]
    pub rules: Vec<String>,
}

impl Endpoint {
    pub fn new(method: impl Into<String>, path: impl Into<String>, rules: Vec<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            rules,
        }
    }

    /// Short label used in diagnostics, e.g. `POST /api/users`.
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Endpoint configuration converter.
pub struct EndpointConverter;

impl EndpointConverter {
    /// Parse endpoints from JSON text.
    ///
    /// Blank input and `null` yield no endpoints. Only the first JSON value is
    /// read; anything after it is ignored.
    pub fn parse(content: &str) -> Result<Vec<Endpoint>> {
        let mut stream = serde_json::Deserializer::from_str(content).into_iter::<Option<Vec<Endpoint>>>();

        match stream.next() {
            Some(endpoints) => Ok(endpoints?.unwrap_or_default()),
            None => Ok(Vec::new()),
        }
    }

    /// Read and parse an endpoint configuration file.
    pub fn load(path: &Path) -> Result<Vec<Endpoint>> {
        let content = fs::read_to_string(path)?;
        let endpoints = Self::parse(&content)?;
        log::debug!("Loaded {} endpoints from {:?}", endpoints.len(), path);
        Ok(endpoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_parse_endpoints() {
        let json = r#"[
            {"method": "POST", "path": "/api/users", "rules": ["$ctx == 'json_obj' $key == 'role' : block", "pass"]},
            {"method": "*", "path": "/", "rules": []}
        ]"#;

        let endpoints = EndpointConverter::parse(json).unwrap();

        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].method, "POST");
        assert_eq!(endpoints[0].path, "/api/users");
        assert_eq!(endpoints[0].rules.len(), 2);
        assert_eq!(endpoints[1].label(), "* /");
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(EndpointConverter::parse("").unwrap().is_empty());
        assert!(EndpointConverter::parse(" \n\t").unwrap().is_empty());
        assert!(EndpointConverter::parse("null").unwrap().is_empty());
        assert!(EndpointConverter::parse("[]").unwrap().is_empty());
    }

    #[test]
    fn test_missing_and_null_fields_default() {
        let endpoints =
            EndpointConverter::parse(r#"[{"path": "/x"}, {"method": null, "path": "/y", "rules": null}]"#)
                .unwrap();
        assert_eq!(endpoints[0], Endpoint::new("", "/x", vec![]));
        assert_eq!(endpoints[1], Endpoint::new("", "/y", vec![]));
    }

    #[test]
    fn test_only_first_value_is_read() {
        let endpoints = EndpointConverter::parse(r#"[{"path": "/a"}] garbage"#).unwrap();
        assert_eq!(endpoints.len(), 1);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            EndpointConverter::parse(r#"[{"path": "/a""#),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            EndpointConverter::parse(r#"{"path": "/a"}"#),
            Err(Error::Json(_))
        ));
    }
}
