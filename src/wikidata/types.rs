//! Wikidata response types
//!
//! SPARQL JSON results (`application/sparql-results+json`) and the
//! `wbsearchentities` search API.

use std::collections::HashMap;

use serde::Deserialize;

/// Top-level SPARQL SELECT response
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResponse {
    pub results: SparqlResults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

/// One result row, keyed by variable name
pub type Binding = HashMap<String, BindingValue>;

#[derive(Debug, Clone, Deserialize)]
pub struct BindingValue {
    #[serde(rename = "type")]
    pub value_type: String,
    pub value: String,
    #[serde(rename = "xml:lang", default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub datatype: Option<String>,
}

/// Response of `action=wbsearchentities`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub search: Vec<SearchEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchEntry {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// String value of a variable, if bound
pub fn value<'a>(binding: &'a Binding, var: &str) -> Option<&'a str> {
    binding.get(var).map(|v| v.value.as_str())
}

/// Entity id from a variable bound to an entity URI
pub fn entity_id(binding: &Binding, var: &str) -> Option<String> {
    value(binding, var).map(extract_id_from_uri)
}

/// Extract the id from a URI like "http://www.wikidata.org/entity/Q7156"
pub fn extract_id_from_uri(uri: &str) -> String {
    uri.rsplit('/').next().unwrap_or(uri).to_string()
}

/// Year of an `xsd:dateTime` literal such as "2004-10-16T00:00:00Z"
pub fn year(binding: &Binding, var: &str) -> Option<i32> {
    value(binding, var).and_then(parse_year)
}

pub fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i32>().ok().map(|y| sign * y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sparql_response() {
        let json = r#"{
            "head": {"vars": ["player", "playerLabel"]},
            "results": {"bindings": [
                {
                    "player": {"type": "uri", "value": "http://www.wikidata.org/entity/Q615"},
                    "playerLabel": {"xml:lang": "en", "type": "literal", "value": "Lionel Messi"}
                }
            ]}
        }"#;
        let parsed: SparqlResponse = serde_json::from_str(json).unwrap();
        let row = &parsed.results.bindings[0];
        assert_eq!(entity_id(row, "player").as_deref(), Some("Q615"));
        assert_eq!(value(row, "playerLabel"), Some("Lionel Messi"));
        assert_eq!(row["playerLabel"].lang.as_deref(), Some("en"));
        assert!(value(row, "dob").is_none());
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2004-10-16T00:00:00Z"), Some(2004));
        assert_eq!(parse_year("+1987-06-24T00:00:00Z"), Some(1987));
        assert_eq!(parse_year("not a date"), None);
    }

    #[test]
    fn test_extract_id_from_uri() {
        assert_eq!(extract_id_from_uri("http://www.wikidata.org/entity/Q7156"), "Q7156");
        assert_eq!(extract_id_from_uri("Q7156"), "Q7156");
    }
}
