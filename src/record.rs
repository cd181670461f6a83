use std::sync::LazyLock;

use async_graphql::SimpleObject;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{domain::Domain, error::AnalysisError};

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").expect("valid fence pattern")
});

/// Structured trend analysis for one domain, as produced by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
pub(crate) struct AnalysisRecord {
    #[serde(default)]
    pub(crate) domain: String,
    #[serde(default)]
    pub(crate) key_technologies: Vec<String>,
    #[serde(default, deserialize_with = "text_or_list")]
    pub(crate) market_potential: String,
    #[serde(default, deserialize_with = "text_or_list")]
    pub(crate) investment_trends: String,
    #[serde(default)]
    pub(crate) emerging_opportunities: Vec<String>,
    #[serde(default)]
    pub(crate) challenges: Vec<String>,
}

/// Parses raw model output into a record for `domain`.
///
/// The model is asked for bare JSON, but output wrapped in a Markdown code
/// fence or surrounded by prose is accepted as long as it contains exactly
/// one outermost JSON object.
pub(crate) fn parse_record(domain: Domain, raw: &str) -> Result<AnalysisRecord, AnalysisError> {
    let candidate = extract_json(raw);
    let value: Value = serde_json::from_str(candidate)
        .map_err(|e| AnalysisError::Parse(format!("invalid JSON: {e}")))?;
    if !value.is_object() {
        return Err(AnalysisError::Parse(
            "expected a JSON object at the top level".to_string(),
        ));
    }
    let mut record: AnalysisRecord = serde_json::from_value(value)
        .map_err(|e| AnalysisError::Parse(format!("unexpected shape: {e}")))?;
    if record.domain.trim().is_empty() {
        record.domain = domain.label().to_string();
    }
    Ok(record)
}

fn extract_json(raw: &str) -> &str {
    let body = CODE_FENCE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map_or(raw, |m| m.as_str())
        .trim();

    match (body.find('{'), body.rfind('}')) {
        (Some(begin), Some(end)) if begin < end => &body[begin..=end],
        _ => body,
    }
}

// Models sometimes answer a prose field with a list of bullet points.
fn text_or_list<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Array(items) => Ok(items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")),
        other => Ok(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETE: &str = r#"{
        "domain": "FinTech",
        "key_technologies": ["Open banking", "Embedded payments"],
        "market_potential": "Large and growing",
        "investment_trends": "Consolidation in late stage rounds",
        "emerging_opportunities": ["SME lending"],
        "challenges": ["Regulation"]
    }"#;

    #[test]
    fn bare_json_is_parsed() {
        let record = parse_record(Domain::FinTech, COMPLETE).unwrap();
        assert_eq!(record.domain, "FinTech");
        assert_eq!(record.key_technologies.len(), 2);
        assert_eq!(record.challenges, vec!["Regulation"]);
    }

    #[test]
    fn fenced_json_with_prose_is_parsed() {
        let raw = format!("Here is the analysis you asked for:\n```json\n{COMPLETE}\n```\nHope it helps.");
        let record = parse_record(Domain::FinTech, &raw).unwrap();
        assert_eq!(record.market_potential, "Large and growing");
    }

    #[test]
    fn fence_is_stripped_on_every_call() {
        let fenced = format!("```JSON\n{COMPLETE}\n```");
        assert_eq!(extract_json(&fenced), COMPLETE.trim());
        let unlabelled = format!("```\n{COMPLETE}\n```");
        assert_eq!(extract_json(&unlabelled), COMPLETE.trim());
        assert_eq!(extract_json("no json here"), "no json here");
    }

    #[test]
    fn missing_fields_default_and_domain_is_filled_in() {
        let record =
            parse_record(Domain::EdTech, r#"{"key_technologies": ["AI tutors"]}"#).unwrap();
        assert_eq!(record.domain, "EdTech");
        assert_eq!(record.key_technologies, vec!["AI tutors"]);
        assert!(record.market_potential.is_empty());
        assert!(record.challenges.is_empty());
    }

    #[test]
    fn list_valued_prose_field_is_joined() {
        let record = parse_record(
            Domain::Robotics,
            r#"{"market_potential": ["Warehouses", "Elder care"]}"#,
        )
        .unwrap();
        assert_eq!(record.market_potential, "Warehouses\nElder care");
    }

    #[test]
    fn non_json_is_parse_error() {
        let err = parse_record(Domain::FinTech, "I cannot help with that.").unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)));
    }

    #[test]
    fn top_level_array_is_parse_error() {
        let err = parse_record(Domain::FinTech, r#"["FinTech", []]"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)));
    }

    #[test]
    fn wrong_field_type_is_parse_error() {
        let err =
            parse_record(Domain::FinTech, r#"{"key_technologies": "just one"}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)));
    }
}
