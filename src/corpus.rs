//! Corpus file loading
//!
//! Accepts either a JSON array of objects or JSON Lines. Each object needs an
//! `id`, may carry a `tags` array, and every other key becomes a free-text
//! field. Non-string values are stringified; `null` fields are skipped.

use crate::domain::{Document, DomainTag, TagDomain};
use crate::error::RankError;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, BTreeSet};

/// One corpus entry before its tags are resolved against a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusRecord {
    pub id: String,
    pub tags: Vec<String>,
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    id: JsonValue,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(flatten)]
    fields: BTreeMap<String, JsonValue>,
}

pub fn parse_records(input: &str) -> Result<Vec<CorpusRecord>, RankError> {
    let trimmed = input.trim_start();
    let values: Vec<JsonValue> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)
            .map_err(|e| RankError::CorpusParse { record: 0, message: e.to_string() })?
    } else {
        input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                serde_json::from_str(line)
                    .map_err(|e| RankError::CorpusParse { record: n + 1, message: e.to_string() })
            })
            .collect::<Result<_, _>>()?
    };

    values
        .into_iter()
        .enumerate()
        .map(|(n, value)| record_from_value(n + 1, value))
        .collect()
}

fn record_from_value(record: usize, value: JsonValue) -> Result<CorpusRecord, RankError> {
    let raw: RawRecord = serde_json::from_value(value)
        .map_err(|e| RankError::CorpusParse { record, message: e.to_string() })?;

    let id = match raw.id {
        JsonValue::String(s) if !s.is_empty() => s,
        JsonValue::Number(n) => n.to_string(),
        _ => {
            return Err(RankError::CorpusParse {
                record,
                message: "id must be a non-empty string or a number".to_string(),
            })
        }
    };

    let fields = raw
        .fields
        .into_iter()
        .filter_map(|(name, value)| field_string(value).map(|text| (name, text)))
        .collect();

    Ok(CorpusRecord { id, tags: raw.tags, fields })
}

fn field_string(value: JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Open domain built from every tag seen in `records`, labelled by key.
pub fn infer_domain(records: &[CorpusRecord]) -> TagDomain {
    let keys: BTreeSet<&str> =
        records.iter().flat_map(|r| r.tags.iter().map(String::as_str)).collect();
    TagDomain::from_keys(keys)
}

pub fn into_documents(
    records: Vec<CorpusRecord>,
    domain: &TagDomain,
) -> Result<Vec<Document<DomainTag>>, RankError> {
    records
        .into_iter()
        .map(|record| {
            let tags = domain.resolve_all(&record.tags)?;
            Ok(Document {
                id: record.id,
                tags,
                fields: record.fields,
                terms: Vec::new(),
                scores: Default::default(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{infer_domain, into_documents, parse_records};
    use crate::domain::TagDomain;
    use crate::error::RankError;
    use std::collections::BTreeMap;

    #[test]
    fn parses_json_array_with_mixed_field_types() {
        let input = r#"[
            {"id": "a", "tags": ["x"], "title": "Apple", "rank": 3, "note": null},
            {"id": 7, "title": "Banana"}
        ]"#;
        let records = parse_records(input).expect("parse");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields.get("rank").map(String::as_str), Some("3"));
        assert!(!records[0].fields.contains_key("note"));
        assert!(!records[0].fields.contains_key("tags"));
        assert_eq!(records[1].id, "7");
        assert!(records[1].tags.is_empty());
    }

    #[test]
    fn parses_json_lines_and_reports_bad_line() {
        let input = "{\"id\": \"a\", \"title\": \"Apple\"}\n\n{\"id\": \"b\"}\n";
        assert_eq!(parse_records(input).expect("parse").len(), 2);

        let broken = "{\"id\": \"a\"}\n{oops\n";
        match parse_records(broken) {
            Err(RankError::CorpusParse { record, .. }) => assert_eq!(record, 2),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_id_is_rejected() {
        assert!(matches!(
            parse_records(r#"[{"title": "no id"}]"#),
            Err(RankError::CorpusParse { record: 1, .. })
        ));
    }

    #[test]
    fn tags_resolve_against_domain() {
        let records = parse_records(r#"[{"id": "a", "tags": ["x", "y"]}]"#).expect("parse");
        let inferred = infer_domain(&records);
        assert_eq!(inferred.len(), 2);
        let docs = into_documents(records.clone(), &inferred).expect("resolved");
        assert_eq!(docs[0].tags.len(), 2);

        let closed =
            TagDomain::new(BTreeMap::from([("x".to_string(), "Fresh Produce".to_string())]));
        match into_documents(records, &closed) {
            Err(RankError::UnknownTag { tag }) => assert_eq!(tag, "y"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
