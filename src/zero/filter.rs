// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Write-time filter: nulls every tag whose value matches its pattern set

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use tracing::{debug, warn};

use super::patterns::PatternTable;

/// Tag value as seen by Rust callers. `Value::Null` is the zeroed state.
pub type TagValue = Value;

/// Write side of a tag set or item record
pub trait FieldSink {
    type Error;

    /// Replace the field's value with the null sentinel
    fn clear_field(&mut self, field: &str) -> Result<(), Self::Error>;
}

/// Named-field access to a tag set
pub trait FieldStore: FieldSink {
    /// Textual form of the field's value, `None` when the field is absent
    fn field_text(&self, field: &str) -> Result<Option<String>, Self::Error>;
}

impl FieldSink for BTreeMap<String, TagValue> {
    type Error = Infallible;

    fn clear_field(&mut self, field: &str) -> Result<(), Infallible> {
        self.insert(field.to_string(), Value::Null);
        Ok(())
    }
}

impl FieldStore for BTreeMap<String, TagValue> {
    fn field_text(&self, field: &str) -> Result<Option<String>, Infallible> {
        Ok(self.get(field).map(value_text))
    }
}

impl FieldSink for HashMap<String, TagValue> {
    type Error = Infallible;

    fn clear_field(&mut self, field: &str) -> Result<(), Infallible> {
        self.insert(field.to_string(), Value::Null);
        Ok(())
    }
}

impl FieldStore for HashMap<String, TagValue> {
    fn field_text(&self, field: &str) -> Result<Option<String>, Infallible> {
        Ok(self.get(field).map(value_text))
    }
}

/// Stringify any tag value the way the host displays it, so patterns see
/// the same text regardless of the value's type.
pub fn value_text(value: &TagValue) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => display(other),
    }
}

fn display(value: &TagValue) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(display).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let items: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("'{}': {}", k, display(v)))
                .collect();
            format!("{{{}}}", items.join(", "))
        }
    }
}

/// Zero the fields of `tags` selected by `table`
///
/// A field missing from `tags` only matches an unconditional pattern set,
/// and is then written as null. With `update_database` the same fields are
/// nulled on `item`. Returns the zeroed field names in table order.
pub fn apply_filter<T, R>(
    tags: &mut T,
    table: &PatternTable,
    update_database: bool,
    item: &mut R,
) -> Result<Vec<String>, T::Error>
where
    T: FieldStore,
    R: FieldSink<Error = T::Error>,
{
    if table.is_empty() {
        warn!(target: "zero", "no fields, nothing to do");
        return Ok(Vec::new());
    }

    let mut zeroed = Vec::new();
    for (field, patterns) in table {
        let (value, matched) = match tags.field_text(field)? {
            Some(text) => {
                let matched = patterns.matches(&text);
                (text, matched)
            }
            None => (String::new(), patterns.is_unconditional()),
        };

        if !matched {
            continue;
        }

        debug!(target: "zero", "{}: {} -> None", field, value);
        tags.clear_field(field)?;
        if update_database {
            item.clear_field(field)?;
        }
        zeroed.push(field.clone());
    }

    Ok(zeroed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zero::config::ZeroConfig;
    use crate::zero::fields::FieldRegistry;
    use crate::zero::patterns::build_pattern_table;
    use serde_json::json;

    type TagMap = BTreeMap<String, TagValue>;

    fn table(config: &str) -> PatternTable {
        let registry = FieldRegistry::new(["title", "genre", "comments", "year", "artists"]);
        build_pattern_table(&ZeroConfig::from_json(config).unwrap(), &registry).unwrap()
    }

    fn tag_map(value: Value) -> TagMap {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!("Rock")), "Rock");
        assert_eq!(value_text(&json!(1999)), "1999");
        assert_eq!(value_text(&json!(true)), "True");
        assert_eq!(value_text(&json!(null)), "None");
        assert_eq!(value_text(&json!(["a", 1])), "['a', 1]");
        assert_eq!(value_text(&json!({"k": "v"})), "{'k': 'v'}");
    }

    #[test]
    fn test_empty_table_leaves_tags_alone() {
        let table = PatternTable::default();
        let mut tags = tag_map(json!({"genre": "Rock"}));
        let mut item = tags.clone();

        let zeroed = apply_filter(&mut tags, &table, true, &mut item).unwrap();

        assert!(zeroed.is_empty());
        assert_eq!(tags["genre"], json!("Rock"));
        assert_eq!(item["genre"], json!("Rock"));
    }

    #[test]
    fn test_absent_field_zeroed_only_when_unconditional() {
        let table = table(r#"{"fields": ["comments", "genre"], "genre": ["rock"]}"#);
        let mut tags = tag_map(json!({"title": "Song"}));
        let mut item = TagMap::new();

        let zeroed = apply_filter(&mut tags, &table, false, &mut item).unwrap();

        assert_eq!(zeroed, vec!["comments"]);
        assert_eq!(tags["comments"], Value::Null);
        assert!(!tags.contains_key("genre"));
        assert_eq!(tags["title"], json!("Song"));
    }

    #[test]
    fn test_numeric_value_stringified() {
        let table = table(r#"{"fields": ["year"], "year": ["^19"]}"#);
        let mut tags = tag_map(json!({"year": 1999}));
        let mut item = TagMap::new();

        apply_filter(&mut tags, &table, false, &mut item).unwrap();
        assert_eq!(tags["year"], Value::Null);

        let mut tags = tag_map(json!({"year": 2004}));
        apply_filter(&mut tags, &table, false, &mut item).unwrap();
        assert_eq!(tags["year"], json!(2004));
    }

    #[test]
    fn test_list_value_stringified() {
        let table = table(r#"{"fields": ["artists"], "artists": ["'various'"]}"#);
        let mut tags = tag_map(json!({"artists": ["Various", "Someone"]}));
        let mut item = TagMap::new();

        apply_filter(&mut tags, &table, false, &mut item).unwrap();
        assert_eq!(tags["artists"], Value::Null);
    }

    #[test]
    fn test_update_database_mirrors_into_item() {
        let table = table(r#"{"fields": ["genre"]}"#);
        let mut tags = tag_map(json!({"genre": "Rock"}));
        let mut item = tags.clone();

        apply_filter(&mut tags, &table, true, &mut item).unwrap();

        assert_eq!(tags["genre"], Value::Null);
        assert_eq!(item["genre"], Value::Null);
    }

    #[test]
    fn test_hash_map_store() {
        let table = table(r#"{"fields": ["genre"], "genre": ["jazz"]}"#);
        let mut tags: HashMap<String, TagValue> = HashMap::new();
        tags.insert("genre".to_string(), json!("Acid Jazz"));
        let mut item: HashMap<String, TagValue> = HashMap::new();

        let zeroed = apply_filter(&mut tags, &table, false, &mut item).unwrap();

        assert_eq!(zeroed, vec!["genre"]);
        assert_eq!(tags["genre"], Value::Null);
        assert!(item.is_empty());
    }
}
