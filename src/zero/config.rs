// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Configuration types for the zero plugin

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::Result;

/// A sequence of strings, written either as a list or as a single
/// whitespace-separated string (`"genre comments"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawStrSeq", into = "Vec<String>")]
pub struct StrSeq(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStrSeq {
    Words(String),
    List(Vec<String>),
}

impl From<RawStrSeq> for StrSeq {
    fn from(raw: RawStrSeq) -> Self {
        match raw {
            RawStrSeq::Words(words) => Self::from_words(&words),
            RawStrSeq::List(items) => Self(items),
        }
    }
}

impl From<StrSeq> for Vec<String> {
    fn from(seq: StrSeq) -> Self {
        seq.0
    }
}

impl<S: Into<String>> FromIterator<S> for StrSeq {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl StrSeq {
    /// Split a string on whitespace
    pub fn from_words(words: &str) -> Self {
        words.split_whitespace().collect()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, item: &str) -> bool {
        self.0.iter().any(|s| s == item)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Which field-selection mode a configuration resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Only `fields` is set: zero the listed fields
    Blacklist,
    /// Only `keep_fields` is set: zero everything except the listed fields
    Whitelist,
    /// Both lists are set, which is rejected
    Conflict,
    /// Neither list is set
    Unconfigured,
}

/// Configuration for the zero plugin
///
/// Per-field pattern lists sit next to the mode keys:
///
/// ```json
/// {"fields": ["genre", "comments"], "genre": ["^rock$", "metal"]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZeroConfig {
    /// Blacklist: fields to zero
    #[serde(default)]
    pub fields: StrSeq,

    /// Whitelist: fields to keep, everything else is zeroed
    #[serde(default)]
    pub keep_fields: StrSeq,

    /// Also null the fields on the library item, not just in the file tags
    #[serde(default)]
    pub update_database: bool,

    // Regex conditions keyed by field name
    #[serde(flatten)]
    pub field_patterns: BTreeMap<String, StrSeq>,
}

impl ZeroConfig {
    /// Parse configuration from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn mode(&self) -> Mode {
        match (self.fields.is_empty(), self.keep_fields.is_empty()) {
            (false, false) => Mode::Conflict,
            (false, true) => Mode::Blacklist,
            (true, false) => Mode::Whitelist,
            (true, true) => Mode::Unconfigured,
        }
    }

    /// Pattern strings configured for `field`. `None` means the key is
    /// missing entirely, which differs from an empty list only in how the
    /// table entry is created.
    pub fn patterns_for(&self, field: &str) -> Option<&StrSeq> {
        self.field_patterns.get(field)
    }

    /// Extract configuration from Python dict
    pub fn from_py_dict(dict: &Bound<'_, PyDict>) -> PyResult<Self> {
        let mut config = Self::default();

        for (key, value) in dict.iter() {
            let key: String = key.extract()?;
            match key.as_str() {
                "fields" => config.fields = extract_str_seq(&key, &value)?,
                "keep_fields" => config.keep_fields = extract_str_seq(&key, &value)?,
                "update_database" => config.update_database = value.extract()?,
                _ => {
                    let patterns = extract_str_seq(&key, &value)?;
                    config.field_patterns.insert(key, patterns);
                }
            }
        }

        Ok(config)
    }
}

fn extract_str_seq(key: &str, value: &Bound<'_, PyAny>) -> PyResult<StrSeq> {
    if let Ok(words) = value.extract::<String>() {
        return Ok(StrSeq::from_words(&words));
    }
    value
        .extract::<Vec<String>>()
        .map(|items| items.into_iter().collect())
        .map_err(|_| {
            PyValueError::new_err(format!(
                "'{}' must be a string or a list of strings",
                key
            ))
        })
}
