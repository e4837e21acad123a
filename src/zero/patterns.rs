// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Field -> pattern table compilation
// Resolves blacklist/whitelist mode and compiles per-field conditions

use regex::{Regex, RegexBuilder};
use std::collections::btree_map::{self, BTreeMap};
use tracing::{error, warn};

use super::config::{Mode, ZeroConfig};
use super::error::{Result, ZeroError};
use super::fields::{is_protected, FieldRegistry};

/// Conditions under which a field is zeroed. An empty set always matches.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    /// Set that matches any value, present or not
    pub fn unconditional() -> Self {
        Self::default()
    }

    /// Compile `patterns` case-insensitively, in order
    pub fn compile<'a, I>(field: &str, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set = Self::default();
        for pattern in patterns {
            set.push(field, pattern)?;
        }
        Ok(set)
    }

    fn push(&mut self, field: &str, pattern: &str) -> Result<()> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| ZeroError::InvalidPattern {
                field: field.to_string(),
                pattern: pattern.to_string(),
                source,
            })?;
        self.patterns.push(regex);
        Ok(())
    }

    pub fn is_unconditional(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Search (not anchor) `text` against each pattern, stopping at the
    /// first hit
    pub fn matches(&self, text: &str) -> bool {
        self.is_unconditional() || self.patterns.iter().any(|regex| regex.is_match(text))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn as_strs(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Regex::as_str)
    }
}

/// Fields to zero and the conditions for each. Never holds a protected
/// field; immutable once built.
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    entries: BTreeMap<String, PatternSet>,
}

impl PatternTable {
    pub fn get(&self, field: &str) -> Option<&PatternSet> {
        self.entries.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, PatternSet> {
        self.entries.iter()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a PatternTable {
    type Item = (&'a String, &'a PatternSet);
    type IntoIter = btree_map::Iter<'a, String, PatternSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Build the pattern table from configuration
///
/// Unknown and protected field names are logged and skipped. Only a
/// pattern that fails to compile is an error.
pub fn build_pattern_table(config: &ZeroConfig, registry: &FieldRegistry) -> Result<PatternTable> {
    let mut builder = TableBuilder {
        config,
        registry,
        entries: BTreeMap::new(),
    };

    match config.mode() {
        Mode::Conflict => {
            warn!(target: "zero", "cannot blacklist and whitelist at the same time");
        }
        Mode::Blacklist => {
            for field in config.fields.iter() {
                builder.register(field)?;
            }
        }
        Mode::Whitelist => {
            for field in registry.iter() {
                if !config.keep_fields.contains(field) && !is_protected(field) {
                    builder.register(field)?;
                }
            }
        }
        Mode::Unconfigured => {}
    }

    Ok(PatternTable {
        entries: builder.entries,
    })
}

struct TableBuilder<'a> {
    config: &'a ZeroConfig,
    registry: &'a FieldRegistry,
    entries: BTreeMap<String, PatternSet>,
}

impl TableBuilder<'_> {
    fn register(&mut self, field: &str) -> Result<()> {
        if !self.registry.contains(field) {
            error!(target: "zero", "invalid field: {}", field);
            return Ok(());
        }
        if is_protected(field) {
            warn!(target: "zero", "field '{}' ignored, zeroing it would be dangerous", field);
            return Ok(());
        }

        match self.config.patterns_for(field) {
            Some(patterns) => {
                // Repeated registrations append to the existing entry
                let set = self.entries.entry(field.to_string()).or_default();
                for pattern in patterns.iter() {
                    set.push(field, pattern)?;
                }
            }
            None => {
                self.entries
                    .insert(field.to_string(), PatternSet::unconditional());
            }
        }
        Ok(())
    }
}
