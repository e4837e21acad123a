// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Zero Plugin - Rust Implementation
//
// Clears tag fields in media files at write time:
// - Blacklist (`fields`) or whitelist (`keep_fields`) field selection
// - Optional case-insensitive regex conditions per field
// - Mirrors zeroed fields into the library item on request

pub mod config;
pub mod error;
pub mod fields;
pub mod filter;
pub mod patterns;
pub mod plugin;

pub use config::{Mode, StrSeq, ZeroConfig};
pub use error::{Result, ZeroError};
pub use fields::{is_protected, FieldRegistry, PROTECTED_FIELDS};
pub use filter::{apply_filter, value_text, FieldSink, FieldStore, TagValue};
pub use patterns::{build_pattern_table, PatternSet, PatternTable};
pub use plugin::{AsIsGuard, ZeroPlugin, ZeroPluginRust};
