// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Error types for the zero plugin

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ZeroError>;

/// Fatal configuration errors. Recoverable problems (unknown or protected
/// fields, both modes configured) are logged instead.
#[derive(Debug, Error)]
pub enum ZeroError {
    #[error("invalid pattern '{pattern}' for field '{field}': {source}")]
    InvalidPattern {
        field: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("JSON configuration error: {0}")]
    Json(#[from] serde_json::Error),
}
