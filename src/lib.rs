// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Rust implementation of the zero plugin
// Built with PyO3 so the host can register it as a listener

use pyo3::prelude::*;

pub mod zero;

/// Python module: zero_rust
///
/// Clears tag fields in media files when they are written.
///
/// # Examples
///
/// ```python
/// from zero_rust import ZeroPluginRust
///
/// # Zero "genre" only when it says rock; zero "comments" always
/// config = {
///     "fields": ["genre", "comments"],
///     "genre": ["^rock$"],
///     "update_database": False,
/// }
/// plugin = ZeroPluginRust(config)
///
/// tags = {"genre": "Rock", "comments": "ripped by me", "title": "Song"}
/// plugin.write_event(item, path, tags)
/// print(tags)  # {"genre": None, "comments": None, "title": "Song"}
/// ```
#[pymodule]
fn zero_rust(m: &Bound<'_, pyo3::types::PyModule>) -> PyResult<()> {
    m.add_class::<zero::ZeroPluginRust>()?;

    // Module metadata
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("__doc__", "Clears tag fields in media files at write time")?;

    Ok(())
}
