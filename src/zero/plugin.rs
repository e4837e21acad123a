// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Plugin instance and PyO3 bindings for the host's event listeners

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use tracing::{debug, warn};

use super::config::ZeroConfig;
use super::error::Result;
use super::fields::FieldRegistry;
use super::filter::{apply_filter, FieldSink, FieldStore};
use super::patterns::{build_pattern_table, PatternTable};

/// Warns once per plugin instance when an import runs in as-is mode,
/// where no tags get rewritten and zeroing cannot apply.
#[derive(Debug, Default)]
pub struct AsIsGuard {
    warned: bool,
}

impl AsIsGuard {
    /// Returns true when this call emitted the warning
    pub fn observe(&mut self, is_asis: bool) -> bool {
        if !is_asis || self.warned {
            return false;
        }
        warn!(target: "zero", "cannot zero in \"as-is\" mode");
        self.warned = true;
        true
    }

    pub fn warned(&self) -> bool {
        self.warned
    }
}

/// Zero plugin state: the compiled table plus per-instance flags
#[derive(Debug)]
pub struct ZeroPlugin {
    config: ZeroConfig,
    table: PatternTable,
    as_is: AsIsGuard,
}

impl ZeroPlugin {
    pub fn new(config: ZeroConfig, registry: &FieldRegistry) -> Result<Self> {
        let table = build_pattern_table(&config, registry)?;
        Ok(Self {
            config,
            table,
            as_is: AsIsGuard::default(),
        })
    }

    pub fn config(&self) -> &ZeroConfig {
        &self.config
    }

    pub fn table(&self) -> &PatternTable {
        &self.table
    }

    /// Handle a write event for one item
    pub fn write_event<T, R>(
        &self,
        tags: &mut T,
        item: &mut R,
    ) -> std::result::Result<Vec<String>, T::Error>
    where
        T: FieldStore,
        R: FieldSink<Error = T::Error>,
    {
        apply_filter(tags, &self.table, self.config.update_database, item)
    }

    /// Handle an import choice; returns true when the as-is warning fired
    pub fn import_task_choice_event(&mut self, is_asis: bool) -> bool {
        self.as_is.observe(is_asis)
    }

    pub fn warned(&self) -> bool {
        self.as_is.warned()
    }
}

/// Zero plugin exposed to Python
///
/// # Example (Python)
/// ```python
/// from zero_rust import ZeroPluginRust
///
/// plugin = ZeroPluginRust({"fields": ["genre"], "genre": ["^rock$"]})
/// tags = {"genre": "Rock", "title": "Song"}
/// plugin.write_event(item, path, tags)  # ["genre"]
/// print(tags)  # {"genre": None, "title": "Song"}
/// ```
#[pyclass]
pub struct ZeroPluginRust {
    inner: ZeroPlugin,
}

#[pymethods]
impl ZeroPluginRust {
    /// Create a new zero plugin
    ///
    /// # Arguments
    /// * `config_dict` - Plugin configuration
    /// * `valid_fields` - Field names the media layer can write; defaults to
    ///   the standard media-file fields
    ///
    /// # Configuration Keys
    /// * `fields` (list[str] | str): Fields to zero
    /// * `keep_fields` (list[str] | str): Fields to keep, zeroing all others
    /// * `update_database` (bool): Also null the fields on the library item
    /// * `<field>` (list[str] | str): Regex conditions for that field
    #[new]
    #[pyo3(signature = (config_dict, valid_fields=None))]
    pub fn new(
        config_dict: &Bound<'_, PyDict>,
        valid_fields: Option<Vec<String>>,
    ) -> PyResult<Self> {
        let config = ZeroConfig::from_py_dict(config_dict).map_err(|e| {
            PyErr::new::<PyValueError, _>(format!("Invalid config: {}", e))
        })?;

        let registry = match valid_fields {
            Some(fields) => FieldRegistry::new(fields),
            None => FieldRegistry::media_file(),
        };

        let inner = ZeroPlugin::new(config, &registry).map_err(|e| {
            PyErr::new::<PyValueError, _>(format!("Pattern compilation failed: {}", e))
        })?;

        Ok(Self { inner })
    }

    /// Listener for the `write` event
    ///
    /// Sets matching entries of `tags` to `None` in place, and on `item`
    /// too when `update_database` is enabled.
    ///
    /// # Returns
    /// Names of the zeroed fields
    pub fn write_event(
        &self,
        item: &Bound<'_, PyAny>,
        path: &Bound<'_, PyAny>,
        tags: &Bound<'_, PyDict>,
    ) -> PyResult<Vec<String>> {
        let path = path.str()?;
        debug!(target: "zero", "write event for {}", path.to_string_lossy());
        self.inner.write_event(&mut PyTags(tags), &mut PyItem(item))
    }

    /// Listener for the `import_task_choice` event
    ///
    /// # Returns
    /// True when this call emitted the as-is warning
    pub fn import_task_choice_event(
        &mut self,
        session: &Bound<'_, PyAny>,
        task: &Bound<'_, PyAny>,
    ) -> PyResult<bool> {
        // Listeners are called with keyword arguments, so the name stays
        let _ = session;
        let is_asis = is_asis_choice(task)?;
        Ok(self.inner.import_task_choice_event(is_asis))
    }

    /// Fields the plugin zeroes, in table order
    #[getter]
    pub fn fields(&self) -> Vec<String> {
        self.inner.table().fields().map(str::to_string).collect()
    }

    /// Pattern strings configured for `field`, or None if it is not zeroed
    pub fn patterns(&self, field: &str) -> Option<Vec<String>> {
        self.inner
            .table()
            .get(field)
            .map(|set| set.as_strs().map(str::to_string).collect())
    }

    #[getter]
    pub fn update_database(&self) -> bool {
        self.inner.config().update_database
    }

    #[getter]
    pub fn warned(&self) -> bool {
        self.inner.warned()
    }
}

/// Check `task.choice_flag` for the as-is import action
fn is_asis_choice(task: &Bound<'_, PyAny>) -> PyResult<bool> {
    let choice = task.getattr("choice_flag")?;
    if choice.is_none() {
        return Ok(false);
    }

    // Enum members carry a `name`; fall back to the display form
    if let Ok(name) = choice.getattr("name") {
        if let Ok(name) = name.extract::<String>() {
            return Ok(name == "ASIS");
        }
    }
    let text = choice.str()?.to_string_lossy().into_owned();
    Ok(text == "ASIS" || text.ends_with(".ASIS"))
}

// Tag dict handed over by the write event
struct PyTags<'a, 'py>(&'a Bound<'py, PyDict>);

impl FieldSink for PyTags<'_, '_> {
    type Error = PyErr;

    fn clear_field(&mut self, field: &str) -> PyResult<()> {
        self.0.set_item(field, self.0.py().None())
    }
}

impl FieldStore for PyTags<'_, '_> {
    fn field_text(&self, field: &str) -> PyResult<Option<String>> {
        match self.0.get_item(field)? {
            Some(value) => Ok(Some(value.str()?.to_string_lossy().into_owned())),
            None => Ok(None),
        }
    }
}

// Library item, assigned like a mapping
struct PyItem<'a, 'py>(&'a Bound<'py, PyAny>);

impl FieldSink for PyItem<'_, '_> {
    type Error = PyErr;

    fn clear_field(&mut self, field: &str) -> PyResult<()> {
        self.0.set_item(field, self.0.py().None())
    }
}
