//! In-memory resource loader.
//!
//! Serves tables and CMap programs registered up front. Useful for
//! embedding a fixed set of resources in a binary and for tests, where the
//! per-name load counter shows how often the cache went to the loader.

use std::collections::HashMap;

use cidmap_core::{CidCodeTable, CidUnicodeTable};
use parking_lot::Mutex;

use crate::cmap::{UnicodeForm, load_program_chain};
use crate::error::LoaderError;
use crate::loader::ResourceLoader;
use crate::options::LoaderOptions;

/// Loader backed by tables and program text held in memory.
///
/// Prebuilt tables take precedence over programs of the same name.
#[derive(Debug, Default)]
pub struct MemoryResourceLoader {
    code_tables: HashMap<String, CidCodeTable>,
    unicode_tables: HashMap<String, CidUnicodeTable>,
    programs: HashMap<String, Vec<u8>>,
    options: LoaderOptions,
    loads: Mutex<HashMap<String, usize>>,
}

impl MemoryResourceLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `options` when parsing registered programs.
    pub fn with_options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    /// Register a CID → code table under `name`.
    pub fn with_code_table(mut self, name: impl Into<String>, table: CidCodeTable) -> Self {
        self.code_tables.insert(name.into(), table);
        self
    }

    /// Register a CID → Unicode table under `name`.
    pub fn with_unicode_table(mut self, name: impl Into<String>, table: CidUnicodeTable) -> Self {
        self.unicode_tables.insert(name.into(), table);
        self
    }

    /// Register CMap program text under `name`. It is parsed on every load.
    pub fn with_program(mut self, name: impl Into<String>, program: impl Into<Vec<u8>>) -> Self {
        self.programs.insert(name.into(), program.into());
        self
    }

    /// How many times either load method was called for `name`.
    pub fn load_count(&self, name: &str) -> usize {
        self.loads.lock().get(name).copied().unwrap_or(0)
    }

    /// Total number of load calls.
    pub fn total_loads(&self) -> usize {
        self.loads.lock().values().sum()
    }

    fn record_load(&self, name: &str) {
        *self.loads.lock().entry(name.to_string()).or_insert(0) += 1;
    }

    fn program_bytes(&self, name: &str) -> Result<Vec<u8>, LoaderError> {
        self.programs
            .get(name)
            .cloned()
            .ok_or_else(|| LoaderError::NotFound(name.to_string()))
    }
}

impl ResourceLoader for MemoryResourceLoader {
    fn load_cid_to_code(&self, name: &str) -> Result<CidCodeTable, LoaderError> {
        self.record_load(name);
        if let Some(table) = self.code_tables.get(name) {
            return Ok(table.clone());
        }
        load_program_chain(name, &self.options, |resource| self.program_bytes(resource))?
            .into_code_table()
            .map_err(|e| e.in_resource(name))
    }

    fn load_cid_to_unicode(&self, name: &str) -> Result<CidUnicodeTable, LoaderError> {
        self.record_load(name);
        if let Some(table) = self.unicode_tables.get(name) {
            return Ok(table.clone());
        }
        let program =
            load_program_chain(name, &self.options, |resource| self.program_bytes(resource))?;
        Ok(program.into_unicode_table(UnicodeForm::for_cmap_name(name)))
    }
}
