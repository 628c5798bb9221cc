//! CID to Unicode maps built from Unicode CMap resources.

use std::collections::HashMap;

/// Forward CID → Unicode entries as produced by a resource loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CidUnicodeTable {
    /// CMap name declared by the resource, if any.
    pub name: Option<String>,
    /// `(cid, text)` pairs in declaration order. Text is one scalar value or
    /// a short sequence for characters that need several.
    pub entries: Vec<(u32, String)>,
}

impl CidUnicodeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the CMap name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a `(cid, text)` entry.
    pub fn push(&mut self, cid: u32, text: impl Into<String>) {
        self.entries.push((cid, text.into()));
    }
}

/// Immutable mapping from CID to Unicode text.
///
/// A CID declared more than once keeps its last declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct CidUnicodeMap {
    name: Option<String>,
    forward: HashMap<u32, String>,
}

impl CidUnicodeMap {
    /// Build the map from a loader table.
    pub fn from_table(table: CidUnicodeTable) -> Self {
        Self {
            name: table.name,
            forward: table.entries.into_iter().collect(),
        }
    }

    /// Unicode text for `cid`, if mapped.
    pub fn unicode_for(&self, cid: u32) -> Option<&str> {
        self.forward.get(&cid).map(|s| s.as_str())
    }

    /// First scalar value of the text for `cid`.
    pub fn char_for(&self, cid: u32) -> Option<char> {
        self.unicode_for(cid).and_then(|s| s.chars().next())
    }

    /// CMap name declared by the resource.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of mapped CIDs.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Returns true if no CID is mapped.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

impl From<CidUnicodeTable> for CidUnicodeMap {
    fn from(table: CidUnicodeTable) -> Self {
        CidUnicodeMap::from_table(table)
    }
}
