//! CID to byte-code maps for one character collection.
//!
//! A [`CidCodeTable`] is what a resource loader hands over: the forward
//! entries in the order the resource declared them, plus the collection's
//! [`CidSystemInfo`]. [`CidCodeMap`] is the immutable, shareable map built
//! from it. Its reverse code index (integer code → CID) is derived on first
//! use and then kept for the life of the map.

use std::sync::OnceLock;

use indexmap::IndexMap;

use crate::byte_code::ByteCode;
use crate::sparse_index::SparseIntIndex;
use crate::system_info::{CidSystemInfo, WritingMode};

/// Forward CID → code entries as produced by a resource loader.
#[derive(Debug, Clone, PartialEq)]
pub struct CidCodeTable {
    /// CMap name declared by the resource, if any.
    pub name: Option<String>,
    /// Collection this table belongs to.
    pub system_info: CidSystemInfo,
    /// Writing mode declared by the resource.
    pub writing_mode: WritingMode,
    /// `(cid, code)` pairs in declaration order.
    pub entries: Vec<(u32, ByteCode)>,
}

impl CidCodeTable {
    /// Create an empty table for a collection.
    pub fn new(system_info: CidSystemInfo) -> Self {
        Self {
            name: None,
            system_info,
            writing_mode: WritingMode::Horizontal,
            entries: Vec::new(),
        }
    }

    /// Set the CMap name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the writing mode.
    pub fn with_writing_mode(mut self, writing_mode: WritingMode) -> Self {
        self.writing_mode = writing_mode;
        self
    }

    /// Append a `(cid, code)` entry.
    pub fn push(&mut self, cid: u32, code: ByteCode) {
        self.entries.push((cid, code));
    }
}

/// Immutable mapping from CID to the byte code that selects it.
///
/// A CID declared more than once keeps the code of its last declaration.
#[derive(Debug)]
pub struct CidCodeMap {
    name: Option<String>,
    system_info: CidSystemInfo,
    writing_mode: WritingMode,
    forward: IndexMap<u32, ByteCode>,
    reverse: OnceLock<SparseIntIndex>,
}

impl CidCodeMap {
    /// Build the map from a loader table.
    pub fn from_table(table: CidCodeTable) -> Self {
        let mut forward = IndexMap::with_capacity(table.entries.len());
        for (cid, code) in table.entries {
            forward.insert(cid, code);
        }
        Self {
            name: table.name,
            system_info: table.system_info,
            writing_mode: table.writing_mode,
            forward,
            reverse: OnceLock::new(),
        }
    }

    /// The byte code for `cid`, if mapped.
    pub fn byte_code_for(&self, cid: u32) -> Option<ByteCode> {
        self.forward.get(&cid).copied()
    }

    /// The integer code for `cid`, if mapped.
    pub fn code_for(&self, cid: u32) -> Option<u32> {
        self.byte_code_for(cid).map(|code| code.to_code())
    }

    /// The CID selected by integer `code`, if any.
    pub fn cid_for(&self, code: u32) -> Option<u32> {
        self.reverse_index().get(code)
    }

    /// Reverse index from integer code to CID.
    ///
    /// Derived on first call by walking the forward table in declaration
    /// order. When two CIDs share an integer code, the one visited last
    /// wins.
    pub fn reverse_index(&self) -> &SparseIntIndex {
        self.reverse.get_or_init(|| {
            let mut index = SparseIntIndex::with_capacity(self.forward.len());
            for (&cid, code) in &self.forward {
                index.put(code.to_code(), cid);
            }
            index
        })
    }

    /// Whether the reverse index has been derived yet.
    pub fn has_reverse_index(&self) -> bool {
        self.reverse.get().is_some()
    }

    /// CMap name declared by the resource.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The collection triple.
    pub fn system_info(&self) -> &CidSystemInfo {
        &self.system_info
    }

    /// Registry of the collection.
    pub fn registry(&self) -> &str {
        &self.system_info.registry
    }

    /// Ordering of the collection.
    pub fn ordering(&self) -> &str {
        &self.system_info.ordering
    }

    /// Supplement of the collection.
    pub fn supplement(&self) -> u32 {
        self.system_info.supplement
    }

    /// Writing mode.
    pub fn writing_mode(&self) -> WritingMode {
        self.writing_mode
    }

    /// Number of mapped CIDs.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Returns true if no CID is mapped.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Forward entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, ByteCode)> + '_ {
        self.forward.iter().map(|(&cid, &code)| (cid, code))
    }
}

impl From<CidCodeTable> for CidCodeMap {
    fn from(table: CidCodeTable) -> Self {
        CidCodeMap::from_table(table)
    }
}
