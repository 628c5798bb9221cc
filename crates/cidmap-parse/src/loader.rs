//! Resource loader trait.
//!
//! Defines the [`ResourceLoader`] trait that abstracts where CMap resources
//! come from. This enables pluggable sources (a directory of Adobe CMap
//! files, tables registered in memory, an application's own bundle).

use std::fmt;
use std::sync::Arc;

use cidmap_core::{CidCodeTable, CidUnicodeTable};

use crate::error::LoaderError;

/// The two kinds of CMap resource a loader can produce.
///
/// They share names with each other but never share cache entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A character-collection CMap, inverted to CID → code.
    CidToCode,
    /// A Unicode CMap, inverted to CID → Unicode.
    CidToUnicode,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::CidToCode => write!(f, "cid-to-code"),
            ResourceKind::CidToUnicode => write!(f, "cid-to-unicode"),
        }
    }
}

/// Trait abstracting CMap resource loading.
///
/// A loader turns a resource name into a raw table. Loaders are shared
/// across threads by the cache and may be called concurrently for
/// different names, so they must be `Send + Sync`. The cache calls a
/// loader at most once per successful name and kind.
///
/// # Usage
///
/// ```ignore
/// let table = loader.load_cid_to_code("90ms-RKSJ-H")?;
/// let map = CidCodeMap::from_table(table);
/// ```
pub trait ResourceLoader: Send + Sync {
    /// Load the character-collection CMap `name` as a CID → code table.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::NotFound`] if no such resource exists, and
    /// [`LoaderError::Malformed`] if it exists but cannot be read as a CMap.
    fn load_cid_to_code(&self, name: &str) -> Result<CidCodeTable, LoaderError>;

    /// Load the Unicode CMap `name` as a CID → Unicode table.
    ///
    /// # Errors
    ///
    /// Same as [`ResourceLoader::load_cid_to_code`].
    fn load_cid_to_unicode(&self, name: &str) -> Result<CidUnicodeTable, LoaderError>;
}

impl<L: ResourceLoader + ?Sized> ResourceLoader for Arc<L> {
    fn load_cid_to_code(&self, name: &str) -> Result<CidCodeTable, LoaderError> {
        (**self).load_cid_to_code(name)
    }

    fn load_cid_to_unicode(&self, name: &str) -> Result<CidUnicodeTable, LoaderError> {
        (**self).load_cid_to_unicode(name)
    }
}

impl<L: ResourceLoader + ?Sized> ResourceLoader for Box<L> {
    fn load_cid_to_code(&self, name: &str) -> Result<CidCodeTable, LoaderError> {
        (**self).load_cid_to_code(name)
    }

    fn load_cid_to_unicode(&self, name: &str) -> Result<CidUnicodeTable, LoaderError> {
        (**self).load_cid_to_unicode(name)
    }
}
