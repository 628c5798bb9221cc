//! cidmap-core: Backend-independent data types for CMap resolution.
//!
//! This crate provides the value types (byte codes, collection triples,
//! writing modes), the [`SparseIntIndex`], and the two immutable map kinds
//! ([`CidCodeMap`], [`CidUnicodeMap`]) that cidmap-rs builds from CMap
//! resources. Loading resources lives in cidmap-parse; caching and the
//! encoding facade live in cidmap.

pub mod byte_code;
pub mod code_map;
pub mod error;
pub mod predefined;
pub mod sparse_index;
pub mod system_info;
pub mod unicode_map;

pub use byte_code::{ByteCode, MAX_CODE_LEN, bytes_to_code};
pub use code_map::{CidCodeMap, CidCodeTable};
pub use error::{CMapError, Result};
pub use predefined::{
    IDENTITY_H, IDENTITY_V, PredefinedCMapInfo, is_identity_cmap, parse_predefined_cmap_name,
    writing_mode_of,
};
pub use sparse_index::SparseIntIndex;
pub use system_info::{
    CidSystemInfo, IDENTITY_ORDERING, IDENTITY_REGISTRY, IDENTITY_SUPPLEMENT, WritingMode,
};
pub use unicode_map::{CidUnicodeMap, CidUnicodeTable};
