//! cidmap: Resolve CMap resources and map between CIDs, byte codes, and Unicode.
//!
//! This is the public API facade crate for cidmap-rs. It re-exports types from
//! cidmap-core and uses cidmap-parse to load CMap resources.
//!
//! # Architecture
//!
//! - **cidmap-core**: Byte codes, collection triples, and the immutable maps
//! - **cidmap-parse**: Resource loaders and the CMap program parser
//! - **cidmap** (this crate): The shared [`ResourceCache`] and the
//!   [`CMapEncoding`] facade
//!
//! # Example
//!
//! ```
//! use cidmap::{CMapEncoding, MemoryResourceLoader, ResourceCache};
//!
//! let loader = MemoryResourceLoader::new().with_program(
//!     "Test-H",
//!     "/CIDSystemInfo << /Registry (Adobe) /Ordering (Japan1) /Supplement 6 >> def\n\
//!      begincidrange\n<8140> <8142> 633\nendcidrange\n",
//! );
//! let cache = ResourceCache::new(loader);
//!
//! let encoding = CMapEncoding::with_unicode_map(&cache, "Test-H", "").unwrap();
//! assert_eq!(encoding.code_for(634).unwrap(), 0x8141);
//! assert_eq!(encoding.cid_for(0x8142).unwrap(), 635);
//! assert_eq!(encoding.ordering().unwrap(), "Japan1");
//! ```

pub mod cache;
pub mod encoding;

pub use cache::{LoadState, ResourceCache};
pub use encoding::CMapEncoding;

pub use cidmap_core;
pub use cidmap_core::{
    ByteCode, CMapError, CidCodeMap, CidSystemInfo, CidUnicodeMap, IDENTITY_H, IDENTITY_V,
    Result, WritingMode, bytes_to_code,
};
pub use cidmap_parse;
pub use cidmap_parse::{
    FsResourceLoader, LoaderError, LoaderOptions, MemoryResourceLoader, ResourceKind,
    ResourceLoader,
};
