//! cidmap-parse: CMap resource loading and CMap program parsing.
//!
//! This crate turns CMap resource names into the raw tables that
//! cidmap-core's maps are built from. The [`ResourceLoader`] trait is the
//! seam: [`FsResourceLoader`] reads Adobe CMap files from disk and
//! [`MemoryResourceLoader`] serves resources registered in memory. Both
//! parse CMap programs with [`CMapProgram`].

pub mod cmap;
pub mod error;
pub mod fs_loader;
pub mod loader;
pub mod memory_loader;
pub mod options;

pub use cidmap_core;
pub use cmap::{CMapProgram, CodespaceRange, UnicodeForm, load_program_chain};
pub use error::LoaderError;
pub use fs_loader::FsResourceLoader;
pub use loader::{ResourceKind, ResourceLoader};
pub use memory_loader::MemoryResourceLoader;
pub use options::LoaderOptions;
