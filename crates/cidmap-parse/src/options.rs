//! Configuration for resource loading.

use std::path::PathBuf;

/// Options controlling how CMap resources are found and how much work a
/// single resource may cause.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderOptions {
    /// Directories searched, in order, for a file named after the resource
    /// (default: empty).
    pub search_paths: Vec<PathBuf>,
    /// Maximum size of one resource file in bytes (default: 8 MiB).
    pub max_resource_bytes: usize,
    /// Maximum number of codes one `begincidrange` entry may span
    /// (default: 65,536).
    pub max_range_len: u32,
    /// Maximum number of code → CID mappings one program may expand to,
    /// including mappings inherited through `usecmap` (default: 4,194,304).
    pub max_mappings: usize,
    /// Maximum depth of `usecmap` chains (default: 8).
    pub max_usecmap_depth: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            max_resource_bytes: 8 * 1024 * 1024,
            max_range_len: 0x1_0000,
            max_mappings: 0x40_0000,
            max_usecmap_depth: 8,
        }
    }
}

impl LoaderOptions {
    /// Append a directory to the search path.
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = LoaderOptions::default();
        assert!(opts.search_paths.is_empty());
        assert_eq!(opts.max_resource_bytes, 8 * 1024 * 1024);
        assert_eq!(opts.max_range_len, 65_536);
        assert_eq!(opts.max_mappings, 4_194_304);
        assert_eq!(opts.max_usecmap_depth, 8);
    }

    #[test]
    fn search_paths_keep_order() {
        let opts = LoaderOptions::default()
            .with_search_path("/usr/share/cmap")
            .with_search_path("resources/cmap");
        assert_eq!(
            opts.search_paths,
            vec![PathBuf::from("/usr/share/cmap"), PathBuf::from("resources/cmap")]
        );
    }
}
