//! Filesystem resource loader.
//!
//! Looks up CMap resources as files named after the resource (no
//! extension, as in Adobe's `cmap-resources` tree) in a list of search
//! directories.

use std::fs;
use std::path::{Path, PathBuf};

use cidmap_core::{CidCodeTable, CidUnicodeTable};

use crate::cmap::{CMapProgram, UnicodeForm, load_program_chain};
use crate::error::LoaderError;
use crate::loader::ResourceLoader;
use crate::options::LoaderOptions;

/// Loads CMap programs from directories on disk.
#[derive(Debug, Clone, Default)]
pub struct FsResourceLoader {
    options: LoaderOptions,
}

impl FsResourceLoader {
    /// Create a loader with the given options.
    pub fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Create a loader searching a single directory with default limits.
    pub fn with_directory(dir: impl Into<PathBuf>) -> Self {
        Self::new(LoaderOptions::default().with_search_path(dir))
    }

    /// The loader's options.
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Find the file for resource `name` in the first search path that has
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::NotFound`] if no search path has the file, or
    /// if `name` is not a plain file name.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, LoaderError> {
        if !is_plain_name(name) {
            return Err(LoaderError::NotFound(name.to_string()));
        }
        self.options
            .search_paths
            .iter()
            .map(|dir| dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| LoaderError::NotFound(name.to_string()))
    }

    /// Read, parse, and resolve the `usecmap` chain of resource `name`.
    pub fn load_program(&self, name: &str) -> Result<CMapProgram, LoaderError> {
        load_program_chain(name, &self.options, |resource| self.read(resource))
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, LoaderError> {
        let path = self.resolve(name)?;
        check_size(&path, self.options.max_resource_bytes)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(name, path = %path.display(), "reading CMap resource");
        Ok(fs::read(&path)?)
    }
}

impl ResourceLoader for FsResourceLoader {
    fn load_cid_to_code(&self, name: &str) -> Result<CidCodeTable, LoaderError> {
        self.load_program(name)?
            .into_code_table()
            .map_err(|e| e.in_resource(name))
    }

    fn load_cid_to_unicode(&self, name: &str) -> Result<CidUnicodeTable, LoaderError> {
        let program = self.load_program(name)?;
        Ok(program.into_unicode_table(UnicodeForm::for_cmap_name(name)))
    }
}

fn check_size(path: &Path, limit: usize) -> Result<(), LoaderError> {
    let size = fs::metadata(path)?.len();
    if size > limit as u64 {
        return Err(LoaderError::LimitExceeded {
            limit_name: "max_resource_bytes",
            limit_value: limit,
            actual_value: size as usize,
        });
    }
    Ok(())
}

/// Resource names are file names, never paths.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use cidmap_core::{CidCodeMap, CidSystemInfo, WritingMode};

    const PARENT: &str = "\
/CIDSystemInfo << /Registry (Adobe) /Ordering (Japan1) /Supplement 2 >> def
/CMapName /Test-H def
1 begincodespacerange
<0000> <ffff>
endcodespacerange
1 begincidrange
<0020> <0022> 1
endcidrange
";

    const CHILD: &str = "\
/CIDSystemInfo << /Registry (Adobe) /Ordering (Japan1) /Supplement 2 >> def
/CMapName /Test-V def
/WMode 1 def
/Test-H usecmap
1 begincidchar
<0021> 100
endcidchar
";

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn loads_code_table_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Test-H", PARENT);
        let loader = FsResourceLoader::with_directory(dir.path());

        let map = CidCodeMap::from_table(loader.load_cid_to_code("Test-H").unwrap());
        assert_eq!(map.system_info(), &CidSystemInfo::new("Adobe", "Japan1", 2));
        assert_eq!(map.code_for(2), Some(0x0021));
        assert_eq!(map.cid_for(0x0022), Some(3));
    }

    #[test]
    fn later_search_path_is_used_when_earlier_lacks_file() {
        let empty = tempfile::tempdir().unwrap();
        let full = tempfile::tempdir().unwrap();
        write(full.path(), "Test-H", PARENT);
        let loader = FsResourceLoader::new(
            LoaderOptions::default()
                .with_search_path(empty.path())
                .with_search_path(full.path()),
        );
        assert_eq!(loader.resolve("Test-H").unwrap(), full.path().join("Test-H"));
    }

    #[test]
    fn usecmap_chain_is_merged() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Test-H", PARENT);
        write(dir.path(), "Test-V", CHILD);
        let loader = FsResourceLoader::with_directory(dir.path());

        let map = CidCodeMap::from_table(loader.load_cid_to_code("Test-V").unwrap());
        assert_eq!(map.writing_mode(), WritingMode::Vertical);
        assert_eq!(map.code_for(1), Some(0x0020));
        assert_eq!(map.code_for(100), Some(0x0021));
        // the child redefines <0021>, but CID 2 keeps its own code
        assert_eq!(map.code_for(2), Some(0x0021));
    }

    #[test]
    fn missing_resource_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FsResourceLoader::with_directory(dir.path());
        let err = loader.load_cid_to_code("Nope-H").unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(ref name) if name == "Nope-H"));
    }

    #[test]
    fn path_like_names_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Test-H", PARENT);
        let loader = FsResourceLoader::with_directory(dir.path());
        for name in ["", "..", "../Test-H", "sub/Test-H", "sub\\Test-H"] {
            assert!(
                matches!(loader.resolve(name), Err(LoaderError::NotFound(_))),
                "{name:?} should not resolve"
            );
        }
    }

    #[test]
    fn oversized_file_hits_limit() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Test-H", PARENT);
        let loader = FsResourceLoader::new(LoaderOptions {
            max_resource_bytes: 16,
            ..LoaderOptions::default().with_search_path(dir.path())
        });
        let err = loader.load_cid_to_code("Test-H").unwrap_err();
        assert!(matches!(
            err,
            LoaderError::LimitExceeded {
                limit_name: "max_resource_bytes",
                limit_value: 16,
                ..
            }
        ));
    }

    #[test]
    fn malformed_file_names_the_resource() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Bad-H", "begincidchar\n<0020> 1\n");
        let loader = FsResourceLoader::with_directory(dir.path());
        let err = loader.load_cid_to_code("Bad-H").unwrap_err();
        assert!(matches!(err, LoaderError::Malformed { ref name, .. } if name == "Bad-H"));
    }

    #[test]
    fn missing_system_info_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Bare-H", "begincidchar\n<0020> 1\nendcidchar\n");
        let loader = FsResourceLoader::with_directory(dir.path());
        let err = loader.load_cid_to_code("Bare-H").unwrap_err();
        assert!(matches!(
            err,
            LoaderError::Malformed { ref name, ref reason } if name == "Bare-H" && reason.contains("CIDSystemInfo")
        ));
    }

    #[test]
    fn loads_unicode_table() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "UniJIS-UCS2-H",
            "/CMapName /UniJIS-UCS2-H def\nbegincidchar\n<3042> 843\nendcidchar\n",
        );
        let loader = FsResourceLoader::with_directory(dir.path());
        let table = loader.load_cid_to_unicode("UniJIS-UCS2-H").unwrap();
        assert_eq!(table.entries, vec![(843, "\u{3042}".to_string())]);
    }
}
