//! CMap-based encoding of CID-keyed text.
//!
//! A [`CMapEncoding`] answers, for one named CMap, how a CID is written
//! into a content stream and which CID a code read back from one selects.
//! The identity CMaps (`Identity-H`, `Identity-V`) are *direct*: codes and
//! CIDs are the same number and no resource is ever loaded. Every other
//! name is resolved through a [`ResourceCache`].

use std::sync::Arc;

use cidmap_core::{
    ByteCode, CMapError, CidCodeMap, CidSystemInfo, CidUnicodeMap, IDENTITY_ORDERING,
    IDENTITY_REGISTRY, IDENTITY_SUPPLEMENT, Result, WritingMode, is_identity_cmap,
    writing_mode_of,
};

use crate::cache::ResourceCache;

/// Bytes per code of the identity CMaps.
const DIRECT_CODE_WIDTH: usize = 2;

/// Encoding of CIDs through a named CMap.
///
/// Immutable after construction. Resolved maps are shared with every other
/// encoding built from the same cache, so cloning is cheap.
///
/// # Example
///
/// ```
/// use cidmap::CMapEncoding;
///
/// let encoding = CMapEncoding::new("Identity-H");
/// assert!(encoding.is_direct());
/// assert_eq!(encoding.code_for(0x1234).unwrap(), 0x1234);
/// assert_eq!(encoding.registry().unwrap(), "Adobe");
/// ```
#[derive(Debug, Clone)]
pub struct CMapEncoding {
    resource_name: String,
    unicode_resource_name: Option<String>,
    is_direct: bool,
    code_map: Option<Arc<CidCodeMap>>,
    unicode_map: Option<Arc<CidUnicodeMap>>,
}

impl CMapEncoding {
    /// Create an encoding for `resource_name` without loading anything.
    ///
    /// Suitable for the identity CMaps. A non-identity encoding created
    /// this way has no maps, and lookups fail with
    /// [`CMapError::Unresolved`].
    pub fn new(resource_name: impl Into<String>) -> Self {
        let resource_name = resource_name.into();
        Self {
            is_direct: is_identity_cmap(&resource_name),
            resource_name,
            unicode_resource_name: None,
            code_map: None,
            unicode_map: None,
        }
    }

    /// Create an encoding and resolve its maps through `cache`.
    ///
    /// For an identity CMap the CID → Unicode map named by
    /// `unicode_resource_name` is resolved, unless that name is empty. For
    /// any other CMap the CID → code map of `resource_name` is resolved and
    /// its reverse index derived up front.
    ///
    /// # Errors
    ///
    /// Returns the cache's error if a map cannot be resolved.
    pub fn with_unicode_map(
        cache: &ResourceCache,
        resource_name: impl Into<String>,
        unicode_resource_name: impl Into<String>,
    ) -> Result<Self> {
        let mut encoding = Self::new(resource_name);
        encoding.unicode_resource_name = Some(unicode_resource_name.into());

        if encoding.is_direct {
            if let Some(uni_name) = encoding
                .unicode_resource_name
                .as_deref()
                .filter(|name| !name.is_empty())
            {
                encoding.unicode_map = Some(cache.cid_to_unicode(uni_name)?);
            }
        } else {
            let map = cache.cid_to_code(&encoding.resource_name)?;
            map.reverse_index();
            encoding.code_map = Some(map);
        }
        Ok(encoding)
    }

    /// Whether this is an identity encoding (codes equal CIDs).
    pub fn is_direct(&self) -> bool {
        self.is_direct
    }

    /// Whether a non-empty Unicode resource name was supplied.
    pub fn has_unicode_map(&self) -> bool {
        self.unicode_resource_name
            .as_deref()
            .is_some_and(|name| !name.is_empty())
    }

    /// Name of the CMap resource.
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Name of the Unicode CMap resource, if one was supplied.
    pub fn unicode_resource_name(&self) -> Option<&str> {
        self.unicode_resource_name.as_deref()
    }

    /// Registry of the character collection.
    pub fn registry(&self) -> Result<&str> {
        if self.is_direct {
            return Ok(IDENTITY_REGISTRY);
        }
        Ok(self.code_map()?.registry())
    }

    /// Ordering of the character collection.
    pub fn ordering(&self) -> Result<&str> {
        if self.is_direct {
            return Ok(IDENTITY_ORDERING);
        }
        Ok(self.code_map()?.ordering())
    }

    /// Supplement number of the character collection.
    pub fn supplement(&self) -> Result<u32> {
        if self.is_direct {
            return Ok(IDENTITY_SUPPLEMENT);
        }
        Ok(self.code_map()?.supplement())
    }

    /// The full `(registry, ordering, supplement)` triple.
    pub fn system_info(&self) -> Result<CidSystemInfo> {
        if self.is_direct {
            return Ok(CidSystemInfo::identity());
        }
        Ok(self.code_map()?.system_info().clone())
    }

    /// Integer code for `cid`.
    ///
    /// # Errors
    ///
    /// Returns [`CMapError::UnmappedCid`] if the CMap has no code for `cid`.
    pub fn code_for(&self, cid: u32) -> Result<u32> {
        if self.is_direct {
            return Ok(cid);
        }
        self.code_map()?
            .code_for(cid)
            .ok_or(CMapError::UnmappedCid(cid))
    }

    /// CID selected by integer `code`.
    ///
    /// # Errors
    ///
    /// Returns [`CMapError::UnmappedCode`] if no CID maps to `code`.
    pub fn cid_for(&self, code: u32) -> Result<u32> {
        if self.is_direct {
            return Ok(code);
        }
        self.code_map()?
            .cid_for(code)
            .ok_or(CMapError::UnmappedCode(code))
    }

    /// Bytes to write into a content stream for `cid`.
    ///
    /// Identity encodings write two big-endian bytes, so CIDs above
    /// `0xFFFF` are unmapped for them.
    pub fn code_bytes_for(&self, cid: u32) -> Result<ByteCode> {
        if self.is_direct {
            if cid > 0xFFFF {
                return Err(CMapError::UnmappedCid(cid));
            }
            return ByteCode::from_code(cid, DIRECT_CODE_WIDTH);
        }
        self.code_map()?
            .byte_code_for(cid)
            .ok_or(CMapError::UnmappedCid(cid))
    }

    /// Unicode text of `cid`.
    ///
    /// # Errors
    ///
    /// Returns [`CMapError::Unresolved`] if no Unicode map was resolved and
    /// [`CMapError::UnmappedCid`] if the map has no entry for `cid`.
    pub fn unicode_for(&self, cid: u32) -> Result<&str> {
        let map = self.unicode_map.as_deref().ok_or_else(|| CMapError::Unresolved {
            name: self
                .unicode_resource_name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| self.resource_name.clone()),
            what: "cid-to-unicode",
        })?;
        map.unicode_for(cid).ok_or(CMapError::UnmappedCid(cid))
    }

    /// Writing mode.
    ///
    /// From the name suffix for identity encodings and unresolved ones,
    /// from the CMap's `/WMode` otherwise.
    pub fn writing_mode(&self) -> WritingMode {
        match &self.code_map {
            Some(map) if !self.is_direct => map.writing_mode(),
            _ => writing_mode_of(&self.resource_name),
        }
    }

    /// The shared CID → code map, if resolved.
    pub fn shared_code_map(&self) -> Option<&Arc<CidCodeMap>> {
        self.code_map.as_ref()
    }

    /// The shared CID → Unicode map, if resolved.
    pub fn shared_unicode_map(&self) -> Option<&Arc<CidUnicodeMap>> {
        self.unicode_map.as_ref()
    }

    fn code_map(&self) -> Result<&CidCodeMap> {
        self.code_map.as_deref().ok_or_else(|| CMapError::Unresolved {
            name: self.resource_name.clone(),
            what: "cid-to-code",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cidmap_core::{CidCodeTable, CidUnicodeTable};
    use cidmap_parse::MemoryResourceLoader;

    fn code(bytes: &[u8]) -> ByteCode {
        ByteCode::new(bytes).unwrap()
    }

    fn cache() -> ResourceCache {
        let mut rksj = CidCodeTable::new(CidSystemInfo::new("Adobe", "Japan1", 6))
            .with_name("90ms-RKSJ-V")
            .with_writing_mode(WritingMode::Vertical);
        rksj.push(1, code(&[0x20]));
        rksj.push(633, code(&[0x81, 0x40]));
        rksj.push(5, code(&[0x00, 0x01]));
        rksj.push(9, code(&[0x00, 0x01]));

        let mut wide = CidCodeTable::new(CidSystemInfo::new("Adobe", "GB1", 5));
        wide.push(7, code(&[0x01, 0x00, 0x00]));

        let mut unicode = CidUnicodeTable::new();
        unicode.push(34, "A");
        unicode.push(843, "\u{3042}");

        ResourceCache::new(
            MemoryResourceLoader::new()
                .with_code_table("90ms-RKSJ-V", rksj)
                .with_code_table("Wide-H", wide)
                .with_unicode_table("UniJIS-UCS2-H", unicode),
        )
    }

    // --- Direct ---

    #[test]
    fn direct_passthrough() {
        let enc = CMapEncoding::new("Identity-H");
        assert!(enc.is_direct());
        for n in [0, 1, 0x1234, 0xFFFF] {
            assert_eq!(enc.code_for(n).unwrap(), n);
            assert_eq!(enc.cid_for(n).unwrap(), n);
        }
    }

    #[test]
    fn direct_identity_triple() {
        let enc = CMapEncoding::new("Identity-V");
        assert_eq!(enc.registry().unwrap(), "Adobe");
        assert_eq!(enc.ordering().unwrap(), "Identity");
        assert_eq!(enc.supplement().unwrap(), 0);
        assert_eq!(enc.system_info().unwrap(), CidSystemInfo::identity());
        assert_eq!(enc.writing_mode(), WritingMode::Vertical);
    }

    #[test]
    fn direct_code_bytes() {
        let enc = CMapEncoding::new("Identity-H");
        assert_eq!(enc.code_bytes_for(0x1234).unwrap().as_bytes(), &[0x12, 0x34]);
        assert_eq!(enc.code_bytes_for(7).unwrap().as_bytes(), &[0x00, 0x07]);
        assert_eq!(
            enc.code_bytes_for(0x1_0000).unwrap_err(),
            CMapError::UnmappedCid(0x1_0000)
        );
    }

    #[test]
    fn identity_name_is_case_sensitive() {
        assert!(!CMapEncoding::new("identity-h").is_direct());
        assert!(!CMapEncoding::new("Identity").is_direct());
    }

    #[test]
    fn direct_loads_unicode_map() {
        let cache = cache();
        let enc = CMapEncoding::with_unicode_map(&cache, "Identity-H", "UniJIS-UCS2-H").unwrap();
        assert!(enc.is_direct());
        assert!(enc.has_unicode_map());
        assert_eq!(enc.unicode_resource_name(), Some("UniJIS-UCS2-H"));
        assert_eq!(enc.unicode_for(843).unwrap(), "\u{3042}");
        assert_eq!(enc.unicode_for(1).unwrap_err(), CMapError::UnmappedCid(1));
        assert!(enc.shared_code_map().is_none());
    }

    #[test]
    fn direct_with_empty_unicode_name_loads_nothing() {
        let cache = cache();
        let enc = CMapEncoding::with_unicode_map(&cache, "Identity-H", "").unwrap();
        assert!(!enc.has_unicode_map());
        assert_eq!(enc.unicode_resource_name(), Some(""));
        assert!(cache.is_empty());
        assert_eq!(
            enc.unicode_for(34).unwrap_err(),
            CMapError::Unresolved {
                name: "Identity-H".to_string(),
                what: "cid-to-unicode",
            }
        );
    }

    #[test]
    fn direct_with_missing_unicode_resource_fails() {
        let cache = cache();
        let err = CMapEncoding::with_unicode_map(&cache, "Identity-V", "UniKS-UCS2-H").unwrap_err();
        assert_eq!(err, CMapError::ResourceNotFound("UniKS-UCS2-H".to_string()));
    }

    // --- Resource-backed ---

    #[test]
    fn resource_backed_lookups() {
        let cache = cache();
        let enc = CMapEncoding::with_unicode_map(&cache, "90ms-RKSJ-V", "").unwrap();
        assert!(!enc.is_direct());
        assert!(enc.shared_code_map().unwrap().has_reverse_index());
        assert_eq!(enc.code_for(633).unwrap(), 0x8140);
        assert_eq!(enc.cid_for(0x8140).unwrap(), 633);
        assert_eq!(enc.code_bytes_for(633).unwrap().as_bytes(), &[0x81, 0x40]);
        assert_eq!(enc.code_for(1).unwrap(), 0x20);
        assert_eq!(enc.cid_for(enc.code_for(1).unwrap()).unwrap(), 1);
    }

    #[test]
    fn resource_backed_triple_and_mode() {
        let cache = cache();
        let enc = CMapEncoding::with_unicode_map(&cache, "90ms-RKSJ-V", "").unwrap();
        assert_eq!(enc.registry().unwrap(), "Adobe");
        assert_eq!(enc.ordering().unwrap(), "Japan1");
        assert_eq!(enc.supplement().unwrap(), 6);
        assert_eq!(enc.writing_mode(), WritingMode::Vertical);
    }

    #[test]
    fn multi_byte_codes_accumulate_big_endian() {
        let cache = cache();
        let enc = CMapEncoding::with_unicode_map(&cache, "Wide-H", "").unwrap();
        assert_eq!(enc.code_for(7).unwrap(), 65536);
        assert_eq!(enc.cid_for(65536).unwrap(), 7);
    }

    #[test]
    fn colliding_codes_resolve_to_last_declared_cid() {
        let cache = cache();
        let enc = CMapEncoding::with_unicode_map(&cache, "90ms-RKSJ-V", "").unwrap();
        assert_eq!(enc.code_for(5).unwrap(), 1);
        assert_eq!(enc.code_for(9).unwrap(), 1);
        assert_eq!(enc.cid_for(1).unwrap(), 9);
    }

    #[test]
    fn unmapped_lookups_are_errors() {
        let cache = cache();
        let enc = CMapEncoding::with_unicode_map(&cache, "90ms-RKSJ-V", "").unwrap();
        assert_eq!(enc.code_for(2).unwrap_err(), CMapError::UnmappedCid(2));
        assert_eq!(enc.cid_for(0x8141).unwrap_err(), CMapError::UnmappedCode(0x8141));
        assert_eq!(enc.code_bytes_for(2).unwrap_err(), CMapError::UnmappedCid(2));
    }

    #[test]
    fn resource_backed_does_not_load_unicode_map() {
        let cache = cache();
        let enc = CMapEncoding::with_unicode_map(&cache, "90ms-RKSJ-V", "UniJIS-UCS2-H").unwrap();
        assert!(enc.has_unicode_map());
        assert!(enc.shared_unicode_map().is_none());
        assert!(matches!(
            enc.unicode_for(843),
            Err(CMapError::Unresolved { what: "cid-to-unicode", .. })
        ));
    }

    #[test]
    fn missing_resource_fails_construction() {
        let cache = cache();
        let err = CMapEncoding::with_unicode_map(&cache, "Missing-H", "").unwrap_err();
        assert_eq!(err, CMapError::ResourceNotFound("Missing-H".to_string()));
    }

    #[test]
    fn unresolved_non_direct_encoding() {
        let enc = CMapEncoding::new("90ms-RKSJ-H");
        assert!(!enc.is_direct());
        assert!(!enc.has_unicode_map());
        assert_eq!(enc.unicode_resource_name(), None);
        let unresolved = CMapError::Unresolved {
            name: "90ms-RKSJ-H".to_string(),
            what: "cid-to-code",
        };
        assert_eq!(enc.registry().unwrap_err(), unresolved);
        assert_eq!(enc.code_for(1).unwrap_err(), unresolved);
        assert_eq!(enc.cid_for(1).unwrap_err(), unresolved);
        assert_eq!(enc.writing_mode(), WritingMode::Horizontal);
    }

    #[test]
    fn clones_share_maps() {
        let cache = cache();
        let enc = CMapEncoding::with_unicode_map(&cache, "90ms-RKSJ-V", "").unwrap();
        let copy = enc.clone();
        assert!(Arc::ptr_eq(
            enc.shared_code_map().unwrap(),
            copy.shared_code_map().unwrap()
        ));
    }
}
