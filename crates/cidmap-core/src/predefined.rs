//! Classification of predefined CMap names.
//!
//! Exactly two names denote the identity encodings, where codes and CIDs
//! coincide and no resource is loaded. Every other name is resource-backed.
//! [`parse_predefined_cmap_name`] additionally recognizes the standard Adobe
//! CJK names and reports their collection and writing mode.

use crate::system_info::{CidSystemInfo, WritingMode};

/// Horizontal identity encoding.
pub const IDENTITY_H: &str = "Identity-H";
/// Vertical identity encoding.
pub const IDENTITY_V: &str = "Identity-V";

/// Whether `name` is one of the two reserved identity encodings.
pub fn is_identity_cmap(name: &str) -> bool {
    name == IDENTITY_H || name == IDENTITY_V
}

/// What a predefined CMap name tells about its encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct PredefinedCMapInfo {
    /// The full CMap name (e.g., "UniJIS-UCS2-H").
    pub name: String,
    /// Registry (e.g., "Adobe").
    pub registry: String,
    /// Ordering (e.g., "Japan1").
    pub ordering: String,
    /// Supplement, when the name carries one (`Adobe-Japan1-6`).
    pub supplement: Option<u32>,
    /// Writing mode from the `-H`/`-V` suffix.
    pub writing_mode: WritingMode,
    /// Whether this is an identity CMap.
    pub is_identity: bool,
}

impl PredefinedCMapInfo {
    /// The collection triple, with a missing supplement read as 0.
    pub fn system_info(&self) -> CidSystemInfo {
        CidSystemInfo::new(
            self.registry.clone(),
            self.ordering.clone(),
            self.supplement.unwrap_or(0),
        )
    }
}

/// Writing mode implied by a CMap name's suffix.
///
/// `-V` is vertical, everything else horizontal.
pub fn writing_mode_of(name: &str) -> WritingMode {
    if name.ends_with("-V") {
        WritingMode::Vertical
    } else {
        WritingMode::Horizontal
    }
}

/// Classify a predefined CMap name.
///
/// Recognizes:
/// - `Identity-H` / `Identity-V`
/// - `Adobe-Japan1-<n>`, `Adobe-GB1-<n>`, `Adobe-CNS1-<n>`, `Adobe-Korea1-<n>`
/// - standard CJK encodings with `-H`/`-V` suffix, such as `UniJIS-UCS2-H`,
///   `GBK-EUC-H`, `ETen-B5-V`, `KSCms-UHC-H`
///
/// Returns `None` for names it does not know.
pub fn parse_predefined_cmap_name(name: &str) -> Option<PredefinedCMapInfo> {
    if is_identity_cmap(name) {
        let identity = CidSystemInfo::identity();
        return Some(PredefinedCMapInfo {
            name: name.to_string(),
            registry: identity.registry,
            ordering: identity.ordering,
            supplement: Some(identity.supplement),
            writing_mode: writing_mode_of(name),
            is_identity: true,
        });
    }

    if let Some(rest) = name.strip_prefix("Adobe-") {
        let (ordering, supplement) = ["Japan1", "GB1", "CNS1", "Korea1"]
            .iter()
            .find_map(|ordering| {
                rest.strip_prefix(ordering)
                    .and_then(|r| r.strip_prefix('-'))
                    .map(|r| (*ordering, r))
            })?;
        let supplement = supplement.parse::<u32>().ok()?;
        return Some(PredefinedCMapInfo {
            name: name.to_string(),
            registry: "Adobe".to_string(),
            ordering: ordering.to_string(),
            supplement: Some(supplement),
            writing_mode: WritingMode::Horizontal,
            is_identity: false,
        });
    }

    let base = name.strip_suffix("-H").or_else(|| name.strip_suffix("-V"))?;
    let ordering = ordering_for_base(base)?;
    Some(PredefinedCMapInfo {
        name: name.to_string(),
        registry: "Adobe".to_string(),
        ordering: ordering.to_string(),
        supplement: None,
        writing_mode: writing_mode_of(name),
        is_identity: false,
    })
}

/// Character collection of a standard CJK CMap base name (suffix stripped).
fn ordering_for_base(base: &str) -> Option<&'static str> {
    const JAPAN1: &[&str] = &[
        "78-RKSJ",
        "83pv-RKSJ",
        "90pv-RKSJ",
        "90ms-RKSJ",
        "90msp-RKSJ",
        "Add-RKSJ",
        "Ext-RKSJ",
        "Hankaku",
        "Hiragana",
        "Katakana",
        "Roman",
        "WP-Symbol",
    ];

    if base.starts_with("UniCNS") {
        return Some("CNS1");
    }
    if base.contains("JIS") || base.contains("EUC-JP") || JAPAN1.contains(&base) {
        Some("Japan1")
    } else if base.contains("GB") {
        Some("GB1")
    } else if base.contains("CNS")
        || base.contains("ETen")
        || base.contains("HKscs")
        || base.contains("B5")
    {
        Some("CNS1")
    } else if base.contains("KSC") || base.starts_with("UniKS") {
        Some("Korea1")
    } else {
        None
    }
}
