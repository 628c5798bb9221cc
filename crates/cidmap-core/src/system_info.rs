//! Character collection identity and writing mode.

use std::fmt;

/// Registry of the fixed identity collection.
pub const IDENTITY_REGISTRY: &str = "Adobe";
/// Ordering of the fixed identity collection.
pub const IDENTITY_ORDERING: &str = "Identity";
/// Supplement of the fixed identity collection.
pub const IDENTITY_SUPPLEMENT: u32 = 0;

/// CIDSystemInfo: the registry/ordering/supplement triple naming a CID
/// character collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CidSystemInfo {
    /// Registry (e.g., "Adobe").
    pub registry: String,
    /// Ordering (e.g., "Japan1", "GB1", "CNS1", "Korea1").
    pub ordering: String,
    /// Supplement number.
    pub supplement: u32,
}

impl CidSystemInfo {
    /// Create a triple from its parts.
    pub fn new(registry: impl Into<String>, ordering: impl Into<String>, supplement: u32) -> Self {
        Self {
            registry: registry.into(),
            ordering: ordering.into(),
            supplement,
        }
    }

    /// The fixed `("Adobe", "Identity", 0)` triple of identity encodings.
    pub fn identity() -> Self {
        Self::new(IDENTITY_REGISTRY, IDENTITY_ORDERING, IDENTITY_SUPPLEMENT)
    }

    /// Whether this is the identity collection.
    pub fn is_identity(&self) -> bool {
        self.registry == IDENTITY_REGISTRY && self.ordering == IDENTITY_ORDERING
    }

    /// Check whether this is one of the Adobe CJK character collections.
    pub fn is_adobe_cjk(&self) -> bool {
        self.registry == "Adobe"
            && matches!(
                self.ordering.as_str(),
                "Japan1" | "GB1" | "CNS1" | "Korea1"
            )
    }
}

impl fmt::Display for CidSystemInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.registry, self.ordering, self.supplement)
    }
}

/// Writing mode of a CMap: `/WMode 0` or `/WMode 1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WritingMode {
    /// Horizontal (`-H` CMaps, `/WMode 0`).
    #[default]
    Horizontal,
    /// Vertical (`-V` CMaps, `/WMode 1`).
    Vertical,
}

impl WritingMode {
    /// Map a `/WMode` value. Anything but 1 is horizontal.
    pub fn from_wmode(wmode: u8) -> Self {
        if wmode == 1 {
            WritingMode::Vertical
        } else {
            WritingMode::Horizontal
        }
    }

    /// The `/WMode` value.
    pub fn wmode(self) -> u8 {
        match self {
            WritingMode::Horizontal => 0,
            WritingMode::Vertical => 1,
        }
    }
}
