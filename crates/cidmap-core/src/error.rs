//! Error types for cidmap-rs.
//!
//! Provides [`CMapError`], the single error type surfaced by every lookup,
//! cache, and facade operation, and the [`Result`] alias built on it.

use std::fmt;

/// Result alias used throughout cidmap-rs.
pub type Result<T> = std::result::Result<T, CMapError>;

/// Errors raised while resolving CMap resources or looking up identifiers.
///
/// Unmapped lookups ([`UnmappedCid`](CMapError::UnmappedCid) and
/// [`UnmappedCode`](CMapError::UnmappedCode)) are ordinary outcomes for
/// out-of-range input. They are never replaced by a default value such as 0.
#[derive(Debug, Clone, PartialEq)]
pub enum CMapError {
    /// The loader could not find a resource with this name.
    ResourceNotFound(String),
    /// The resource was found but could not be turned into a map.
    MalformedResource {
        /// Name of the resource.
        name: String,
        /// What was wrong with it.
        reason: String,
    },
    /// The CID has no entry in the forward table.
    UnmappedCid(u32),
    /// The integer code has no entry in the reverse code index.
    UnmappedCode(u32),
    /// A lookup needed a map the encoding never resolved.
    ///
    /// Raised when, for example, the registry of a resource-backed encoding
    /// is requested but its CID/code map was never attached.
    Unresolved {
        /// Name of the encoding resource.
        name: String,
        /// Which map was missing ("cid-to-code" or "cid-to-unicode").
        what: &'static str,
    },
    /// An identity encoding name was passed where a loadable resource was
    /// required. Identity encodings never need a resource.
    IdentityResource(String),
    /// A byte code was not 1 to 4 bytes long.
    InvalidByteCode(usize),
    /// A configured resource limit was exceeded.
    ResourceLimitExceeded {
        /// Name of the limit that was exceeded (e.g., "max_resource_bytes").
        limit_name: String,
        /// The configured limit value.
        limit_value: usize,
        /// The actual value that exceeded the limit.
        actual_value: usize,
    },
    /// I/O error while reading a resource.
    Io(String),
}

impl fmt::Display for CMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CMapError::ResourceNotFound(name) => write!(f, "CMap resource not found: {name}"),
            CMapError::MalformedResource { name, reason } => {
                write!(f, "malformed CMap resource {name}: {reason}")
            }
            CMapError::UnmappedCid(cid) => write!(f, "unmapped CID: {cid}"),
            CMapError::UnmappedCode(code) => write!(f, "unmapped code: 0x{code:X}"),
            CMapError::Unresolved { name, what } => {
                write!(f, "encoding {name} has no resolved {what} map")
            }
            CMapError::IdentityResource(name) => {
                write!(f, "{name} is an identity encoding and has no resource")
            }
            CMapError::InvalidByteCode(len) => {
                write!(f, "byte code must be 1 to 4 bytes long, got {len}")
            }
            CMapError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
            } => write!(
                f,
                "resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})"
            ),
            CMapError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for CMapError {}

impl From<std::io::Error> for CMapError {
    fn from(err: std::io::Error) -> Self {
        CMapError::Io(err.to_string())
    }
}

impl CMapError {
    /// Returns true for the two "no entry" outcomes of a lookup.
    pub fn is_unmapped(&self) -> bool {
        matches!(self, CMapError::UnmappedCid(_) | CMapError::UnmappedCode(_))
    }

    /// Returns true if the error came from loading a resource.
    ///
    /// Load failures are never cached: asking for the same resource again
    /// retries the load.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            CMapError::ResourceNotFound(_)
                | CMapError::MalformedResource { .. }
                | CMapError::ResourceLimitExceeded { .. }
                | CMapError::Io(_)
        )
    }
}
