//! Error types for the resource loading layer.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides [`LoaderError`]
//! that covers loader and parser failures and converts them to [`CMapError`].

use cidmap_core::CMapError;
use thiserror::Error;

/// Error type for resource loaders and the CMap program parser.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// No resource with this name exists.
    #[error("CMap resource not found: {0}")]
    NotFound(String),

    /// A named resource exists but is not a usable CMap.
    #[error("malformed CMap resource {name}: {reason}")]
    Malformed {
        /// Name of the resource.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Syntax error in CMap program text, not yet tied to a resource name.
    #[error("CMap syntax error: {0}")]
    Parse(String),

    /// A configured limit was exceeded while loading.
    #[error("resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})")]
    LimitExceeded {
        /// Name of the limit (e.g., "max_range_len").
        limit_name: &'static str,
        /// The configured limit value.
        limit_value: usize,
        /// The actual value that exceeded it.
        actual_value: usize,
    },

    /// Error reading resource data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] CMapError),
}

impl LoaderError {
    /// Attach a resource name to a bare syntax error.
    pub fn in_resource(self, name: &str) -> Self {
        match self {
            LoaderError::Parse(reason) => LoaderError::Malformed {
                name: name.to_string(),
                reason,
            },
            LoaderError::Core(CMapError::InvalidByteCode(len)) => LoaderError::Malformed {
                name: name.to_string(),
                reason: format!("byte code of {len} bytes"),
            },
            other => other,
        }
    }

    /// Convert to [`CMapError`], naming the resource being loaded.
    pub fn into_cmap_error(self, name: &str) -> CMapError {
        self.in_resource(name).into()
    }
}

impl From<LoaderError> for CMapError {
    fn from(err: LoaderError) -> Self {
        match err {
            LoaderError::NotFound(name) => CMapError::ResourceNotFound(name),
            LoaderError::Malformed { name, reason } => {
                CMapError::MalformedResource { name, reason }
            }
            LoaderError::Parse(reason) => CMapError::MalformedResource {
                name: "<inline>".to_string(),
                reason,
            },
            LoaderError::LimitExceeded {
                limit_name,
                limit_value,
                actual_value,
            } => CMapError::ResourceLimitExceeded {
                limit_name: limit_name.to_string(),
                limit_value,
                actual_value,
            },
            LoaderError::Io(e) => CMapError::Io(e.to_string()),
            LoaderError::Core(e) => e,
        }
    }
}
