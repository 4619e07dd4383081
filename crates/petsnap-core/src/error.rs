//! Error types for PetSnap

/// Result type alias using PetSnap's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error carried as the source of wrapped failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core error type for PetSnap operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller supplied an empty image locator
    #[error("invalid image reference: {0}")]
    InvalidImageRef(String),

    /// Backend setup failed
    #[error("initialization error: {message}")]
    Initialization {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Backend is not ready and lazy initialization is disabled
    #[error("classifier is not ready; call load_model first")]
    NotReady,

    /// Image metadata could not be resolved
    #[error("preprocessing error for '{uri}': {source}")]
    Preprocessing {
        uri: String,
        #[source]
        source: BoxError,
    },

    /// Another classification is already running on this instance
    #[error("a classification is already in progress")]
    ConcurrentClassification,

    /// Inference backend failure
    #[error("inference error: {0}")]
    Inference(String),

    /// The classification was cancelled before it settled
    #[error("classification cancelled")]
    Cancelled,

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an initialization error without an underlying cause
    pub fn initialization(msg: impl Into<String>) -> Self {
        Self::Initialization {
            message: msg.into(),
            source: None,
        }
    }

    /// Create an initialization error wrapping the backend's failure
    pub fn initialization_with(msg: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Initialization {
            message: msg.into(),
            source: Some(source.into()),
        }
    }

    /// Create a preprocessing error for `uri`, keeping the platform error as source
    pub fn preprocessing(uri: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Preprocessing {
            uri: uri.into(),
            source: source.into(),
        }
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable snake_case tag, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidImageRef(_) => "invalid_image_ref",
            Self::Initialization { .. } => "initialization",
            Self::NotReady => "not_ready",
            Self::Preprocessing { .. } => "preprocessing",
            Self::ConcurrentClassification => "concurrent_classification",
            Self::Inference(_) => "inference",
            Self::Cancelled => "cancelled",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Internal(_) => "internal",
        }
    }
}
