//! Error types for the Easel shell

use thiserror::Error;

/// Main error type for Easel operations
#[derive(Debug, Error)]
pub enum EaselError {
    /// The windowing toolkit never became ready
    #[error("toolkit readiness failure: {0}")]
    Toolkit(String),
    /// Window lifecycle errors
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    /// Presentation document errors
    #[error(transparent)]
    Document(#[from] DocumentError),
    /// Drawing surface errors
    #[error(transparent)]
    Surface(#[from] SurfaceUnavailable),
    /// Capability bridge errors
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Window lifecycle errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// Host readiness arrived before the manager was started
    #[error("window manager is not ready")]
    NotReady,
    /// Host readiness arrived while a window is still open
    #[error("a window is already open")]
    WindowAlreadyOpen,
    /// The fixed window manifest is not usable
    #[error("invalid window configuration: {0}")]
    InvalidConfig(String),
    /// The toolkit refused to create the window
    #[error("window creation failed: {0}")]
    WindowCreation(String),
}

/// Presentation document errors
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document could not be read from disk
    #[error("failed to load document {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// HTML parsing failed
    #[error("failed to parse document: {0}")]
    Parse(String),
}

/// The drawing surface could not be constructed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceUnavailable {
    /// No element carries the canvas identifier
    #[error("surface unavailable: no element with id '{0}'")]
    MissingElement(String),
    /// The element exists but does not support 2D raster binding
    #[error("surface unavailable: element '{id}' is a <{tag}>, not a <canvas>")]
    ContextBinding { id: String, tag: String },
}

/// Capability bridge errors
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A message could not be encoded or decoded
    #[error("malformed bridge message: {0}")]
    Codec(#[from] serde_json::Error),
    /// The other side of the bridge is gone
    #[error("bridge disconnected")]
    Disconnected,
    /// The presenter process could not be started
    #[error("failed to spawn presenter: {0}")]
    Spawn(String),
    /// Messages arrived in an order that breaks the isolation boundary
    #[error("bridge protocol violation: {0}")]
    Protocol(String),
}

/// Convenience Result type for Easel operations
pub type Result<T> = std::result::Result<T, EaselError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_error_display() {
        let err = SurfaceUnavailable::MissingElement("canvas".to_string());
        assert_eq!(
            err.to_string(),
            "surface unavailable: no element with id 'canvas'"
        );
    }

    #[test]
    fn test_error_conversion() {
        let err: EaselError = LifecycleError::WindowAlreadyOpen.into();
        assert!(matches!(
            err,
            EaselError::Lifecycle(LifecycleError::WindowAlreadyOpen)
        ));
    }
}
