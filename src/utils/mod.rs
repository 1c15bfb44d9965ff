//! Shared utilities and error types

pub mod error;

pub use error::{
    BridgeError, DocumentError, EaselError, LifecycleError, Result, SurfaceUnavailable,
};
