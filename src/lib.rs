//! # Easel - Isolated Drawing Shell
//!
//! A two-process desktop shell: a privileged host owns the window, and an
//! isolated presenter owns a raster canvas. The presenter can ask for window
//! control only through a fixed capability bridge.
//!
//! ## Architecture
//!
//! - **host**: window lifecycle manager, presenter process management, winit loop
//! - **bridge**: the capability set, its wire protocol and the presenter-side API
//! - **presenter**: the isolated process's event loop and page activation
//! - **document**: presentation document parsing
//! - **surface**: canvas surface, 2D raster context and paint operations
//! - **utils**: shared error types
//!
//! Start-up order is fixed: window, then bridge attachment, then document
//! load, then drawing surface.

pub mod bridge;
pub mod document;
pub mod host;
pub mod presenter;
pub mod surface;
pub mod utils;

// Re-export main types for convenience
pub use host::WindowLifecycleManager;
pub use surface::DrawingSurface;
pub use utils::error::{EaselError, Result};

/// Shell version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "Easel";
