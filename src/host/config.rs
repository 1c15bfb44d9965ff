//! Fixed window manifest

use std::env;
use std::io;
use std::path::PathBuf;

use crate::utils::LifecycleError;

/// How documents loaded into the window are isolated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsolationConfig {
    /// Whether document code may reach native host APIs
    pub native_code: bool,
    /// Whether document code runs in its own process and global scope
    pub isolated_world: bool,
    /// The single script allowed to inject into the isolated world
    pub bridge_script: String,
}

impl Default for IsolationConfig {
    fn default() -> Self {
        Self {
            native_code: false,
            isolated_world: true,
            bridge_script: "preload".to_string(),
        }
    }
}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub isolation: IsolationConfig,
    /// Presentation document, relative to the install directory
    pub document: PathBuf,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: crate::NAME.to_string(),
            width: 800,
            height: 600,
            isolation: IsolationConfig::default(),
            document: PathBuf::from("renderer").join("index.html"),
        }
    }
}

impl WindowConfig {
    /// Reject manifests that would open an unusable or unisolated window
    pub fn validate(&self) -> Result<(), LifecycleError> {
        if self.width == 0 || self.height == 0 {
            return Err(LifecycleError::InvalidConfig(format!(
                "window size {}x{} must be positive",
                self.width, self.height
            )));
        }
        if self.isolation.native_code {
            return Err(LifecycleError::InvalidConfig(
                "documents must not reach native code".to_string(),
            ));
        }
        if !self.isolation.isolated_world {
            return Err(LifecycleError::InvalidConfig(
                "documents must run in an isolated world".to_string(),
            ));
        }
        if self.isolation.bridge_script.is_empty() {
            return Err(LifecycleError::InvalidConfig(
                "a bridge script must be designated".to_string(),
            ));
        }
        if self.document.is_absolute() {
            return Err(LifecycleError::InvalidConfig(
                "document path must be relative to the install directory".to_string(),
            ));
        }
        Ok(())
    }
}

/// Directory holding the running executable
pub fn install_dir() -> io::Result<PathBuf> {
    let exe = env::current_exe()?;
    exe.parent()
        .map(PathBuf::from)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "executable has no parent directory"))
}
