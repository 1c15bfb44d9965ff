//! Capability bridge between the host and the isolated presenter
//!
//! The bridge exposes exactly four names to the presenter: two read-only
//! values and two window-control operations. Operations travel as
//! [`protocol::PresenterMessage::Invoke`] requests and are answered with
//! [`protocol::HostMessage::Resolved`] once the host has dispatched them.

mod client;
pub mod protocol;

pub use client::{BridgeApi, GlobalScope};
pub use protocol::{HostMessage, PresenterMessage, WindowOp, PROTOCOL_VERSION};

use std::collections::BTreeMap;

use log::debug;

use crate::utils::BridgeError;

/// Name of the bridge global in the presenter
pub const BRIDGE_GLOBAL: &str = "easelApi";

/// Every name the bridge exposes, fixed at build time
pub const EXPOSED_NAMES: [&str; 4] = ["platform", "versions", "minimizeWindow", "closeWindow"];

/// Window actions a capability handler may perform
pub trait WindowControl {
    /// Minimize the window
    fn minimize(&mut self);
    /// Ask the toolkit to close the window; teardown happens later
    fn request_close(&mut self);
}

/// Host-side action a bridge operation maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    Minimize,
    RequestClose,
}

impl WindowAction {
    fn apply<W: WindowControl + ?Sized>(self, window: &mut W) {
        match self {
            WindowAction::Minimize => window.minimize(),
            WindowAction::RequestClose => window.request_close(),
        }
    }
}

/// Immutable mapping from operation to host-side handler
pub struct CapabilitySet {
    handlers: BTreeMap<WindowOp, WindowAction>,
}

impl CapabilitySet {
    /// The standard window-control capabilities
    pub fn standard() -> Self {
        let handlers = BTreeMap::from([
            (WindowOp::MinimizeWindow, WindowAction::Minimize),
            (WindowOp::CloseWindow, WindowAction::RequestClose),
        ]);
        Self { handlers }
    }

    /// Operations backed by a handler
    pub fn operations(&self) -> impl Iterator<Item = WindowOp> + '_ {
        self.handlers.keys().copied()
    }

    /// Handler registered for `op`
    pub fn handler(&self, op: WindowOp) -> Option<WindowAction> {
        self.handlers.get(&op).copied()
    }

    /// Run the handler for `op` against the window, if there is one.
    ///
    /// Returns whether a handler ran. With no window this is a no-op.
    pub fn dispatch<W: WindowControl + ?Sized>(&self, op: WindowOp, window: Option<&mut W>) -> bool {
        match (self.handler(op), window) {
            (Some(action), Some(window)) => {
                action.apply(window);
                true
            }
            (_, None) => {
                debug!("{} with no window open, ignoring", op.exposed_name());
                false
            }
            (None, Some(_)) => false,
        }
    }
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Plain values handed to the presenter when the bridge is attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeManifest {
    pub global: String,
    pub platform: String,
    pub versions: BTreeMap<String, String>,
    pub exposed: Vec<String>,
}

impl BridgeManifest {
    /// Manifest describing this host
    pub fn for_host() -> Self {
        let mut versions = BTreeMap::new();
        versions.insert(crate::NAME.to_lowercase(), crate::VERSION.to_string());
        versions.insert("bridge".to_string(), PROTOCOL_VERSION.to_string());

        Self {
            global: BRIDGE_GLOBAL.to_string(),
            platform: std::env::consts::OS.to_string(),
            versions,
            exposed: EXPOSED_NAMES.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// The attach message carrying this manifest
    pub fn attach_message(&self) -> HostMessage {
        HostMessage::Attach {
            global: self.global.clone(),
            platform: self.platform.clone(),
            versions: self.versions.clone(),
            exposed: self.exposed.clone(),
        }
    }
}

/// Check that a set of exposed names is exactly [`EXPOSED_NAMES`]
pub fn verify_exposed(names: &[String]) -> Result<(), BridgeError> {
    let mut given: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut expected: Vec<&str> = EXPOSED_NAMES.to_vec();
    given.sort_unstable();
    given.dedup();
    expected.sort_unstable();

    if given.len() != names.len() || given != expected {
        return Err(BridgeError::Protocol(format!(
            "exposed names {:?} differ from {:?}",
            names, EXPOSED_NAMES
        )));
    }
    Ok(())
}
