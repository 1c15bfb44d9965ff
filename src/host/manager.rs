//! Window lifecycle manager
//!
//! Owns the single application window as an optionally-empty slot inside an
//! explicit state machine:
//!
//! ```text
//! Uninitialized --start--> Ready --host ready--> WindowOpen --window closed--> Closed
//!                                                    ^                            |
//!                                                    +--------host ready----------+
//! ```

use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use super::config::WindowConfig;
use crate::bridge::{
    BridgeManifest, CapabilitySet, HostMessage, PresenterMessage, WindowControl, WindowOp,
};
use crate::document::read_document;
use crate::utils::{BridgeError, LifecycleError};

/// A native top-level window
pub trait NativeWindow: WindowControl {
    /// Toolkit identifier of the window
    fn id(&self) -> u64;
}

/// Creates native windows; only available once the toolkit is ready
#[cfg_attr(test, mockall::automock)]
pub trait WindowFactory {
    fn create_window(
        &mut self,
        config: &WindowConfig,
    ) -> Result<Box<dyn NativeWindow>, LifecycleError>;
}

/// Host end of the connection to a presenter process
#[cfg_attr(test, mockall::automock)]
pub trait PresenterLink {
    /// Process id of the presenter
    fn id(&self) -> u32;
    /// Send a message to the presenter
    fn send(&mut self, message: &HostMessage) -> Result<(), BridgeError>;
    /// Stop the presenter
    fn terminate(&mut self);
}

/// Starts presenter processes
#[cfg_attr(test, mockall::automock)]
pub trait PresenterSpawner {
    fn spawn(&mut self) -> Result<Box<dyn PresenterLink>, BridgeError>;
}

/// Observable lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Ready,
    WindowOpen,
    Closed,
}

struct OpenWindow {
    window: Box<dyn NativeWindow>,
    presenter: Option<Box<dyn PresenterLink>>,
}

enum Slot {
    Uninitialized,
    Ready,
    Open(OpenWindow),
    Closed,
}

/// Window lifecycle manager
pub struct WindowLifecycleManager {
    config: WindowConfig,
    document_root: PathBuf,
    capabilities: CapabilitySet,
    manifest: BridgeManifest,
    slot: Slot,
}

impl WindowLifecycleManager {
    /// Create a manager; documents resolve against `document_root`
    pub fn new(config: WindowConfig, document_root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            document_root: document_root.into(),
            capabilities: CapabilitySet::standard(),
            manifest: BridgeManifest::for_host(),
            slot: Slot::Uninitialized,
        }
    }

    /// Host startup: `Uninitialized -> Ready`. Later calls are ignored.
    pub fn start(&mut self) {
        if matches!(self.slot, Slot::Uninitialized) {
            self.slot = Slot::Ready;
        }
    }

    /// Current state
    pub fn state(&self) -> LifecycleState {
        match self.slot {
            Slot::Uninitialized => LifecycleState::Uninitialized,
            Slot::Ready => LifecycleState::Ready,
            Slot::Open(_) => LifecycleState::WindowOpen,
            Slot::Closed => LifecycleState::Closed,
        }
    }

    /// Number of windows alive (0 or 1)
    pub fn window_count(&self) -> usize {
        usize::from(matches!(self.slot, Slot::Open(_)))
    }

    /// Toolkit id of the open window
    pub fn window_id(&self) -> Option<u64> {
        match &self.slot {
            Slot::Open(open) => Some(open.window.id()),
            _ => None,
        }
    }

    /// Whether the open window has a live presenter
    pub fn has_presenter(&self) -> bool {
        matches!(&self.slot, Slot::Open(open) if open.presenter.is_some())
    }

    /// Process id of the presenter serving the open window
    pub fn presenter_id(&self) -> Option<u32> {
        match &self.slot {
            Slot::Open(open) => open.presenter.as_ref().map(|link| link.id()),
            _ => None,
        }
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Absolute path of the presentation document
    pub fn document_path(&self) -> PathBuf {
        self.document_root.join(&self.config.document)
    }

    /// The toolkit is ready: open the window, attach the bridge, then load
    /// the presentation document.
    pub fn on_host_ready(
        &mut self,
        factory: &mut dyn WindowFactory,
        spawner: &mut dyn PresenterSpawner,
    ) -> Result<(), LifecycleError> {
        match self.slot {
            Slot::Ready | Slot::Closed => {}
            Slot::Open(_) => return Err(LifecycleError::WindowAlreadyOpen),
            Slot::Uninitialized => return Err(LifecycleError::NotReady),
        }
        self.config.validate()?;

        let window = factory.create_window(&self.config)?;
        info!(
            "window {} opened ({}x{})",
            window.id(),
            self.config.width,
            self.config.height
        );

        let mut presenter = self.attach_bridge(spawner);
        if let Some(link) = presenter.as_mut() {
            self.load_presentation(link.as_mut());
        }

        self.slot = Slot::Open(OpenWindow { window, presenter });
        Ok(())
    }

    /// The native close notification arrived: release the window.
    ///
    /// Returns whether a window was released; without an open window this
    /// is a no-op.
    pub fn on_window_closed(&mut self) -> bool {
        if !matches!(self.slot, Slot::Open(_)) {
            debug!("window closed with no window open, ignoring");
            return false;
        }

        if let Slot::Open(open) = std::mem::replace(&mut self.slot, Slot::Closed) {
            let OpenWindow { window, presenter } = open;
            if let Some(mut link) = presenter {
                if let Err(e) = link.send(&HostMessage::Shutdown) {
                    debug!("presenter already gone: {}", e);
                }
                link.terminate();
            }
            info!("window {} closed", window.id());
        }
        true
    }

    /// Dispatch a bridge operation and resolve the call.
    ///
    /// The reply goes out once the action has been issued, not once it
    /// completed. Returns whether the operation reached a window.
    pub fn on_bridge_invoke(&mut self, id: u64, op: WindowOp) -> bool {
        let Slot::Open(open) = &mut self.slot else {
            self.capabilities.dispatch::<dyn NativeWindow>(op, None);
            return false;
        };

        debug!("bridge call #{} {}", id, op.exposed_name());
        let dispatched = self
            .capabilities
            .dispatch::<dyn NativeWindow>(op, Some(open.window.as_mut()));

        if let Some(link) = open.presenter.as_mut() {
            if let Err(e) = link.send(&HostMessage::Resolved { id }) {
                warn!("failed to resolve bridge call #{}: {}", id, e);
            }
        }
        dispatched
    }

    /// Route a message from the presenter
    pub fn on_presenter_message(&mut self, message: PresenterMessage) {
        match message {
            PresenterMessage::Invoke { id, op } => {
                self.on_bridge_invoke(id, op);
            }
            PresenterMessage::DocumentLoaded { url } => {
                info!("presentation document loaded: {}", url);
            }
        }
    }

    /// The presenter went away. The window stays open and empty.
    pub fn on_presenter_exited(&mut self) {
        match &mut self.slot {
            Slot::Open(open) if open.presenter.is_some() => {
                warn!("presenter exited; window stays open without content");
                if let Some(mut link) = open.presenter.take() {
                    link.terminate();
                }
            }
            _ => debug!("presenter exit after window release"),
        }
    }

    /// Spawn the presenter and hand it the bridge manifest. Content never
    /// loads without a bridge, so a failure here leaves the window empty.
    fn attach_bridge(&self, spawner: &mut dyn PresenterSpawner) -> Option<Box<dyn PresenterLink>> {
        let mut link = match spawner.spawn() {
            Ok(link) => link,
            Err(e) => {
                error!("bridge attachment failed: {}", e);
                return None;
            }
        };

        if let Err(e) = link.send(&self.manifest.attach_message()) {
            error!("bridge attachment failed: {}", e);
            link.terminate();
            return None;
        }
        debug!("bridge '{}' attached", self.manifest.global);
        Some(link)
    }

    /// Read the presentation document and ship it to the presenter.
    /// Failures are logged and not retried.
    fn load_presentation(&self, link: &mut dyn PresenterLink) {
        let path = self.document_path();
        let html = match read_document(&path) {
            Ok(html) => html,
            Err(e) => {
                error!("{}", e);
                return;
            }
        };

        let message = HostMessage::LoadDocument {
            url: file_url(&path),
            html,
        };
        if let Err(e) = link.send(&message) {
            error!("failed to load {}: {}", path.display(), e);
        }
    }
}

fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}
