//! Privileged host process
//!
//! Owns the native window and the presenter process:
//! - Window lifecycle manager: the only code that touches the toolkit
//! - Presenter process: spawned per window, reached only through the bridge

mod app;
mod config;
mod manager;
mod process;

pub use app::{route_event, run, HostApp, HostEvent};
pub use config::{install_dir, IsolationConfig, WindowConfig};
pub use manager::{
    LifecycleState, NativeWindow, PresenterLink, PresenterSpawner, WindowFactory,
    WindowLifecycleManager,
};
pub use process::{read_presenter, PresenterEvent, ProcessLink, ProcessSpawner};
