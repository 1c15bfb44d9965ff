//! Host event loop on winit

use log::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

use super::config::{install_dir, WindowConfig};
use super::manager::{
    LifecycleState, NativeWindow, PresenterSpawner, WindowFactory, WindowLifecycleManager,
};
use super::process::{PresenterEvent, ProcessSpawner};
use crate::bridge::WindowControl;
use crate::utils::{EaselError, LifecycleError, Result};

/// Events the host loop routes to the lifecycle manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Output from a presenter's reader thread, tagged with its pid
    Presenter { presenter: u32, event: PresenterEvent },
    /// A bridge call asked for this window to close
    CloseRequested(u64),
    /// The toolkit closed or destroyed this window
    WindowClosed(u64),
}

/// Apply one host event to the manager.
///
/// Events for another window or from a presenter that no longer serves the
/// open window are dropped. Returns whether the loop should exit.
pub fn route_event(manager: &mut WindowLifecycleManager, event: HostEvent) -> bool {
    match event {
        HostEvent::Presenter { presenter, event } => {
            if manager.presenter_id() != Some(presenter) {
                debug!("dropping {:?} from stale presenter {}", event, presenter);
                return false;
            }
            match event {
                PresenterEvent::Message(message) => manager.on_presenter_message(message),
                PresenterEvent::Disconnected => manager.on_presenter_exited(),
            }
            false
        }
        HostEvent::CloseRequested(window) | HostEvent::WindowClosed(window) => {
            if manager.window_id() != Some(window) {
                return false;
            }
            let closed = manager.on_window_closed();
            if closed {
                info!("last window closed, exiting");
            }
            closed
        }
    }
}

/// A winit window under the manager's control
struct ShellWindow {
    window: Window,
    proxy: EventLoopProxy<HostEvent>,
}

impl WindowControl for ShellWindow {
    fn minimize(&mut self) {
        self.window.set_minimized(true);
    }

    fn request_close(&mut self) {
        // Teardown runs later on the loop, like a native close
        if self
            .proxy
            .send_event(HostEvent::CloseRequested(self.id()))
            .is_err()
        {
            warn!("event loop closed, dropping close request");
        }
    }
}

impl NativeWindow for ShellWindow {
    fn id(&self) -> u64 {
        u64::from(self.window.id())
    }
}

/// Creates windows on the active event loop
struct ShellWindowFactory<'a> {
    event_loop: &'a ActiveEventLoop,
    proxy: EventLoopProxy<HostEvent>,
}

impl WindowFactory for ShellWindowFactory<'_> {
    fn create_window(
        &mut self,
        config: &WindowConfig,
    ) -> std::result::Result<Box<dyn NativeWindow>, LifecycleError> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height));

        let window = self
            .event_loop
            .create_window(attrs)
            .map_err(|e| LifecycleError::WindowCreation(e.to_string()))?;

        Ok(Box::new(ShellWindow {
            window,
            proxy: self.proxy.clone(),
        }))
    }
}

/// The host application
pub struct HostApp<S> {
    manager: WindowLifecycleManager,
    spawner: S,
    proxy: EventLoopProxy<HostEvent>,
}

impl<S: PresenterSpawner> HostApp<S> {
    pub fn new(manager: WindowLifecycleManager, spawner: S, proxy: EventLoopProxy<HostEvent>) -> Self {
        Self {
            manager,
            spawner,
            proxy,
        }
    }

    fn route(&mut self, event_loop: &ActiveEventLoop, event: HostEvent) {
        if route_event(&mut self.manager, event) {
            event_loop.exit();
        }
    }
}

impl<S: PresenterSpawner> ApplicationHandler<HostEvent> for HostApp<S> {
    // Toolkit readiness. May fire again on resume; only the first one opens a window.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.manager.state() != LifecycleState::Ready {
            return;
        }

        let mut factory = ShellWindowFactory {
            event_loop,
            proxy: self.proxy.clone(),
        };
        if let Err(e) = self.manager.on_host_ready(&mut factory, &mut self.spawner) {
            error!("failed to open window: {}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                self.route(event_loop, HostEvent::WindowClosed(u64::from(window_id)));
            }
            _ => {}
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: HostEvent) {
        self.route(event_loop, event);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.manager.on_window_closed();
    }
}

/// Run the host: wait for the toolkit, open the window, serve the bridge
pub fn run() -> Result<()> {
    let event_loop = EventLoop::<HostEvent>::with_user_event()
        .build()
        .map_err(|e| EaselError::Toolkit(e.to_string()))?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let proxy = event_loop.create_proxy();
    let sink = {
        let proxy = proxy.clone();
        move |presenter: u32, event: PresenterEvent| {
            // The loop may already be gone during shutdown
            let _ = proxy.send_event(HostEvent::Presenter { presenter, event });
        }
    };
    let spawner = ProcessSpawner::current_exe(sink)?;

    let mut manager = WindowLifecycleManager::new(WindowConfig::default(), install_dir()?);
    manager.start();
    info!("host ready, document at {}", manager.document_path().display());

    let mut app = HostApp::new(manager, spawner, proxy);
    event_loop
        .run_app(&mut app)
        .map_err(|e| EaselError::Toolkit(e.to_string()))
}
