//! Presenter child process
//!
//! The presenter is this same executable started with
//! [`PRESENTER_FLAG`](crate::presenter::PRESENTER_FLAG). It gets a cleared
//! environment and talks to the host only over its stdin/stdout pipes.

use std::env;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use super::manager::{PresenterLink, PresenterSpawner};
use crate::bridge::protocol::{decode_line, encode_line};
use crate::bridge::{HostMessage, PresenterMessage};
use crate::presenter::PRESENTER_FLAG;
use crate::utils::BridgeError;

/// Environment variables passed through to the presenter
const PASSTHROUGH_ENV: [&str; 3] = ["RUST_LOG", "RUST_BACKTRACE", "SYSTEMROOT"];

/// How long a presenter gets to exit on its own before it is killed
const EXIT_GRACE: Duration = Duration::from_millis(500);

/// Something the presenter said, or its disappearance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterEvent {
    Message(PresenterMessage),
    Disconnected,
}

/// Spawns presenter processes and forwards their output to `sink`, tagged
/// with the presenter's process id
pub struct ProcessSpawner<S> {
    program: PathBuf,
    sink: S,
}

impl<S> ProcessSpawner<S>
where
    S: Fn(u32, PresenterEvent) + Clone + Send + 'static,
{
    pub fn new(program: impl Into<PathBuf>, sink: S) -> Self {
        Self {
            program: program.into(),
            sink,
        }
    }

    /// Spawner that re-runs the current executable
    pub fn current_exe(sink: S) -> io::Result<Self> {
        Ok(Self::new(env::current_exe()?, sink))
    }
}

impl<S> PresenterSpawner for ProcessSpawner<S>
where
    S: Fn(u32, PresenterEvent) + Clone + Send + 'static,
{
    fn spawn(&mut self) -> Result<Box<dyn PresenterLink>, BridgeError> {
        let mut command = Command::new(&self.program);
        command
            .arg(PRESENTER_FLAG)
            .env_clear()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        for key in PASSTHROUGH_ENV {
            if let Some(value) = env::var_os(key) {
                command.env(key, value);
            }
        }

        let mut child = command
            .spawn()
            .map_err(|e| BridgeError::Spawn(format!("{}: {}", self.program.display(), e)))?;
        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let (Some(stdin), Some(stdout)) = (stdin, stdout) else {
            let _ = child.kill();
            return Err(BridgeError::Spawn("presenter pipes unavailable".to_string()));
        };

        let pid = child.id();
        let sink = self.sink.clone();
        let reader = thread::Builder::new()
            .name("presenter-reader".to_string())
            .spawn(move || read_presenter(stdout, |event| sink(pid, event)));
        if let Err(e) = reader {
            let _ = child.kill();
            return Err(BridgeError::Spawn(e.to_string()));
        }

        info!("presenter started (pid {})", pid);
        Ok(Box::new(ProcessLink {
            pid,
            child: Some(child),
            stdin: Some(stdin),
        }))
    }
}

/// Forward presenter output line by line until the pipe closes
pub fn read_presenter<R, S>(reader: R, sink: S)
where
    R: Read,
    S: Fn(PresenterEvent),
{
    for line in BufReader::new(reader).lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("presenter pipe failed: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match decode_line::<PresenterMessage>(&line) {
            Ok(message) => sink(PresenterEvent::Message(message)),
            Err(e) => warn!("dropping presenter message: {}", e),
        }
    }
    sink(PresenterEvent::Disconnected);
}

/// A running presenter process
pub struct ProcessLink {
    pid: u32,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
}

impl PresenterLink for ProcessLink {
    fn id(&self) -> u32 {
        self.pid
    }

    fn send(&mut self, message: &HostMessage) -> Result<(), BridgeError> {
        let stdin = self.stdin.as_mut().ok_or(BridgeError::Disconnected)?;
        let line = encode_line(message)?;
        stdin
            .write_all(line.as_bytes())
            .and_then(|_| stdin.flush())
            .map_err(|e| {
                debug!("presenter write failed: {}", e);
                BridgeError::Disconnected
            })
    }

    /// Close the presenter's stdin and reap it off the calling thread
    fn terminate(&mut self) {
        // Closing stdin is the presenter's cue to exit
        self.stdin.take();
        let Some(child) = self.child.take() else {
            return;
        };

        let reaper = thread::Builder::new()
            .name("presenter-reaper".to_string())
            .spawn(move || reap(child, EXIT_GRACE));
        if let Err(e) = reaper {
            warn!("failed to reap presenter {}: {}", self.pid, e);
        }
    }
}

/// Wait up to `grace` for the child to exit, then kill it
fn reap(mut child: Child, grace: Duration) {
    let deadline = Instant::now() + grace;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!("presenter {} exited with {}", child.id(), status);
                return;
            }
            Ok(None) if Instant::now() < deadline => thread::sleep(Duration::from_millis(10)),
            Ok(None) => break,
            Err(e) => {
                warn!("failed to poll presenter {}: {}", child.id(), e);
                break;
            }
        }
    }

    warn!("presenter {} did not exit in time, killing it", child.id());
    let _ = child.kill();
    let _ = child.wait();
}

impl Drop for ProcessLink {
    fn drop(&mut self) {
        self.terminate();
    }
}
