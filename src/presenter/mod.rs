//! Isolated presenter process
//!
//! The presenter runs one cooperative event loop on a current-thread tokio
//! runtime. It reads [`HostMessage`]s line by line from the host, writes
//! [`PresenterMessage`]s back, and moves through a strict sequence:
//! bridge attached, then document loaded, then drawing surface activated.

mod page;

pub use page::Page;

use log::{debug, error, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::bridge::protocol::{decode_line, encode_line};
use crate::bridge::{BridgeApi, GlobalScope, HostMessage, PresenterMessage};
use crate::document::HtmlParser;
use crate::utils::{BridgeError, Result};

/// Command-line flag that starts the binary in presenter mode
pub const PRESENTER_FLAG: &str = "--presenter";

/// What the read loop should do after handling a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Presenter state: global scope and the current page
pub struct Presenter {
    outbound: mpsc::UnboundedSender<PresenterMessage>,
    globals: Option<GlobalScope>,
    page: Option<Page>,
    parser: HtmlParser,
    loads: u64,
}

impl Presenter {
    /// Create a presenter that sends its messages to `outbound`
    pub fn new(outbound: mpsc::UnboundedSender<PresenterMessage>) -> Self {
        Self {
            outbound,
            globals: None,
            page: None,
            parser: HtmlParser::new(),
            loads: 0,
        }
    }

    /// Handle one message from the host
    pub fn handle(&mut self, message: HostMessage) -> Result<Flow> {
        match message {
            HostMessage::Attach {
                global,
                platform,
                versions,
                exposed,
            } => {
                if self.globals.is_some() {
                    return Err(BridgeError::Protocol("bridge attached twice".to_string()).into());
                }
                let scope = GlobalScope::attach(
                    &global,
                    platform,
                    versions,
                    &exposed,
                    self.outbound.clone(),
                )?;
                info!(
                    "bridge '{}' attached (platform {})",
                    global,
                    scope.bridge().platform()
                );
                self.globals = Some(scope);
            }
            HostMessage::LoadDocument { url, html } => {
                if self.globals.is_none() {
                    return Err(BridgeError::Protocol(format!(
                        "document {} arrived before bridge attachment",
                        url
                    ))
                    .into());
                }
                self.load_document(url, &html)?;
            }
            HostMessage::Resolved { id } => {
                let resolved = self.bridge().is_some_and(|bridge| bridge.resolve(id));
                if !resolved {
                    debug!("resolution for unknown call #{}", id);
                }
            }
            HostMessage::Shutdown => {
                info!("host requested shutdown");
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    /// Parse a new document, signal document-ready, then activate the
    /// drawing surface for it. Replaces any previous page.
    fn load_document(&mut self, url: String, html: &str) -> Result<()> {
        let document = self.parser.parse(html)?;
        self.loads += 1;
        debug!("document {} parsed (load #{})", url, self.loads);

        if self.outbound.send(PresenterMessage::DocumentLoaded { url: url.clone() }).is_err() {
            warn!("host gone before document-ready could be reported");
        }

        let mut page = Page::new(url, document);
        if let Err(e) = page.activate() {
            // No channel back to the host for this; it stays local
            error!("{}", e);
        }
        self.page = Some(page);
        Ok(())
    }

    /// The bridge, once attached
    pub fn bridge(&self) -> Option<&BridgeApi> {
        self.globals.as_ref().map(GlobalScope::bridge)
    }

    /// The global scope, once attached
    pub fn globals(&self) -> Option<&GlobalScope> {
        self.globals.as_ref()
    }

    /// The current page
    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    /// Number of documents loaded so far
    pub fn loads(&self) -> u64 {
        self.loads
    }

    /// Release callers still waiting on the host
    fn disconnect(&self) {
        if let Some(bridge) = self.bridge() {
            bridge.disconnect();
        }
    }
}

/// Serve the presenter protocol over a reader/writer pair until the host
/// hangs up or asks us to stop.
pub async fn serve<R, W>(reader: R, writer: W) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let writer_task = tokio::spawn(write_messages(rx, writer));

    let mut presenter = Presenter::new(tx);
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let message: HostMessage = match decode_line(&line) {
            Ok(message) => message,
            Err(e) => {
                warn!("dropping host message: {}", e);
                continue;
            }
        };
        match presenter.handle(message) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(e) => error!("{}", e),
        }
    }

    presenter.disconnect();
    drop(presenter);
    match writer_task.await {
        Ok(result) => result,
        Err(e) => {
            error!("presenter writer task failed: {}", e);
            Ok(())
        }
    }
}

async fn write_messages<W>(mut rx: mpsc::UnboundedReceiver<PresenterMessage>, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = rx.recv().await {
        let line = encode_line(&message)?;
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}

/// Run the presenter on stdin/stdout
pub fn run() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(tokio::io::stdin(), tokio::io::stdout()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{BridgeManifest, WindowOp};
    use crate::utils::EaselError;

    const CANVAS_HTML: &str = r#"<html><body><canvas id="canvas"></canvas></body></html>"#;

    fn presenter() -> (Presenter, mpsc::UnboundedReceiver<PresenterMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Presenter::new(tx), rx)
    }

    fn load(html: &str) -> HostMessage {
        HostMessage::LoadDocument {
            url: "file:///renderer/index.html".to_string(),
            html: html.to_string(),
        }
    }

    #[test]
    fn test_document_before_bridge_is_refused() {
        let (mut presenter, _rx) = presenter();
        let err = presenter.handle(load(CANVAS_HTML)).unwrap_err();
        assert!(matches!(err, EaselError::Bridge(BridgeError::Protocol(_))));
        assert!(presenter.page().is_none());
        assert_eq!(presenter.loads(), 0);
    }

    #[test]
    fn test_attach_then_load_activates_surface() {
        let (mut presenter, mut rx) = presenter();
        presenter
            .handle(BridgeManifest::for_host().attach_message())
            .unwrap();
        presenter.handle(load(CANVAS_HTML)).unwrap();

        assert!(matches!(
            rx.try_recv().unwrap(),
            PresenterMessage::DocumentLoaded { .. }
        ));
        let surface = presenter.page().unwrap().surface().unwrap();
        assert_eq!(surface.raster().get_pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_second_attach_rejected() {
        let (mut presenter, _rx) = presenter();
        let attach = BridgeManifest::for_host().attach_message();
        presenter.handle(attach.clone()).unwrap();
        assert!(presenter.handle(attach).is_err());
    }

    #[test]
    fn test_missing_canvas_keeps_page_without_surface() {
        let (mut presenter, _rx) = presenter();
        presenter
            .handle(BridgeManifest::for_host().attach_message())
            .unwrap();
        presenter.handle(load("<body><p>empty</p></body>")).unwrap();
        let page = presenter.page().unwrap();
        assert!(page.surface().is_none());
    }

    #[test]
    fn test_shutdown_exits() {
        let (mut presenter, _rx) = presenter();
        assert_eq!(presenter.handle(HostMessage::Shutdown).unwrap(), Flow::Exit);
    }

    #[tokio::test]
    async fn test_serve_round_trip() {
        let (host_side, presenter_side) = tokio::io::duplex(64 * 1024);
        let (presenter_read, presenter_write) = tokio::io::split(presenter_side);
        let server = tokio::spawn(serve(presenter_read, presenter_write));

        let (host_read, mut host_write) = tokio::io::split(host_side);
        let mut host_lines = BufReader::new(host_read).lines();

        for message in [BridgeManifest::for_host().attach_message(), load(CANVAS_HTML)] {
            host_write
                .write_all(encode_line(&message).unwrap().as_bytes())
                .await
                .unwrap();
        }
        host_write.write_all(b"not json\n").await.unwrap();

        let line = host_lines.next_line().await.unwrap().unwrap();
        let message: PresenterMessage = decode_line(&line).unwrap();
        assert_eq!(
            message,
            PresenterMessage::DocumentLoaded {
                url: "file:///renderer/index.html".to_string()
            }
        );

        host_write
            .write_all(encode_line(&HostMessage::Shutdown).unwrap().as_bytes())
            .await
            .unwrap();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_bridge_call_through_presenter() {
        let (mut presenter, mut rx) = presenter();
        presenter
            .handle(BridgeManifest::for_host().attach_message())
            .unwrap();
        let bridge = presenter.bridge().unwrap().clone();

        let call = tokio::spawn(async move { bridge.close_window().await });
        let id = match rx.recv().await.unwrap() {
            PresenterMessage::Invoke { id, op: WindowOp::CloseWindow } => id,
            other => panic!("unexpected message {:?}", other),
        };
        presenter.handle(HostMessage::Resolved { id }).unwrap();
        call.await.unwrap();
    }
}
