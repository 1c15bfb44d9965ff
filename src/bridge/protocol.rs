//! Bridge wire protocol
//!
//! One JSON object per line, tagged by `type`. Payloads are plain values;
//! nothing on the wire refers to a live object in either process.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::utils::BridgeError;

/// Version of the line protocol, reported in `versions`
pub const PROTOCOL_VERSION: &str = "1";

/// Window-control operations the presenter may invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowOp {
    MinimizeWindow,
    CloseWindow,
}

impl WindowOp {
    /// Name under which the operation is exposed in the bridge global
    pub fn exposed_name(&self) -> &'static str {
        match self {
            WindowOp::MinimizeWindow => "minimizeWindow",
            WindowOp::CloseWindow => "closeWindow",
        }
    }
}

/// Messages sent by the host to the presenter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostMessage {
    /// Attach the bridge global. Must precede any document.
    Attach {
        global: String,
        platform: String,
        versions: BTreeMap<String, String>,
        exposed: Vec<String>,
    },
    /// Load a presentation document
    LoadDocument { url: String, html: String },
    /// A bridge call has been dispatched
    Resolved { id: u64 },
    /// The presenter should exit
    Shutdown,
}

/// Messages sent by the presenter to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresenterMessage {
    /// Invoke a window operation
    Invoke { id: u64, op: WindowOp },
    /// The document finished loading
    DocumentLoaded { url: String },
}

/// Encode a message as a single line (newline included)
pub fn encode_line<T: Serialize>(message: &T) -> Result<String, BridgeError> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}

/// Decode a single line
pub fn decode_line<T: for<'de> Deserialize<'de>>(line: &str) -> Result<T, BridgeError> {
    Ok(serde_json::from_str(line.trim_end())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_invoke_wire_shape() {
        let line = encode_line(&PresenterMessage::Invoke {
            id: 7,
            op: WindowOp::CloseWindow,
        })
        .unwrap();
        assert_eq!(line, "{\"type\":\"invoke\",\"id\":7,\"op\":\"close_window\"}\n");
    }

    #[test]
    fn test_decode_host_message() {
        let msg: HostMessage = decode_line("{\"type\":\"resolved\",\"id\":3}\n").unwrap();
        assert_eq!(msg, HostMessage::Resolved { id: 3 });
    }

    #[test]
    fn test_unknown_operation_rejected() {
        let result: Result<PresenterMessage, _> =
            decode_line("{\"type\":\"invoke\",\"id\":1,\"op\":\"read_file\"}");
        assert!(matches!(result, Err(BridgeError::Codec(_))));
    }
}
