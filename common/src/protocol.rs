//! # Wire Protocol
//!
//! JSON messages exchanged over the scan WebSocket.
//!
//! * The controller sends a [`ScanRequest`] per scan run.
//! * The service answers with one [`ScanResult`] per probed target and a single
//!   completion signal once every probe of that request has finished.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Which measurement a scan performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    /// TCP connect latency.
    Ping,
    /// HTTP download throughput.
    Speed,
}

impl ScanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanKind::Ping => "ping",
            ScanKind::Speed => "speed",
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to probe a list of targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRequest {
    #[serde(rename = "type")]
    pub kind: ScanKind,
    /// Raw target entries: IPs, hostnames or CIDR blocks.
    pub ips: Vec<String>,
    pub port: u16,
    #[serde(default)]
    pub download_url: String,
    /// Upper bound for reported ping times in milliseconds. `0` disables the filter.
    #[serde(default)]
    pub max_latency: u64,
}

/// Outcome of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Ok,
    Timeout,
    Error,
    /// Any status label this build does not know.
    #[serde(other)]
    Unknown,
}

impl ProbeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Ok => "ok",
            ProbeStatus::Timeout => "timeout",
            ProbeStatus::Error => "error",
            ProbeStatus::Unknown => "unknown",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ProbeStatus::Ok)
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-target measurement streamed back while a scan runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Position of the target in the expanded input list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<usize>,
    pub ip: String,
    pub port: u16,
    /// Connect latency in milliseconds, `0` when not measured.
    #[serde(default)]
    pub ping_time: i64,
    /// Throughput in MB/s, `0.0` when not measured.
    #[serde(default)]
    pub download: f64,
    pub status: ProbeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_msg: Option<String>,
}

impl ScanResult {
    pub fn new(ip: impl Into<String>, port: u16, status: ProbeStatus) -> Self {
        Self {
            order: None,
            ip: ip.into(),
            port,
            ping_time: 0,
            download: 0.0,
            status,
            error_msg: None,
        }
    }

    pub fn with_error(mut self, msg: impl Into<String>) -> Self {
        self.error_msg = Some(msg.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoneStatus {
    Done,
}

/// Anything the service sends over the socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    /// `{"status":"done"}`, sent once per request after its last result.
    Done { status: DoneStatus },
    Result(ScanResult),
}

impl ServerMessage {
    pub fn done() -> Self {
        ServerMessage::Done {
            status: DoneStatus::Done,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, ServerMessage::Done { .. })
    }

    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

impl From<ScanResult> for ServerMessage {
    fn from(result: ScanResult) -> Self {
        ServerMessage::Result(result)
    }
}

impl ScanRequest {
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        serde_json::from_slice(bytes).map_err(ProtocolError::Decode)
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_wire_field_names() {
        let req = ScanRequest {
            kind: ScanKind::Speed,
            ips: vec!["1.1.1.1".into()],
            port: 443,
            download_url: "https://example.com/file".into(),
            max_latency: 250,
        };
        let value: serde_json::Value = serde_json::from_str(&req.encode().unwrap()).unwrap();
        assert_eq!(value["type"], "speed");
        assert_eq!(value["ips"][0], "1.1.1.1");
        assert_eq!(value["port"], 443);
        assert_eq!(value["download_url"], "https://example.com/file");
        assert_eq!(value["max_latency"], 250);
    }

    #[test]
    fn request_tolerates_missing_optional_fields() {
        let req = ScanRequest::decode(br#"{"type":"ping","ips":["a"],"port":80}"#).unwrap();
        assert_eq!(req.kind, ScanKind::Ping);
        assert_eq!(req.max_latency, 0);
        assert!(req.download_url.is_empty());
    }

    #[test]
    fn done_signal_is_recognised() {
        let msg = ServerMessage::decode(r#"{"status":"done"}"#).unwrap();
        assert!(msg.is_done());
        assert_eq!(ServerMessage::done().encode().unwrap(), r#"{"status":"done"}"#);
    }

    #[test]
    fn result_without_order_decodes() {
        let msg = ServerMessage::decode(
            r#"{"ip":"104.16.0.1","port":443,"ping_time":42,"download":0,"status":"ok"}"#,
        )
        .unwrap();
        match msg {
            ServerMessage::Result(res) => {
                assert_eq!(res.order, None);
                assert_eq!(res.ping_time, 42);
                assert!(res.status.is_ok());
            }
            other => panic!("expected a result, got {other:?}"),
        }
    }

    #[test]
    fn result_with_error_keeps_message() {
        let msg = ServerMessage::decode(
            r#"{"order":3,"ip":"h","port":1,"ping_time":0,"download":0,"status":"error","error_msg":"refused"}"#,
        )
        .unwrap();
        let ServerMessage::Result(res) = msg else {
            panic!("expected a result");
        };
        assert_eq!(res.order, Some(3));
        assert_eq!(res.status, ProbeStatus::Error);
        assert_eq!(res.error_msg.as_deref(), Some("refused"));
    }

    #[test]
    fn unfamiliar_status_still_decodes() {
        let msg = ServerMessage::decode(
            r#"{"ip":"h","port":1,"ping_time":0,"download":0,"status":"refused"}"#,
        )
        .unwrap();
        let ServerMessage::Result(res) = msg else {
            panic!("expected a result");
        };
        assert_eq!(res.status, ProbeStatus::Unknown);
        assert!(!res.status.is_ok());
        assert_eq!(res.status.as_str(), "unknown");
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(ServerMessage::decode("not json").is_err());
        assert!(ServerMessage::decode(r#"{"status":"ok"}"#).is_err());
    }
}
