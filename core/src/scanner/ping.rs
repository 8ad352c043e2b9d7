//! TCP-connect latency probe.
//!
//! A completed three-way handshake counts as a reply. No raw sockets are
//! involved, so this works without elevated privileges.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use cfping_common::protocol::{ProbeStatus, ScanResult};
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::Prober;

pub struct TcpPinger {
    timeout: Duration,
}

impl TcpPinger {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Prober for TcpPinger {
    async fn probe(&self, target: &str, port: u16) -> ScanResult {
        let start_time: Instant = Instant::now();

        match timeout(self.timeout, TcpStream::connect((target, port))).await {
            Ok(Ok(_stream)) => {
                let mut result = ScanResult::new(target, port, ProbeStatus::Ok);
                result.ping_time = i64::try_from(start_time.elapsed().as_millis()).unwrap_or(i64::MAX);
                result
            }
            Ok(Err(e)) => ScanResult::new(target, port, ProbeStatus::Error).with_error(e.to_string()),
            Err(_elapsed) => ScanResult::new(target, port, ProbeStatus::Timeout).with_error(format!(
                "no handshake within {}ms",
                self.timeout.as_millis()
            )),
        }
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
