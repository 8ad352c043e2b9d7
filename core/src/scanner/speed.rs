//! HTTP download throughput probe.
//!
//! The download URL is fetched with the connection pinned to the probed
//! `target:port`, while TLS SNI and the `Host` header keep the URL's hostname.
//! This measures how fast a given edge address serves the same content.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use cfping_common::protocol::{ProbeStatus, ScanResult};
use futures::StreamExt;
use reqwest::Url;
use tokio::time::{Instant, timeout_at};
use tracing::debug;

use super::Prober;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const MIN_ELAPSED_SECS: f64 = 0.1;

pub struct SpeedTester {
    download_url: String,
    timeout: Duration,
    window: Duration,
}

impl SpeedTester {
    pub fn new(download_url: String, timeout: Duration, window: Duration) -> Self {
        Self {
            download_url,
            timeout,
            window,
        }
    }

    async fn resolve_target(target: &str, port: u16) -> anyhow::Result<SocketAddr> {
        tokio::net::lookup_host((target, port))
            .await
            .with_context(|| format!("resolving {target}"))?
            .next()
            .with_context(|| format!("{target} has no address"))
    }

    fn client_for(&self, host: &str, addr: SocketAddr) -> anyhow::Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .resolve(host, addr)
            .connect_timeout(self.timeout)
            .timeout(self.timeout * 2)
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(client)
    }

    /// Returns the measured throughput in MB/s.
    async fn measure(&self, target: &str, port: u16) -> anyhow::Result<f64> {
        let url = Url::parse(&self.download_url)
            .with_context(|| format!("invalid download URL '{}'", self.download_url))?;
        let host = url.host_str().context("download URL has no host")?.to_string();
        let addr = Self::resolve_target(target, port).await?;
        let client = self.client_for(&host, addr)?;

        let start_time = Instant::now();
        let response = client.get(url).send().await?;

        let stop_time = Instant::now() + self.window;
        let mut body = response.bytes_stream();
        let mut total_bytes: u64 = 0;

        loop {
            match timeout_at(stop_time, body.next()).await {
                Ok(Some(Ok(chunk))) => total_bytes += chunk.len() as u64,
                Ok(Some(Err(e))) => {
                    debug!("Body read from {target} ended early: {e}");
                    break;
                }
                Ok(None) | Err(_) => break,
            }
        }

        let elapsed = start_time.elapsed().as_secs_f64().max(MIN_ELAPSED_SECS);
        Ok(total_bytes as f64 / BYTES_PER_MB / elapsed)
    }
}

#[async_trait]
impl Prober for SpeedTester {
    async fn probe(&self, target: &str, port: u16) -> ScanResult {
        match self.measure(target, port).await {
            Ok(speed) => {
                let mut result = ScanResult::new(target, port, ProbeStatus::Ok);
                result.download = speed;
                result
            }
            Err(e) => ScanResult::new(target, port, ProbeStatus::Error).with_error(format!("{e:#}")),
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
