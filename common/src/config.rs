use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "0.0.0.0:13334";
pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:13334/ws";
pub const DEFAULT_PORT: u16 = 443;
pub const DEFAULT_DOWNLOAD_URL: &str = "https://speed.cloudflare.com/__down?bytes=100000000";
/// Latency bound used for single-target re-tests, high enough to never filter.
pub const RETEST_MAX_LATENCY: u64 = 9999;
/// Initial value of the form's max latency field.
pub const DEFAULT_MAX_LATENCY: u64 = 9999;

/// Runtime settings of the scanning service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Expanded target lists are truncated to this many entries.
    pub max_targets: usize,
    pub ping_concurrency: usize,
    /// Speed tests compete for local bandwidth, so this is normally `1`.
    pub speed_concurrency: usize,
    pub ping_timeout: Duration,
    /// Connect/handshake budget of a speed test; the body gets the same again.
    pub speed_timeout: Duration,
    /// How long a speed test keeps reading the response body.
    pub speed_window: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 13334)),
            max_targets: 10_000,
            ping_concurrency: 50,
            speed_concurrency: 1,
            ping_timeout: Duration::from_secs(2),
            speed_timeout: Duration::from_secs(10),
            speed_window: Duration::from_secs(5),
        }
    }
}

/// Runtime settings of the scan controller.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    /// Fixed delay before reconnecting after the socket drops.
    pub reconnect_delay: Duration,
    pub port: u16,
    pub download_url: String,
    pub max_latency: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            reconnect_delay: Duration::from_secs(1),
            port: DEFAULT_PORT,
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
            max_latency: DEFAULT_MAX_LATENCY,
        }
    }
}
