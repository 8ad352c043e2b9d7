pub mod scan;
pub mod serve;
pub mod ui;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use cfping_client::sort::Column;
use cfping_common::config::{
    ClientConfig, DEFAULT_BIND, DEFAULT_DOWNLOAD_URL, DEFAULT_MAX_LATENCY, DEFAULT_PORT,
    DEFAULT_SERVER_URL, ServerConfig,
};
use cfping_common::protocol::ScanKind;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "cfping")]
#[command(about = "Latency and throughput scanner for edge IP lists.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the scan service
    #[command(alias = "server")]
    Serve(ServeArgs),
    /// Open the interactive scan table
    #[command(alias = "tui")]
    Ui(UiArgs),
    /// Run one scan and print the results
    #[command(alias = "run")]
    Scan(ScanArgs),
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "CFPING_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,
    /// Expanded target lists are cut to this length
    #[arg(long, default_value_t = 10_000)]
    pub max_targets: usize,
    #[arg(long, default_value_t = 50)]
    pub ping_concurrency: usize,
    #[arg(long, default_value_t = 1)]
    pub speed_concurrency: usize,
    /// Handshake timeout of a ping probe, in milliseconds
    #[arg(long, default_value_t = 2_000)]
    pub ping_timeout_ms: u64,
}

impl ServeArgs {
    pub fn to_config(&self) -> ServerConfig {
        ServerConfig {
            bind: self.bind,
            max_targets: self.max_targets,
            ping_concurrency: self.ping_concurrency,
            speed_concurrency: self.speed_concurrency,
            ping_timeout: Duration::from_millis(self.ping_timeout_ms),
            ..ServerConfig::default()
        }
    }
}

#[derive(Args, Clone)]
pub struct ConnectArgs {
    /// WebSocket URL of the scan service
    #[arg(long, env = "CFPING_SERVER", default_value = DEFAULT_SERVER_URL)]
    pub server: String,
    /// Port probed on every target
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// File fetched by speed tests
    #[arg(long, default_value = DEFAULT_DOWNLOAD_URL)]
    pub download_url: String,
    /// Hide ping results slower than this many milliseconds (0 shows all)
    #[arg(long, default_value_t = DEFAULT_MAX_LATENCY)]
    pub max_latency: u64,
    /// Read targets from a file, one per line
    #[arg(short = 'f', long = "targets")]
    pub targets_file: Option<PathBuf>,
}

impl ConnectArgs {
    pub fn to_config(&self) -> ClientConfig {
        ClientConfig {
            server_url: self.server.clone(),
            port: self.port,
            download_url: self.download_url.clone(),
            max_latency: self.max_latency,
            ..ClientConfig::default()
        }
    }

    /// Target file contents followed by any targets given inline.
    pub fn load_targets(&self, inline: &[String]) -> anyhow::Result<String> {
        let mut text = match &self.targets_file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("reading targets from {}", path.display()))?,
            None => String::new(),
        };
        for target in inline {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(target);
        }
        Ok(text)
    }
}

#[derive(Args)]
pub struct UiArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Ping,
    Speed,
}

impl From<KindArg> for ScanKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Ping => ScanKind::Ping,
            KindArg::Speed => ScanKind::Speed,
        }
    }
}

impl From<KindArg> for Column {
    fn from(kind: KindArg) -> Self {
        Column::from(ScanKind::from(kind))
    }
}

#[derive(Args)]
pub struct ScanArgs {
    /// Measurement to run
    #[arg(value_enum)]
    pub kind: KindArg,
    /// IPs, hostnames or CIDR blocks
    pub targets: Vec<String>,
    #[command(flatten)]
    pub connect: ConnectArgs,
    /// Sort the printed table by this column
    #[arg(long, value_enum)]
    pub sort: Option<KindArg>,
    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

impl ScanArgs {
    pub fn kind_label(&self) -> &'static str {
        ScanKind::from(self.kind).as_str()
    }
}
