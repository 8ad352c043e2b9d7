//! The central **abstraction** for scan execution.
//!
//! A scan request is expanded into an ordered target list and every target is handed
//! to a [`Prober`] (the [`ping`] or [`speed`] strategy) under a concurrency limit.
//! Results are streamed to the caller as they complete, tagged with the target's
//! position in the expanded list, followed by a single completion signal.
//!
//! **Architectural Note:**
//! The runner only depends on the [`Prober`] trait, so the session layer never
//! knows how a measurement is taken.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use cfping_common::config::ServerConfig;
use cfping_common::network::target;
use cfping_common::protocol::{ScanKind, ScanRequest, ScanResult, ServerMessage};
use tokio::sync::Semaphore;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

mod ping;
mod speed;

pub use ping::TcpPinger;
pub use speed::SpeedTester;

/// Measures a single `target:port` pair.
///
/// Failures are reported through the returned result's status, never as an
/// error: every probed target produces exactly one result.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: &str, port: u16) -> ScanResult;
}

/// Everything needed to run one request, after target expansion.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    pub kind: ScanKind,
    pub targets: Vec<String>,
    pub port: u16,
    pub concurrency: usize,
    /// Successful pings slower than this are not reported.
    pub latency_ceiling: Option<i64>,
}

impl ScanPlan {
    pub fn from_request(req: &ScanRequest, cfg: &ServerConfig) -> Self {
        let concurrency = match req.kind {
            ScanKind::Ping => cfg.ping_concurrency,
            ScanKind::Speed => cfg.speed_concurrency,
        };
        let latency_ceiling = match req.kind {
            ScanKind::Ping if req.max_latency > 0 => {
                Some(i64::try_from(req.max_latency).unwrap_or(i64::MAX))
            }
            _ => None,
        };

        Self {
            kind: req.kind,
            targets: target::expand(&req.ips, cfg.max_targets),
            port: req.port,
            concurrency: concurrency.max(1),
            latency_ceiling,
        }
    }

    fn is_suppressed(ceiling: Option<i64>, result: &ScanResult) -> bool {
        match ceiling {
            Some(max) => result.status.is_ok() && result.ping_time > max,
            None => false,
        }
    }
}

/// Probes every target of `plan` and streams the outcome into `tx`.
///
/// Returns the number of results that were reported. The completion signal is
/// sent last, after every probe has finished.
pub async fn run_scan(
    plan: ScanPlan,
    prober: Arc<dyn Prober>,
    tx: UnboundedSender<ServerMessage>,
) -> usize {
    let semaphore = Arc::new(Semaphore::new(plan.concurrency));
    let mut probes: JoinSet<bool> = JoinSet::new();
    let ceiling = plan.latency_ceiling;

    for (order, target) in plan.targets.into_iter().enumerate() {
        if tx.is_closed() {
            debug!("Receiver gone, stopping scan early");
            break;
        }

        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let prober = prober.clone();
        let tx = tx.clone();
        let port = plan.port;

        probes.spawn(async move {
            let _permit = permit;
            let mut result = prober.probe(&target, port).await;
            result.order = Some(order);

            if ScanPlan::is_suppressed(ceiling, &result) {
                return false;
            }
            tx.send(ServerMessage::Result(result)).is_ok()
        });
    }

    let mut reported: usize = 0;
    while let Some(joined) = probes.join_next().await {
        match joined {
            Ok(true) => reported += 1,
            Ok(false) => {}
            Err(e) => warn!("Probe task failed: {e}"),
        }
    }

    let _ = tx.send(ServerMessage::done());
    reported
}

/// Turns requests into scans using the configured probe strategies.
pub struct Scanner {
    cfg: ServerConfig,
}

impl Scanner {
    pub fn new(cfg: ServerConfig) -> Self {
        Self { cfg }
    }

    fn prober_for(&self, req: &ScanRequest) -> Arc<dyn Prober> {
        match req.kind {
            ScanKind::Ping => Arc::new(TcpPinger::new(self.cfg.ping_timeout)),
            ScanKind::Speed => Arc::new(SpeedTester::new(
                req.download_url.clone(),
                self.cfg.speed_timeout,
                self.cfg.speed_window,
            )),
        }
    }

    pub async fn execute(&self, req: ScanRequest, tx: UnboundedSender<ServerMessage>) -> usize {
        let plan = ScanPlan::from_request(&req, &self.cfg);
        let prober = self.prober_for(&req);
        let total = plan.targets.len();

        info!(
            "Starting {} scan of {} targets on port {}",
            plan.kind, total, plan.port
        );
        let start_time = Instant::now();
        let kind = plan.kind;
        let reported = run_scan(plan, prober, tx).await;
        info!(
            "Finished {} scan: {}/{} results in {:.2}s",
            kind,
            reported,
            total,
            start_time.elapsed().as_secs_f64()
        );
        reported
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
