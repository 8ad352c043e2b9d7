use cfping_common::config::ServerConfig;
use cfping_core::server;
use tracing::info;

use crate::terminal::print;

pub async fn serve(cfg: ServerConfig) -> anyhow::Result<()> {
    print::aligned_line("Bind", cfg.bind.to_string());
    print::aligned_line("Max targets", cfg.max_targets.to_string());
    print::aligned_line(
        "Concurrency",
        format!("{} ping / {} speed", cfg.ping_concurrency, cfg.speed_concurrency),
    );
    print::aligned_line("Ping timeout", format!("{}ms", cfg.ping_timeout.as_millis()));
    print::fat_separator();

    info!("Press Ctrl+C to stop");
    tokio::select! {
        res = server::run(cfg) => res,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
            Ok(())
        }
    }
}
