use cfping_client::form::ScanForm;
use cfping_client::{ScanController, connection};
use tracing::info;

use crate::commands::UiArgs;
use crate::terminal::tui::{self, app::App};

pub async fn ui(args: &UiArgs) -> anyhow::Result<()> {
    let cfg = args.connect.to_config();
    let targets = args.connect.load_targets(&[])?;

    let form = ScanForm::from_config(&cfg).with_targets(targets);
    let app = App::new(ScanController::new(form));

    info!("Connecting to {}", cfg.server_url);
    let (handle, events) = connection::connect(cfg.server_url.clone(), cfg.reconnect_delay);

    let res = tui::run(app, &handle, events).await;
    handle.shutdown();
    res
}
