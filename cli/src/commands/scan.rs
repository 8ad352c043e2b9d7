use std::time::Instant;

use cfping_client::form::ScanForm;
use cfping_client::sort::Column;
use cfping_client::{ScanController, connection, driver};
use cfping_common::protocol::ScanKind;
use tracing::{info, warn};

use crate::commands::ScanArgs;
use crate::terminal::{print, spinner};

pub async fn scan(args: &ScanArgs) -> anyhow::Result<()> {
    let cfg = args.connect.to_config();
    let targets = args.connect.load_targets(&args.targets)?;

    let form = ScanForm::from_config(&cfg).with_targets(targets);
    let submitted = form.targets().len();
    if submitted == 0 {
        anyhow::bail!("no targets given; pass them inline or with --targets");
    }

    let mut controller = ScanController::new(form);
    if let Some(column) = args.sort {
        let column = Column::from(column);
        controller.cycle_sort(column);
        if args.desc {
            controller.cycle_sort(column);
        }
    }

    print::aligned_line("Server", cfg.server_url.clone());
    print::aligned_line("Entries", submitted.to_string());
    print::aligned_line("Port", cfg.port.to_string());
    print::fat_separator();

    let kind = ScanKind::from(args.kind);
    let started = Instant::now();
    let (handle, mut events) = connection::connect(cfg.server_url.clone(), cfg.reconnect_delay);

    let res = driver::run_to_completion(&mut controller, &handle, &mut events, kind, |ctl| {
        spinner::report_scan_progress(ctl.table().len(), submitted);
    })
    .await;

    spinner::finish();
    handle.shutdown();

    if let Err(e) = &res {
        warn!("{e}");
    } else {
        info!("{}", controller.status());
    }

    let rows = controller.table().rows();
    if rows.is_empty() {
        print::no_results();
    } else {
        print::results_table(rows);
    }
    print::summary(rows, started.elapsed());

    res.map_err(Into::into)
}
