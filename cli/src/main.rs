mod commands;
mod terminal;

use commands::{CommandLine, Commands, scan, serve, ui};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    match commands.command {
        Commands::Serve(args) => {
            logging::init_stderr();
            print::header("starting scan service");
            serve::serve(args.to_config()).await
        }
        Commands::Ui(args) => {
            let _guard = logging::init_file();
            ui::ui(&args).await
        }
        Commands::Scan(args) => {
            logging::init_spinner();
            print::header(&format!("{} scan", args.kind_label()));
            scan::scan(&args).await
        }
    }
}
