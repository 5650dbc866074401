use assetway_core::cli::ConfigCmd;
use assetway_core::logging::init_logging;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "assetway",
    version,
    about = "Assetway: static asset registration and resolution toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: ConfigCmd,
}

fn main() {
    let cli = Cli::parse();

    init_logging();

    if let Err(e) = assetway_core::cli::run(cli.command) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
