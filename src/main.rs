use clap::Parser;
use log::{error, info};

use quillnotes::{App, Cli, Config};

fn initialize_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    info!("Logger initialized");
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let mut app = App::new(config);
    if let Err(e) = app.run(cli.command).await {
        error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
