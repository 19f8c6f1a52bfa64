mod args;
mod sorteo;

use clap::Parser;
use log::{debug, warn};

fn main() {
    let args = args::Args::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();
    debug!("args: {:?}", args);

    if let Err(e) = sorteo::run(&args) {
        warn!("Error occured {:?}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
