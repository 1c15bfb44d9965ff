//! Easel - Isolated Drawing Shell
//!
//! Entry point for both process roles: the host by default, the presenter
//! when started by the host with `--presenter`.

use easel::presenter::PRESENTER_FLAG;
use easel::{NAME, VERSION};
use log::{error, info};
use std::env;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == PRESENTER_FLAG {
        run_presenter_mode();
    } else {
        run_host_mode();
    }
}

fn run_presenter_mode() {
    if let Err(e) = easel::presenter::run() {
        error!("presenter failed: {}", e);
        std::process::exit(1);
    }
}

fn run_host_mode() {
    info!("{} v{} starting", NAME, VERSION);

    if let Err(e) = easel::host::run() {
        error!("failed to start {}: {}", NAME, e);
        std::process::exit(1);
    }
}
