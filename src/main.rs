#[macro_use] extern crate clap;
#[macro_use] extern crate log;

pub mod error;
pub mod graphics;
pub mod interface;

use std::process;

use interface::cli::Config;
use interface::windows;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_args();
    debug!("{:?}", config);

    if let Err(e) = windows::run(config) {
        error!("{}", e);
        process::exit(1);
    }
}
