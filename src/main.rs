mod args;
mod board;

use clap::Parser;
use log::warn;
use std::error::Error;

use crate::args::Args;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let res = if let Some(ledger) = args.convert_notices.clone() {
        board::convert_notices_file(&ledger, args.out.as_deref())
    } else {
        board::run_board(&args).await
    };

    if let Err(e) = res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        let mut cause = e.source();
        while let Some(c) = cause {
            eprintln!("  caused by: {}", c);
            cause = c.source();
        }
        std::process::exit(1);
    }
}
