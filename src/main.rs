mod cli;
mod output;
mod runner;

use clap::Parser;
use faq_chat::FaqError;

use crate::cli::Cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    match real_main() {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn real_main() -> Result<i32, FaqError> {
    let cli = Cli::parse();
    runner::run(&cli)
}
