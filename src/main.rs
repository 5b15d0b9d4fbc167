mod categorize;
mod config;
mod error;
mod export;
mod import;
mod ledger;
mod logging;
mod models;
mod report;
mod run;

use anyhow::Result;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let settings = config::Settings::load_or_default(&config::Settings::path()?)?;
    logging::init_tracing(&settings.log_level);

    match args.len() {
        1 => run::as_shell(settings),
        _ => run::as_cli(&args, settings),
    }
}
