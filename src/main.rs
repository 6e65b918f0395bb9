use anyhow::Context;
use clap::Parser;

use gobrew::app::Gobrew;
use gobrew::cli::{self, Cli};
use gobrew::config::Config;
use gobrew::logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.global.overrides())?;
    let _guard = logging::init(&config.log_path(), cli.global.verbose);

    let work_dir = std::env::current_dir().context("Failed to read the working directory")?;
    let app = Gobrew::from_config(&config, &work_dir)?;

    cli::run(cli.command, &app)
}
