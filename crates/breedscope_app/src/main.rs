mod cli;
mod config;
mod render;
mod session;

use std::process::ExitCode;

use anyhow::Context as _;
use breedscope_engine::EngineHandle;
use clap::Parser;
use engine_logging::{engine_info, engine_warn};

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::session::{Outcome, Session};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("breedscope: {err:#}");
            ExitCode::from(2)
        }
    }
}

/// Identifies every picture on the command line. `Ok(false)` if any of them failed.
fn run(cli: &Cli) -> anyhow::Result<bool> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    engine_logging::initialize(&config.log_settings());

    let settings = config.fetch.to_settings();
    // Read, list, classify and search may each take a full request timeout.
    let settle_timeout = settings.connect_timeout + settings.request_timeout * 4;
    let engine = EngineHandle::new(settings).context("could not start the engine")?;
    let session = Session::start(
        engine.services(),
        engine.spawner(),
        settle_timeout,
        |line| println!("{line}"),
    );

    let mut failed = 0usize;
    for image in &cli.images {
        let outcome = session.identify(image);
        if outcome != Outcome::Identified {
            engine_warn!("{:?}: {:?}", image, outcome);
            failed += 1;
        }
    }
    engine_info!(
        "identified {} of {} picture(s)",
        cli.images.len() - failed,
        cli.images.len()
    );

    drop(session);
    Ok(failed == 0)
}
