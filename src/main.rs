use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use breed_tally::cli::Cli;
use breed_tally::generate_report;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.resolve_config()?;
    if cli.print_config {
        println!(
            "{}",
            serde_json::to_string_pretty(&config).context("serializing config")?
        );
        return Ok(());
    }

    log::debug!(
        "Reporting {} breeds from {} into {}",
        config.reference_breeds.len(),
        config.input_path.display(),
        config.output_path.display()
    );

    let mut stdout = std::io::stdout().lock();
    generate_report(&config, &mut stdout)?;
    Ok(())
}
