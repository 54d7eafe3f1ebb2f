use fractal_tree_cli::{CliError, Settings, logging, run};
use std::process::ExitCode;

fn main() -> ExitCode {
    let settings = match Settings::from_cli() {
        Ok(settings) => settings,
        Err(CliError::Args(err)) => err.exit(),
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let _guard = logging::setup_logging(settings.verbose);

    let result = run::run(&settings)
        .and_then(|report| run::print_report(&report, settings.json, &mut std::io::stdout().lock()));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "fractal-tree failed");
            ExitCode::FAILURE
        }
    }
}
