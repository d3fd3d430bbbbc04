mod analysis;
mod error;
mod logging;
mod output;
mod settings;

use analysis::AnalysisOptions;
use settings::Settings;
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::setup_logging();

    let settings = Settings::from_cli();
    tracing::debug!(?settings, "Starting trail-log");

    let options = AnalysisOptions {
        stride: settings.stride,
        include_profile: !settings.no_profile,
    };

    // Unreadable files are reported; the others are still printed
    let mut analyses = Vec::with_capacity(settings.files.len());
    let mut failed = false;
    for result in analysis::analyze_files(&settings.files, options) {
        match result {
            Ok(analysis) => analyses.push(analysis),
            Err(e) => {
                tracing::error!("{e}");
                failed = true;
            }
        }
    }

    let stdout = std::io::stdout();
    if let Err(e) = output::write_report(&mut stdout.lock(), &analyses, settings.format) {
        tracing::error!("{e}");
        return ExitCode::FAILURE;
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
