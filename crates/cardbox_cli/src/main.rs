//! CLI entry point for quick local runs of the import flow.
//!
//! # Responsibility
//! - Verify `cardbox_core` wiring without any GUI runtime.
//! - Run the two-phase import over one plaintext file against an
//!   in-memory store and print the preview and commit report.

use cardbox_core::db::open_db_in_memory;
use cardbox_core::{ImportSession, SqliteCardRepository, SystemRandom};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        println!("cardbox_core version={}", cardbox_core::core_version());
        println!("usage: cardbox_cli <plaintext-file>");
        return ExitCode::SUCCESS;
    };

    match run_import(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run_import(path: &str) -> Result<(), String> {
    let raw_text =
        std::fs::read_to_string(path).map_err(|err| format!("cannot read `{path}`: {err}"))?;

    let mut conn = open_db_in_memory().map_err(|err| err.to_string())?;
    let repo = SqliteCardRepository::try_new(&mut conn).map_err(|err| err.to_string())?;

    let mut rng = SystemRandom::new();
    let mut session = ImportSession::new();
    session
        .set_raw_text(raw_text)
        .map_err(|err| err.to_string())?;

    let candidates = session.analyze(&mut rng).map_err(|err| err.to_string())?;
    println!("candidates ({}):", candidates.len());
    for (index, candidate) in candidates.iter().enumerate() {
        println!(
            "  {:>2}. [{:?} {:.2}] {} @{} -> {:?}",
            index + 1,
            candidate.category,
            candidate.confidence,
            candidate.title,
            candidate.address,
            candidate.gtd_bucket,
        );
    }

    let report = session.commit(&repo).map_err(|err| err.to_string())?;
    println!(
        "committed: accepted={} skipped={}",
        report.accepted.len(),
        report.skipped_count
    );
    Ok(())
}
