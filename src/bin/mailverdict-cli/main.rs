mod args;
mod logging;
mod output;

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use mailverdict_lib::{VerificationResult, Verifier};

use crate::args::{Cli, Commands};

fn main() {
    match run() {
        // exit codes: 0 all valid, 2 at least one invalid or error, 1 fatal
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// Returns whether every address came out valid.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    logging::route_panics();

    let (rows, single) = if cli.stdin {
        let emails = read_stdin()?;
        let verifier = cli.build_verifier()?;
        (verify_many(&verifier, &emails, cli.jobs), false)
    } else {
        match &cli.cmd {
            Some(Commands::Check { email }) => {
                let verifier = cli.build_verifier()?;
                (vec![verifier.verify(email)], true)
            }
            Some(Commands::Bulk { file }) => {
                let emails = read_file(file)?;
                let verifier = cli.build_verifier()?;
                (verify_many(&verifier, &emails, cli.jobs), false)
            }
            None => {
                Cli::clap_command().print_help()?;
                println!();
                return Ok(true);
            }
        }
    };

    output::write_reports(&rows, &cli, single)?;
    Ok(!output::any_not_valid(&rows))
}

fn read_stdin() -> Result<Vec<String>> {
    let mut emails = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("read stdin")?;
        let email = line.trim();
        if !email.is_empty() {
            emails.push(email.to_string());
        }
    }
    Ok(emails)
}

#[cfg(feature = "with-csv")]
fn read_file(path: &std::path::Path) -> Result<Vec<String>> {
    mailverdict_lib::bulk::read_path(path).with_context(|| format!("read {}", path.display()))
}

#[cfg(not(feature = "with-csv"))]
fn read_file(_: &std::path::Path) -> Result<Vec<String>> {
    anyhow::bail!("bulk files need the 'with-csv' feature")
}

#[cfg(feature = "with-csv")]
fn verify_many(verifier: &Verifier, emails: &[String], jobs: usize) -> Vec<VerificationResult> {
    mailverdict_lib::bulk::verify_all(verifier, emails, jobs)
}

#[cfg(not(feature = "with-csv"))]
fn verify_many(verifier: &Verifier, emails: &[String], _jobs: usize) -> Vec<VerificationResult> {
    emails.iter().map(|email| verifier.verify(email)).collect()
}
