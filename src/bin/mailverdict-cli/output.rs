#[cfg(any(feature = "with-serde", feature = "with-csv"))]
use anyhow::Context;
use anyhow::{Result, bail};

use crate::args::Cli;
use mailverdict_lib::{DomainLookup, VerificationResult, VerificationStatus};

#[cfg(feature = "with-csv")]
const CSV_HEADER: [&str; 11] = [
    "email",
    "syntaxValidation",
    "MXRecord",
    "smtpConnection",
    "isTemporary",
    "suggestedDomains",
    "registrar",
    "server",
    "country",
    "status",
    "error",
];

/// `single` prints a lone object instead of an array for JSON output.
pub fn write_reports(rows: &[VerificationResult], cli: &Cli, single: bool) -> Result<()> {
    match cli.format.as_str() {
        "human" => write_human(rows, cli),
        "json" => write_json(rows, cli, single),
        "ndjson" => write_ndjson(rows, cli),
        "csv" => write_csv(rows, cli),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

pub fn any_not_valid(rows: &[VerificationResult]) -> bool {
    rows.iter().any(|row| !row.is_valid())
}

fn write_human(rows: &[VerificationResult], cli: &Cli) -> Result<()> {
    if cli.out.is_some() {
        bail!("--out needs --format json|ndjson|csv");
    }
    for row in rows {
        match row.status {
            VerificationStatus::Valid => println!("[VALID]   {}", row.email),
            VerificationStatus::Invalid => println!("[INVALID] {}", row.email),
            VerificationStatus::Error => println!(
                "[ERROR]   {} :: {}",
                row.email,
                row.error.as_deref().unwrap_or("unknown error")
            ),
        }
        if !row.syntax_valid {
            println!("        syntax: malformed address");
            continue;
        }

        let mut checks = Vec::new();
        if let Some(mx) = row.has_mx_record {
            checks.push(format!("mx={}", yes_no(mx)));
        }
        if let Some(smtp) = row.smtp_accepted {
            checks.push(format!("smtp={}", yes_no(smtp)));
        }
        if let Some(disposable) = row.is_disposable {
            checks.push(format!("disposable={}", yes_no(disposable)));
        }
        if !checks.is_empty() {
            println!("        checks: {}", checks.join(", "));
        }

        if let Some(suggestions) = &row.suggested_domains {
            if !suggestions.is_empty() {
                println!("        did you mean: {}", suggestions.join(", "));
            }
        }

        match &row.domain_info {
            Some(DomainLookup::Found(info)) => println!(
                "        whois: registrar={}, server={}, country={}",
                info.registrar.as_deref().unwrap_or("-"),
                info.whois_server.as_deref().unwrap_or("-"),
                info.country.as_deref().unwrap_or("-"),
            ),
            Some(DomainLookup::Failed { reason }) => println!("        whois: unavailable ({reason})"),
            None => {}
        }

        if let Some(diag) = &row.diagnostics {
            let mut parts = Vec::new();
            if let Some(mx) = diag.mx {
                parts.push(format!("mx={mx:?}"));
            }
            if let Some(smtp) = &diag.smtp {
                parts.push(format!("smtp={smtp}"));
            }
            if !parts.is_empty() {
                println!("        diagnostics: {}", parts.join(", "));
            }
        }
    }
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[cfg(feature = "with-serde")]
fn write_json(rows: &[VerificationResult], cli: &Cli, single: bool) -> Result<()> {
    let s = match rows {
        [row] if single => serde_json::to_string_pretty(row)?,
        _ => serde_json::to_string_pretty(rows)?,
    };
    if let Some(path) = &cli.out {
        write_all_atomically(path, s.as_bytes())?;
    } else {
        println!("{s}");
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_json(_: &[VerificationResult], _: &Cli, _: bool) -> Result<()> {
    bail!("format=json needs the 'with-serde' feature")
}

#[cfg(feature = "with-serde")]
fn write_ndjson(rows: &[VerificationResult], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut buf = Vec::new();
        for row in rows {
            let line = serde_json::to_string(row)?;
            buf.extend_from_slice(line.as_bytes());
            buf.push(b'\n');
        }
        write_all_atomically(path, &buf)?;
    } else {
        for row in rows {
            println!("{}", serde_json::to_string(row)?);
        }
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_ndjson(_: &[VerificationResult], _: &Cli) -> Result<()> {
    bail!("format=ndjson needs the 'with-serde' feature")
}

#[cfg(feature = "with-csv")]
fn write_csv(rows: &[VerificationResult], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(CSV_HEADER)?;
        for row in rows {
            wtr.write_record(csv_record(row))?;
        }
        let data = wtr.into_inner()?;
        write_all_atomically(path, &data)?;
    } else {
        let mut wtr = csv::Writer::from_writer(std::io::stdout());
        wtr.write_record(CSV_HEADER)?;
        for row in rows {
            wtr.write_record(csv_record(row))?;
        }
        wtr.flush()?;
    }
    Ok(())
}

#[cfg(not(feature = "with-csv"))]
fn write_csv(_: &[VerificationResult], _: &Cli) -> Result<()> {
    bail!("format=csv needs the 'with-csv' feature")
}

#[cfg(feature = "with-csv")]
fn csv_record(row: &VerificationResult) -> Vec<String> {
    let info = row.domain_info.as_ref().and_then(DomainLookup::info);
    let field = |value: Option<&String>| value.cloned().unwrap_or_default();
    vec![
        row.email.clone(),
        row.syntax_valid.to_string(),
        bool_opt_str(row.has_mx_record).to_string(),
        bool_opt_str(row.smtp_accepted).to_string(),
        bool_opt_str(row.is_disposable).to_string(),
        row.suggested_domains
            .as_ref()
            .map(|domains| domains.join("|"))
            .unwrap_or_default(),
        field(info.and_then(|i| i.registrar.as_ref())),
        field(info.and_then(|i| i.whois_server.as_ref())),
        field(info.and_then(|i| i.country.as_ref())),
        row.status.to_string(),
        row.error.clone().unwrap_or_default(),
    ]
}

#[cfg(feature = "with-csv")]
fn bool_opt_str(opt: Option<bool>) -> &'static str {
    match opt {
        Some(true) => "true",
        Some(false) => "false",
        None => "",
    }
}

#[cfg(any(feature = "with-serde", feature = "with-csv"))]
fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let tmp = format!("{path}.tmp");
    {
        let mut f = std::fs::File::create(&tmp).with_context(|| format!("create {tmp}"))?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path).with_context(|| format!("rename {tmp} -> {path}"))?;
    Ok(())
}
