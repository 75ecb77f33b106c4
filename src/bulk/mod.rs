//! Bulk verification of address files.
//!
//! Inputs are CSV or XLSX (first column of the first sheet, optional header)
//! or plain text (one address per line). Values are trimmed and blank rows dropped. [`verify_all`] fans
//! the addresses out over a fixed number of worker threads sharing one
//! [`Verifier`] and returns results in input order.

mod error;

pub use error::BulkError;

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crate::pipeline::{VerificationResult, Verifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Xlsx,
    Text,
}

impl InputFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, BulkError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            "txt" => Ok(Self::Text),
            _ => Err(BulkError::UnsupportedFormat { extension }),
        }
    }
}

/// Reads the addresses of `path`, in file order.
pub fn read_path(path: impl AsRef<Path>) -> Result<Vec<String>, BulkError> {
    let path = path.as_ref();
    let format = InputFormat::from_path(path)?;
    let file = File::open(path).map_err(|source| BulkError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_addresses(BufReader::new(file), format)
}

pub fn read_addresses<R: Read>(reader: R, format: InputFormat) -> Result<Vec<String>, BulkError> {
    let addresses = match format {
        InputFormat::Csv => read_csv(reader)?,
        InputFormat::Xlsx => read_xlsx(reader)?,
        InputFormat::Text => read_text(BufReader::new(reader))?,
    };
    if addresses.is_empty() {
        return Err(BulkError::Empty);
    }
    Ok(addresses)
}

fn read_csv<R: Read>(reader: R) -> Result<Vec<String>, BulkError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut column = Vec::new();
    for record in rdr.records() {
        column.push(record?.get(0).unwrap_or_default().to_string());
    }
    Ok(first_column(column))
}

fn read_xlsx<R: Read>(mut reader: R) -> Result<Vec<String>, BulkError> {
    use calamine::{Reader, Xlsx};

    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| BulkError::Read { source })?;
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;
    let sheet = workbook
        .worksheet_range_at(0)
        .ok_or(BulkError::NoWorksheet)??;
    let column = sheet
        .rows()
        .map(|row| row.first().map(ToString::to_string).unwrap_or_default());
    Ok(first_column(column))
}

/// Trimmed non-blank cells; a first row without '@' is a column title.
fn first_column(cells: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out = Vec::new();
    for (idx, cell) in cells.into_iter().enumerate() {
        let value = cell.trim();
        if idx == 0 && !value.contains('@') {
            continue;
        }
        if !value.is_empty() {
            out.push(value.to_string());
        }
    }
    out
}

fn read_text<R: BufRead>(reader: R) -> Result<Vec<String>, BulkError> {
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|source| BulkError::Read { source })?;
        let value = line.trim();
        if !value.is_empty() {
            out.push(value.to_string());
        }
    }
    Ok(out)
}

/// Verifies every address with at most `jobs` concurrent workers. The output
/// has one result per input, at the same index.
pub fn verify_all(verifier: &Verifier, emails: &[String], jobs: usize) -> Vec<VerificationResult> {
    let workers = jobs.clamp(1, emails.len().max(1));
    let next = AtomicUsize::new(0);
    let next = &next;

    let mut slots: Vec<Option<VerificationResult>> = vec![None; emails.len()];
    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                scope.spawn(move || {
                    let mut done = Vec::new();
                    loop {
                        let idx = next.fetch_add(1, Ordering::Relaxed);
                        let Some(email) = emails.get(idx) else {
                            break;
                        };
                        done.push((idx, verifier.verify(email)));
                    }
                    done
                })
            })
            .collect();
        for handle in handles {
            match handle.join() {
                Ok(done) => {
                    for (idx, result) in done {
                        slots[idx] = Some(result);
                    }
                }
                Err(_) => log_warn!("bulk worker panicked, its rows are reported as errors"),
            }
        }
    });

    slots
        .into_iter()
        .zip(emails)
        .map(|(slot, email)| {
            slot.unwrap_or_else(|| VerificationResult::errored(email, "worker thread panicked"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mx::MxRecord;
    use crate::mx::tests::StubResolver;
    use crate::pipeline::VerificationStatus;
    use crate::smtp_verify::{MailboxProbe, ProbeReport, ProbeTarget, ProbeVerdict};

    struct AcceptAll;

    impl MailboxProbe for AcceptAll {
        fn probe(&self, _: &ProbeTarget<'_>, _: &[MxRecord]) -> ProbeReport {
            ProbeReport {
                verdict: ProbeVerdict::Accepted,
                attempts: Vec::new(),
            }
        }
    }

    fn verifier() -> Verifier {
        Verifier::builder()
            .resolver(StubResolver::with_records(vec![MxRecord::new(
                10,
                "mx.example.com",
            )]))
            .hosts(StubResolver::failing())
            .prober(AcceptAll)
            .whois_enabled(false)
            .build()
            .expect("verifier")
    }

    #[test]
    fn csv_header_is_skipped() {
        let input = "email,name\n alice@example.com ,Alice\n\nbob@example.org,Bob\n";
        let got = read_addresses(input.as_bytes(), InputFormat::Csv).expect("csv");
        assert_eq!(got, ["alice@example.com", "bob@example.org"]);
    }

    #[test]
    fn csv_without_header_keeps_first_row() {
        let input = "alice@example.com\nbob@example.org\n";
        let got = read_addresses(input.as_bytes(), InputFormat::Csv).expect("csv");
        assert_eq!(got, ["alice@example.com", "bob@example.org"]);
    }

    #[test]
    fn text_lines_are_trimmed() {
        let input = "  alice@example.com\r\n\n\tbob@example.org  \n";
        let got = read_addresses(input.as_bytes(), InputFormat::Text).expect("txt");
        assert_eq!(got, ["alice@example.com", "bob@example.org"]);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            read_addresses("email\n".as_bytes(), InputFormat::Csv),
            Err(BulkError::Empty)
        ));
    }

    fn workbook(cells: &[&str]) -> Vec<u8> {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (row, cell) in cells.iter().enumerate() {
            sheet
                .write_string(row as u32, 0, *cell)
                .expect("write cell");
            sheet
                .write_string(row as u32, 1, "ignored")
                .expect("write cell");
        }
        workbook.save_to_buffer().expect("xlsx bytes")
    }

    #[test]
    fn xlsx_first_column_is_read() {
        let bytes = workbook(&["Email", " alice@example.com ", "", "bob@example.org"]);
        let got = read_addresses(bytes.as_slice(), InputFormat::Xlsx).expect("xlsx");
        assert_eq!(got, ["alice@example.com", "bob@example.org"]);
    }

    #[test]
    fn xlsx_garbage_is_reported() {
        assert!(matches!(
            read_addresses("not a zip".as_bytes(), InputFormat::Xlsx),
            Err(BulkError::Xlsx { .. })
        ));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            InputFormat::from_path(Path::new("list.xlsx")).expect("xlsx"),
            InputFormat::Xlsx
        );
        assert_eq!(
            InputFormat::from_path(Path::new("LIST.CSV")).expect("csv"),
            InputFormat::Csv
        );
        assert!(matches!(
            InputFormat::from_path(Path::new("list.ods")),
            Err(BulkError::UnsupportedFormat { extension }) if extension == "ods"
        ));
    }

    #[test]
    fn results_keep_input_order() {
        let emails: Vec<String> = (0..25)
            .map(|i| {
                if i % 3 == 0 {
                    format!("broken-{i}")
                } else {
                    format!("user{i}@example.com")
                }
            })
            .collect();
        let results = verify_all(&verifier(), &emails, 4);
        assert_eq!(results.len(), emails.len());
        for (email, result) in emails.iter().zip(&results) {
            assert_eq!(&result.email, email);
            let expected = if email.contains('@') {
                VerificationStatus::Valid
            } else {
                VerificationStatus::Invalid
            };
            assert_eq!(result.status, expected);
        }
    }

    #[test]
    fn no_input_no_output() {
        assert!(verify_all(&verifier(), &[], 8).is_empty());
    }
}
