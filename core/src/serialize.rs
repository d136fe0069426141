//! Dataset serialization — the portable artifacts the detector and the
//! verification harness consume.
//!
//! Three artifacts per run: the CSV transaction log (what the detector
//! analyzes), the human-readable expectation report, and the JSON
//! manifest (what the harness diffs against). All three are pure
//! functions of the dataset, so a re-run with the same seed reproduces
//! them byte for byte.

use crate::{
    composer::Dataset,
    error::{GenError, GenResult},
    expectation::ExpectationManifest,
    types::TransactionRecord,
};
use anyhow::anyhow;
use chrono::NaiveDateTime;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const CSV_HEADER: [&str; 5] = [
    "transaction_id",
    "sender_id",
    "receiver_id",
    "amount",
    "timestamp",
];

/// Second resolution, no timezone.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn write_csv<W: Write>(records: &[TransactionRecord], writer: W) -> GenResult<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(CSV_HEADER)?;
    for record in records {
        let amount = format!("{:.2}", record.amount);
        let timestamp = record.timestamp.format(TIMESTAMP_FORMAT).to_string();
        out.write_record([
            record.id.as_str(),
            record.sender.as_str(),
            record.receiver.as_str(),
            amount.as_str(),
            timestamp.as_str(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

pub fn csv_string(records: &[TransactionRecord]) -> GenResult<String> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    String::from_utf8(buf).map_err(|e| GenError::Other(anyhow!("non-utf8 csv output: {e}")))
}

/// Parse a dataset CSV back into records. Round-tripping the writer's
/// output reproduces the original records exactly.
pub fn read_csv<R: Read>(reader: R) -> GenResult<Vec<TransactionRecord>> {
    let mut input = csv::Reader::from_reader(reader);
    {
        let headers = input.headers()?;
        if headers.iter().ne(CSV_HEADER) {
            return Err(GenError::MalformedRow {
                line: 1,
                reason: format!("unexpected header: {headers:?}"),
            });
        }
    }

    let mut records = Vec::new();
    for (i, row) in input.records().enumerate() {
        let row = row?;
        let line = i + 2; // 1-based, after the header
        let amount: f64 = field(&row, 3, line)?
            .parse()
            .map_err(|e| GenError::MalformedRow {
                line,
                reason: format!("bad amount: {e}"),
            })?;
        let timestamp = NaiveDateTime::parse_from_str(field(&row, 4, line)?, TIMESTAMP_FORMAT)?;
        records.push(TransactionRecord {
            id: field(&row, 0, line)?.to_string(),
            sender: field(&row, 1, line)?.to_string(),
            receiver: field(&row, 2, line)?.to_string(),
            amount,
            timestamp,
        });
    }
    Ok(records)
}

fn field<'a>(row: &'a csv::StringRecord, idx: usize, line: usize) -> GenResult<&'a str> {
    row.get(idx).ok_or(GenError::MalformedRow {
        line,
        reason: format!("missing column {idx}"),
    })
}

/// Render at most this many account ids per list; the rest collapse to
/// a count.
const ACCOUNT_PREVIEW: usize = 8;

fn account_list(accounts: &[String]) -> String {
    if accounts.is_empty() {
        return "(none)".to_string();
    }
    let shown: Vec<_> = accounts.iter().take(ACCOUNT_PREVIEW).cloned().collect();
    let extra = accounts.len().saturating_sub(ACCOUNT_PREVIEW);
    if extra > 0 {
        format!("{} … (+{extra} more)", shown.join(", "))
    } else {
        shown.join(", ")
    }
}

/// The human-readable expectation manifest.
pub fn write_manifest_report<W: Write>(dataset: &Dataset, mut w: W) -> GenResult<()> {
    let rule_heavy = "=".repeat(70);
    let rule_light = "-".repeat(70);

    writeln!(w, "{rule_heavy}")?;
    writeln!(w, "FRAUDGRAPH DATASET — EXPECTATION MANIFEST")?;
    writeln!(w, "{rule_heavy}")?;
    writeln!(w)?;
    writeln!(w, "Total transactions: {}", dataset.transactions.len())?;
    writeln!(w, "Unique accounts: {}", dataset.unique_accounts().len())?;
    writeln!(w)?;

    for e in &dataset.manifest.entries {
        writeln!(w, "{rule_light}")?;
        writeln!(w, "SCENARIO: {} [{}]", e.scenario, e.pattern.name())?;
        if let Some(window) = &e.window {
            writeln!(
                w,
                "  Window:        {} .. {}",
                window.start.format(TIMESTAMP_FORMAT),
                window.end.format(TIMESTAMP_FORMAT)
            )?;
        }
        writeln!(w, "  Must flag:     {}", account_list(&e.must_flag))?;
        writeln!(w, "  Must not flag: {}", account_list(&e.must_not_flag))?;
        if !e.undetermined.is_empty() {
            writeln!(w, "  Undetermined:  {}", account_list(&e.undetermined))?;
        }
        for ring in &e.rings {
            writeln!(
                w,
                "  Ring:          {}: {}",
                ring.pattern,
                account_list(&ring.members)
            )?;
        }
        writeln!(w, "  Rationale:     {}", e.rationale)?;
    }

    writeln!(w, "{rule_heavy}")?;
    writeln!(w, "SUMMARY OF EXPECTED RESULTS")?;
    writeln!(w, "{rule_heavy}")?;
    writeln!(w)?;
    writeln!(w, "MUST DETECT:")?;
    for name in dataset.manifest.must_detect() {
        writeln!(w, "  + {name}")?;
    }
    writeln!(w)?;
    writeln!(w, "MUST NOT FLAG:")?;
    for name in dataset.manifest.must_not_flag() {
        writeln!(w, "  - {name}")?;
    }
    Ok(())
}

pub fn manifest_report_string(dataset: &Dataset) -> GenResult<String> {
    let mut buf = Vec::new();
    write_manifest_report(dataset, &mut buf)?;
    String::from_utf8(buf).map_err(|e| GenError::Other(anyhow!("non-utf8 report output: {e}")))
}

/// The machine-checkable manifest consumed by the verification harness.
pub fn manifest_json(manifest: &ExpectationManifest) -> GenResult<String> {
    Ok(serde_json::to_string_pretty(manifest)?)
}

/// Paths of the artifacts a full run writes.
pub struct DatasetPaths {
    pub csv: PathBuf,
    pub report: PathBuf,
    pub json: PathBuf,
}

/// Write all three artifacts into `dir`.
pub fn write_dataset(dataset: &Dataset, dir: &Path) -> GenResult<DatasetPaths> {
    let paths = DatasetPaths {
        csv: dir.join("transactions.csv"),
        report: dir.join("expectations.txt"),
        json: dir.join("manifest.json"),
    };
    write_csv(&dataset.transactions, std::fs::File::create(&paths.csv)?)?;
    write_manifest_report(dataset, std::fs::File::create(&paths.report)?)?;
    std::fs::write(&paths.json, manifest_json(&dataset.manifest)?)?;
    Ok(paths)
}
