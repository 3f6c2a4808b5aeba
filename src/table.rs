//! CSV adapters standing in for the bibliographic store.

use std::io::{Read, Write};

use anyhow::Context;

use crate::record::{OutputRow, ParsedConferenceRecord, RawConferenceEntry};

/// Read `pid,name_seq,conference` rows. An empty `conference` cell is an
/// absent raw text.
pub fn read_entries<R: Read>(reader: R, limit: Option<usize>) -> anyhow::Result<Vec<RawConferenceEntry>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let mut entries = Vec::new();
    for (i, row) in rdr.deserialize().enumerate() {
        if limit.is_some_and(|n| entries.len() >= n) {
            break;
        }
        let entry: RawConferenceEntry =
            row.with_context(|| format!("invalid input row {}", i + 1))?;
        entries.push(entry);
    }
    Ok(entries)
}

pub fn write_records<W: Write>(writer: W, records: &[ParsedConferenceRecord]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(OutputRow::from(record))
            .context("failed to write output row")?;
    }
    wtr.flush().context("failed to flush output")?;
    Ok(())
}
