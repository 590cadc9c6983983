// CSV codec for metrics snapshots
use crate::application::errors::ParseError;
use crate::domain::record::{RawRecord, COLUMNS};
use anyhow::Context;

/// Parse a complete snapshot. Any malformed row fails the whole parse.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<RawRecord>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.headers()?;
    if headers.is_empty() {
        return Err(ParseError::MissingHeader);
    }
    if !headers.iter().eq(COLUMNS.iter().copied()) {
        return Err(ParseError::HeaderMismatch {
            expected: COLUMNS.iter().map(|c| c.to_string()).collect(),
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut records: Vec<RawRecord> = Vec::new();
    for (index, row) in reader.deserialize::<RawRecord>().enumerate() {
        let record = row?;
        if let Some(previous) = records.last() {
            if record.sample_date < previous.sample_date {
                return Err(ParseError::OutOfOrder { row: index + 1 });
            }
        }
        records.push(record);
    }

    Ok(records)
}

/// Serialize records back to snapshot CSV with the original header.
pub fn write_records(records: &[RawRecord]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if records.is_empty() {
        writer.write_record(COLUMNS)?;
    }
    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("Failed to flush snapshot CSV")
}
