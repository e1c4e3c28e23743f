// src/loader/csv_records.rs
use crate::error::LoadError;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One comma-separated record, fields trimmed.
pub struct Record {
    /// 1-based line of the source this record was read from
    pub line: usize,
    pub fields: Vec<String>,
}

/// Reads every non-blank line of `source` as a record.
///
/// Records may have differing field counts; the callers decide what shape
/// is acceptable. `origin` is only used to label errors.
pub fn read_records<R: Read>(mut source: R, origin: &Path) -> Result<Vec<Record>, LoadError> {
    let mut text = String::new();
    source
        .read_to_string(&mut text)
        .map_err(|source| LoadError::io(origin, source))?;

    let mut builder = ReaderBuilder::new();
    builder.has_headers(false).flexible(true).trim(Trim::All);

    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        // one reader per line keeps line numbers exact across skipped blanks
        let mut rec = StringRecord::new();
        builder
            .from_reader(line.as_bytes())
            .read_record(&mut rec)
            .map_err(|source| LoadError::Csv {
                path: origin.to_path_buf(),
                source,
            })?;
        out.push(Record {
            line: idx + 1,
            fields: rec.iter().map(str::to_owned).collect(),
        });
    }
    Ok(out)
}

pub fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::io(path, source))
}
