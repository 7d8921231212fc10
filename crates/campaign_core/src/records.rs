//! Shared plumbing for the flat record files.
//!
//! Every entity type persists as one CSV file: a header row, then one
//! row per entity, with a fixed column order that is part of the save
//! compatibility surface. These helpers wrap the `csv` crate so that
//! loaders fail loudly with the offending file named, and so that field
//! parse failures surface as data-corruption errors instead of silent
//! defaults.

use std::fs::File;
use std::path::Path;

use csv::{Reader, StringRecord, Writer};

use crate::error::{GameError, Result};
use crate::math::Fixed;
use crate::registry::{EntityId, NO_ENTITY};

/// Open a record file for reading.
pub fn open_reader(path: &Path) -> Result<Reader<File>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| GameError::FileRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

/// Pull the next raw record, mapping read failures to the file.
pub fn next_record(result: csv::Result<StringRecord>, path: &Path) -> Result<StringRecord> {
    result.map_err(|e| GameError::FileRead {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Open a record file for writing.
pub fn open_writer(path: &Path) -> Result<Writer<File>> {
    Writer::from_path(path).map_err(|e| GameError::FileWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Write one row, mapping write failures to the file.
pub fn write_row<I, S>(writer: &mut Writer<File>, row: I, path: &Path) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    writer.write_record(row).map_err(|e| GameError::FileWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Flush a writer, mapping the failure to the file.
pub fn finish(writer: &mut Writer<File>, path: &Path) -> Result<()> {
    writer.flush().map_err(|e| GameError::FileWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Fetch column `idx` of a record, or fail as corruption.
pub fn field<'a>(record: &'a StringRecord, idx: usize, path: &Path) -> Result<&'a str> {
    record.get(idx).ok_or_else(|| GameError::Corrupted {
        file: path.display().to_string(),
        message: format!("missing column {idx}"),
    })
}

/// Parse an integer field, or fail as corruption.
pub fn parse_i32(s: &str, what: &str, path: &Path) -> Result<i32> {
    s.trim().parse().map_err(|_| GameError::Corrupted {
        file: path.display().to_string(),
        message: format!("unparseable {what}: '{s}'"),
    })
}

/// Parse a fixed-point field, or fail as corruption.
pub fn parse_fixed(s: &str, what: &str, path: &Path) -> Result<Fixed> {
    s.trim().parse().map_err(|_| GameError::Corrupted {
        file: path.display().to_string(),
        message: format!("unparseable {what}: '{s}'"),
    })
}

/// Parse an entity reference where `-1` means "none".
pub fn parse_entity_ref(s: &str, what: &str, path: &Path) -> Result<Option<EntityId>> {
    let id = parse_i32(s, what, path)?;
    if id == NO_ENTITY {
        Ok(None)
    } else {
        Ok(Some(id))
    }
}

/// Encode an optional entity reference, `-1` when absent.
#[must_use]
pub fn entity_ref_to_record(id: Option<EntityId>) -> String {
    id.unwrap_or(NO_ENTITY).to_string()
}

/// Encode an ID list as a record field: IDs joined by single spaces.
#[must_use]
pub fn ids_to_record<'a, I>(ids: I) -> String
where
    I: IntoIterator<Item = &'a EntityId>,
{
    ids.into_iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode an ID list field. An empty field is an empty list.
pub fn parse_id_list(s: &str, what: &str, path: &Path) -> Result<Vec<EntityId>> {
    s.split_whitespace()
        .map(|part| parse_i32(part, what, path))
        .collect()
}
