//! Per-collection CSV export.
//!
//! The file opens with a UTF-8 byte order mark so spreadsheet tools pick the
//! right encoding, then a fixed header row. Every data field is quoted, with
//! embedded quotes doubled.

use crate::error::{EntityKind, OrbitalError, Result};
use crate::library::Library;
use crate::model::Link;
use crate::store::StorageBackend;
use chrono::{Local, TimeZone};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fmt::Display;

const BOM: &str = "\u{FEFF}";
const HEADER: &str = "Title,URL,Comment,Created At";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

/// Render the links of a collection, with creation times in local time.
pub fn collection_csv<B: StorageBackend>(library: &Library<B>, id: &str) -> Result<CsvExport> {
    collection_csv_in(library, id, &Local)
}

pub fn collection_csv_in<B: StorageBackend, Tz: TimeZone>(
    library: &Library<B>,
    id: &str,
    tz: &Tz,
) -> Result<CsvExport>
where
    Tz::Offset: Display,
{
    let collection = library
        .collection(id)
        .ok_or_else(|| OrbitalError::dangling(EntityKind::Collection, id))?;
    let links: Vec<&Link> = library.links_in_collection(id).collect();

    Ok(CsvExport {
        filename: format!("{}.csv", sanitize_filename(&collection.name)),
        content: render(&links, tz)?,
    })
}

fn render<Tz: TimeZone>(links: &[&Link], tz: &Tz) -> Result<String>
where
    Tz::Offset: Display,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for link in links {
        let created = link
            .created_at
            .with_timezone(tz)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        writer.write_record([
            link.title.as_str(),
            link.url.as_str(),
            link.comment.as_deref().unwrap_or(""),
            created.as_str(),
        ])?;
    }

    let rows = writer
        .into_inner()
        .map_err(|e| OrbitalError::Io(e.into_error()))?;
    let rows = String::from_utf8(rows).map_err(|e| OrbitalError::Store(e.to_string()))?;
    Ok(format!("{}{}\n{}", BOM, HEADER, rows))
}

/// Replace everything outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
