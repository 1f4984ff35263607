//! User/group mapping file parser.
//!
//! The mapping file holds one `user,group` pair per line. Blank lines and
//! lines starting with `#` are ignored:
//!
//! ```text
//! # staff
//! John, Male
//! John, Human
//!
//! Jane,Human
//! ```
//!
//! Parsing is all-or-nothing: a single malformed data line rejects the whole
//! file, so a half-written edit never reaches the store.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::{Entry, Error, Result};

/// Parse entries from a reader, preserving file order.
pub fn parse<R: Read>(reader: R) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    let buf_reader = BufReader::new(reader);

    for (idx, line) in buf_reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        entries.push(parse_line(line).ok_or_else(|| Error::MalformedEntry {
            line: idx + 1,
            content: line.to_string(),
        })?);
    }

    Ok(entries)
}

/// Parse the mapping file at `path`.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Entry>> {
    parse(File::open(path)?)
}

/// Split one data line into exactly two non-empty fields.
fn parse_line(line: &str) -> Option<Entry> {
    let mut fields = line.split(',').map(str::trim);
    let user = fields.next()?;
    let group = fields.next()?;

    if fields.next().is_some() || user.is_empty() || group.is_empty() {
        return None;
    }

    Some(Entry::new(user, group))
}
