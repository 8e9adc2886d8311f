//! Record serialization
//!
//! Fields are encoded with the `csv` crate's writer so quoting matches other
//! CSV producers. A row with no fields is written as a bare terminator.
//!
//! The `csv` writer escapes embedded quotes but leaves the escape byte
//! alone, so with an active escape byte every occurrence of it is doubled
//! first. Such fields are always quoted, and the reader turns each pair back
//! into one byte.

use std::borrow::Cow;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::dialect::Dialect;

/// Terminator written after every record
pub(crate) const RECORD_TERMINATOR: u8 = b'\n';

/// Encode one record, terminator included
pub(crate) fn encode_record(dialect: &Dialect, fields: &[String]) -> csv::Result<Vec<u8>> {
    if fields.is_empty() {
        return Ok(vec![RECORD_TERMINATOR]);
    }

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(dialect.delimiter)
        .quote(dialect.quote)
        .double_quote(dialect.doubles_quotes())
        .escape(dialect.active_escape().unwrap_or(b'\\'))
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(RECORD_TERMINATOR))
        .from_writer(Vec::with_capacity(fields.iter().map(|f| f.len() + 1).sum()));

    match dialect.active_escape() {
        Some(escape) => writer.write_record(fields.iter().map(|f| escape_field(f, escape)))?,
        None => writer.write_record(fields)?,
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

fn escape_field(field: &str, escape: u8) -> Cow<'_, [u8]> {
    let bytes = field.as_bytes();
    if !bytes.contains(&escape) {
        return Cow::Borrowed(bytes);
    }

    let mut escaped = Vec::with_capacity(bytes.len() + 2);
    for &byte in bytes {
        if byte == escape {
            escaped.push(escape);
        }
        escaped.push(byte);
    }
    Cow::Owned(escaped)
}
