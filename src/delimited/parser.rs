//! Incremental record parser
//!
//! [`RecordParser`] is fed one byte at a time and tells the caller when the
//! record is complete, so the handle never consumes bytes belonging to the
//! next record. Field parsing is done by `csv_core`, configured from the
//! same [`Dialect`] the writer uses. Accepted record terminators are `\n`,
//! `\r\n` and `\r`.
//!
//! `csv_core` passes over blank lines, so a terminator at the very start of
//! a record is handled here: it parses to a row with zero fields, which is
//! distinct from a line holding `""` (one empty field).

use csv_core::{ReadRecordResult, Reader, ReaderBuilder};

use crate::file::Scan;

use super::dialect::Dialect;

/// Initial room for field bytes and field ends
const INITIAL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing fed yet
    Start,
    /// Inside a record that `csv_core` is parsing
    Record,
    /// Record ended on `\r`; a following `\n` belongs to it
    AfterCr,
    /// Record complete
    Done,
}

#[derive(Debug)]
pub(crate) struct RecordParser {
    reader: Reader,
    state: State,
    output: Vec<u8>,
    output_len: usize,
    ends: Vec<usize>,
    ends_len: usize,
}

impl RecordParser {
    pub(crate) fn new(dialect: &Dialect) -> Self {
        let reader = ReaderBuilder::new()
            .delimiter(dialect.delimiter)
            .quote(dialect.quote)
            .escape(dialect.active_escape())
            .double_quote(dialect.doubles_quotes())
            .build();

        Self {
            reader,
            state: State::Start,
            output: vec![0; INITIAL_CAPACITY],
            output_len: 0,
            ends: vec![0; INITIAL_CAPACITY],
            ends_len: 0,
        }
    }

    /// Feed one byte
    pub(crate) fn push(&mut self, byte: u8) -> Scan {
        match self.state {
            State::Start => match byte {
                b'\n' => {
                    self.state = State::Done;
                    Scan::Stop
                }
                b'\r' => {
                    self.state = State::AfterCr;
                    Scan::Continue
                }
                _ => {
                    self.state = State::Record;
                    self.feed(byte)
                }
            },
            State::Record => self.feed(byte),
            State::AfterCr => {
                self.state = State::Done;
                if byte == b'\n' {
                    Scan::Stop
                } else {
                    Scan::StopBefore
                }
            }
            State::Done => Scan::StopBefore,
        }
    }

    /// Hand one byte to `csv_core`
    ///
    /// Bytes go in one at a time, so `csv_core` never sees a leading UTF-8
    /// BOM to strip and never consumes past the record terminator.
    fn feed(&mut self, byte: u8) -> Scan {
        loop {
            self.reserve();
            let (result, nin, nout, nend) = self.reader.read_record(
                &[byte],
                &mut self.output[self.output_len..],
                &mut self.ends[self.ends_len..],
            );
            self.output_len += nout;
            self.ends_len += nend;

            match result {
                ReadRecordResult::OutputFull | ReadRecordResult::OutputEndsFull if nin == 0 => {}
                ReadRecordResult::Record if byte == b'\r' => {
                    self.state = State::AfterCr;
                    return Scan::Continue;
                }
                ReadRecordResult::Record => {
                    self.state = State::Done;
                    return Scan::Stop;
                }
                _ => return Scan::Continue,
            }
        }
    }

    fn reserve(&mut self) {
        if self.output_len == self.output.len() {
            self.output.resize(self.output.len() * 2, 0);
        }
        if self.ends_len == self.ends.len() {
            self.ends.resize(self.ends.len() * 2, 0);
        }
    }

    /// Finish the record, running out of input if it has not ended yet
    ///
    /// Returns `None` if no bytes were fed. Field bytes that are not valid
    /// UTF-8 are replaced with U+FFFD.
    pub(crate) fn finish(mut self) -> Option<Vec<String>> {
        match self.state {
            State::Start => return None,
            State::Record => {
                // Empty input makes `csv_core` close the open field and record
                self.reserve();
                let (_, _, _, nend) = self.reader.read_record(
                    &[],
                    &mut self.output[self.output_len..],
                    &mut self.ends[self.ends_len..],
                );
                self.ends_len += nend;
            }
            State::AfterCr | State::Done => {}
        }

        let mut start = 0;
        let fields = self.ends[..self.ends_len]
            .iter()
            .map(|&end| {
                let field = String::from_utf8_lossy(&self.output[start..end]).into_owned();
                start = end;
                field
            })
            .collect();
        Some(fields)
    }
}
