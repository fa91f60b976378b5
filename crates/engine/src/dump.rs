//! Dump file statement splitting
//!
//! A table dump is a sequence of statements separated by a delimiter, one `INSERT`
//! per row by default (`"\n"`). Dumps can be far larger than memory, so
//! [`StatementSplitter`] reads them in fixed-size chunks and carries the unterminated
//! tail of each chunk into the next one.

use std::io::{ErrorKind, Read};

use crate::error::{Error, Result};

/// Bytes read from the underlying reader at a time
pub const CHUNK_SIZE: usize = 4096;

/// Default statement delimiter
pub const DEFAULT_DELIMITER: &str = "\n";

/// Iterator over the delimited statements of a dump.
///
/// Empty statements (consecutive delimiters, a trailing delimiter) are skipped. A
/// read error ends iteration after being yielded once.
pub struct StatementSplitter<R> {
    reader: R,
    delimiter: Vec<u8>,
    buffer: Vec<u8>,
    /// Bytes of `buffer` already searched without finding a delimiter
    scanned: usize,
    eof: bool,
}

impl<R: Read> StatementSplitter<R> {
    /// Split `reader` on `delimiter`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the delimiter is empty.
    pub fn new(reader: R, delimiter: &str) -> Result<Self> {
        if delimiter.is_empty() {
            return Err(Error::config("delimiter must not be empty"));
        }
        Ok(StatementSplitter {
            reader,
            delimiter: delimiter.as_bytes().to_vec(),
            buffer: Vec::new(),
            scanned: 0,
            eof: false,
        })
    }

    /// Next statement, including empty ones
    fn next_raw(&mut self) -> Option<Result<Vec<u8>>> {
        loop {
            if let Some(end) = self.find_delimiter() {
                let rest = self.buffer.split_off(end + self.delimiter.len());
                let mut statement = std::mem::replace(&mut self.buffer, rest);
                statement.truncate(end);
                self.scanned = 0;
                return Some(Ok(statement));
            }
            if self.eof {
                if self.buffer.is_empty() {
                    return None;
                }
                self.scanned = 0;
                return Some(Ok(std::mem::take(&mut self.buffer)));
            }
            // Keep a partial delimiter at the end of the buffer searchable
            self.scanned = self.buffer.len().saturating_sub(self.delimiter.len() - 1);
            if let Err(e) = self.fill() {
                self.eof = true;
                self.buffer.clear();
                return Some(Err(e));
            }
        }
    }

    fn find_delimiter(&self) -> Option<usize> {
        let haystack = self.buffer.get(self.scanned..)?;
        if haystack.len() < self.delimiter.len() {
            return None;
        }
        haystack
            .windows(self.delimiter.len())
            .position(|w| w == self.delimiter.as_slice())
            .map(|i| i + self.scanned)
    }

    fn fill(&mut self) -> Result<()> {
        let mut chunk = [0u8; CHUNK_SIZE];
        loop {
            match self.reader.read(&mut chunk) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.buffer.extend_from_slice(&chunk[..n]);
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl<R: Read> Iterator for StatementSplitter<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = match self.next_raw()? {
                Ok(raw) => raw,
                Err(e) => return Some(Err(e)),
            };
            if raw.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return Some(Ok(String::from_utf8_lossy(&raw).into_owned()));
        }
    }
}
