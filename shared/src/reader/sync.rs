//! Blocking log stream over any `BufRead` source.

use std::io::BufRead;

use super::{trim_newline, LineDecoder, LogLineRecord};
use crate::config::ReaderConfig;
use crate::models::LogLine;

/// A lazy, forward-only sequence of parsed log lines over a blocking reader.
///
/// Lines are read one at a time, so arbitrarily large sources are processed
/// in bounded memory. Dropping the stream early is the way to stop reading.
pub struct JsonLogsStream<R: BufRead> {
    reader: R,
    decoder: LineDecoder,
    buffer: Vec<u8>,
}

impl<R: BufRead> JsonLogsStream<R> {
    /// Creates a stream with the default schema and error policy.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, ReaderConfig::default())
    }

    /// Creates a stream with the given configuration.
    #[must_use]
    pub fn with_config(reader: R, config: ReaderConfig) -> Self {
        Self {
            reader,
            decoder: LineDecoder::new(config),
            buffer: Vec::new(),
        }
    }

    /// Returns the reader configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.decoder.config
    }

    /// Yields parsed lines without line numbers. The first error is yielded
    /// and ends the sequence.
    pub fn log_lines(self) -> impl Iterator<Item = Result<LogLine, super::LineError>> {
        let mut failed = false;
        self.map_while(move |record| {
            if failed {
                return None;
            }
            failed = record.outcome.is_err();
            Some(record.outcome)
        })
    }

    /// Consumes the stream and returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> Iterator for JsonLogsStream<R> {
    type Item = LogLineRecord;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.decoder.done {
            self.buffer.clear();
            match self.reader.read_until(b'\n', &mut self.buffer) {
                Ok(0) => {
                    self.decoder.done = true;
                }
                Ok(_) => {
                    if let Some(record) = self.decoder.decode(trim_newline(&self.buffer)) {
                        return Some(record);
                    }
                }
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
                Err(err) => return Some(self.decoder.read_failed(err)),
            }
        }
        None
    }
}
