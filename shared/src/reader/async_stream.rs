//! Log stream over a tokio `AsyncBufRead` source.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::{trim_newline, LineDecoder, LogLineRecord};
use crate::config::ReaderConfig;

/// The async counterpart of [`JsonLogsStream`](super::JsonLogsStream).
///
/// Records are pulled with [`next_record`](Self::next_record); dropping the
/// stream cancels reading.
///
/// # Example
///
/// ```
/// use shared::reader::AsyncJsonLogsStream;
///
/// # tokio_test::block_on(async {
/// let mut stream = AsyncJsonLogsStream::new(&b"not json\n"[..]);
/// let record = stream.next_record().await.unwrap();
/// assert!(record.outcome.is_err());
/// assert!(stream.next_record().await.is_none());
/// # });
/// ```
pub struct AsyncJsonLogsStream<R> {
    reader: R,
    decoder: LineDecoder,
    buffer: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin> AsyncJsonLogsStream<R> {
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

    /// Reads the next non-blank line. Returns `None` once the source is
    /// exhausted or the error policy has ended the stream.
    pub async fn next_record(&mut self) -> Option<LogLineRecord> {
        while !self.decoder.done {
            self.buffer.clear();
            match self.reader.read_until(b'\n', &mut self.buffer).await {
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

    /// Reads all remaining records.
    pub async fn collect_records(mut self) -> Vec<LogLineRecord> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record().await {
            records.push(record);
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ErrorPolicy, Schema};
    use crate::reader::LineError;
    use tokio::io::BufReader;

    const VALID: &str = r#"{"type": "console", "timestamp": "2019-01-03T16:30:53,058+0100", "level": "WARN", "component": "c", "cluster.name": "cl", "node.name": "n0", "message": "ok"}"#;

    #[tokio::test]
    async fn test_lines_split_across_reads() {
        let (head, tail) = VALID.split_at(40);
        let mock = tokio_test::io::Builder::new()
            .read(head.as_bytes())
            .read(tail.as_bytes())
            .read(b"\n")
            .read(VALID.as_bytes())
            .build();

        let records = AsyncJsonLogsStream::new(BufReader::new(mock))
            .collect_records()
            .await;

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.outcome.is_ok()));
        assert_eq!(records[1].line_number, 2);
    }

    #[tokio::test]
    async fn test_node_schema_and_error_isolation() {
        let input = format!("{VALID}\n[]\n{VALID}\n");
        let config = ReaderConfig::new(Schema::Node);

        let records = AsyncJsonLogsStream::with_config(input.as_bytes(), config)
            .collect_records()
            .await;

        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0].outcome.as_ref().unwrap().node_name.as_deref(),
            Some("n0")
        );
        assert!(matches!(records[1].outcome, Err(LineError::NotAnObject)));
        assert!(records[2].outcome.is_ok());
    }

    #[tokio::test]
    async fn test_fail_fast() {
        let input = format!("oops\n{VALID}\n");
        let config = ReaderConfig::default().with_policy(ErrorPolicy::FailFast);

        let records = AsyncJsonLogsStream::with_config(input.as_bytes(), config)
            .collect_records()
            .await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line_number, 1);
    }

    #[tokio::test]
    async fn test_read_error_is_reported() {
        let mock = tokio_test::io::Builder::new()
            .read(format!("{VALID}\n").as_bytes())
            .read_error(std::io::Error::other("reset"))
            .build();

        let records = AsyncJsonLogsStream::new(BufReader::new(mock))
            .collect_records()
            .await;

        assert_eq!(records.len(), 2);
        assert!(matches!(records[1].outcome, Err(LineError::Io(_))));
    }
}
