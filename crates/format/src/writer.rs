use std::io::Write;

use crate::{BlockRecord, FormatError, TraceHeader};

/// Streams records into a trace file.
///
/// Callers are responsible for emitting scopes in completion order
/// (children before the parent that encloses them).
pub struct TraceWriter<W: Write> {
    inner: W,
    records: usize,
}

impl<W: Write> TraceWriter<W> {
    /// Write the header and return a writer positioned at the first record.
    pub fn new(mut inner: W, header: TraceHeader) -> Result<Self, FormatError> {
        inner.write_all(&header.encode())?;
        Ok(Self { inner, records: 0 })
    }

    pub fn write_block(&mut self, record: &BlockRecord) -> Result<(), FormatError> {
        let payload = record.encode_payload()?;
        let len = u16::try_from(payload.len())
            .map_err(|_| FormatError::RecordTooLarge(record.name.clone()))?;
        self.inner.write_all(&len.to_le_bytes())?;
        self.inner.write_all(&payload)?;
        self.records += 1;
        Ok(())
    }

    pub fn records_written(&self) -> usize {
        self.records
    }

    /// Flush and hand back the underlying writer with the record count.
    pub fn finish(mut self) -> Result<(W, usize), FormatError> {
        self.inner.flush()?;
        Ok((self.inner, self.records))
    }
}
