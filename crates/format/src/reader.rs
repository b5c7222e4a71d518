use crate::{FormatError, RawRecord, TraceHeader};

/// Sequential decoder over an in-memory trace file.
///
/// Yields records in file order. The first error ends the iteration.
#[derive(Debug)]
pub struct RecordReader<'a> {
    bytes: &'a [u8],
    header: TraceHeader,
    pos: usize,
    failed: bool,
}

impl<'a> RecordReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self, FormatError> {
        let header = TraceHeader::decode(bytes)?;
        Ok(Self {
            bytes,
            header,
            pos: TraceHeader::LEN,
            failed: false,
        })
    }

    pub fn header(&self) -> &TraceHeader {
        &self.header
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn next_record(&mut self) -> Result<RawRecord<'a>, FormatError> {
        let offset = self.pos;
        let Some(prefix) = self.bytes.get(offset..offset + 2) else {
            return Err(FormatError::TruncatedRecord { offset });
        };
        let len = usize::from(u16::from_le_bytes([prefix[0], prefix[1]]));

        let start = offset + 2;
        let Some(payload) = self.bytes.get(start..start + len) else {
            return Err(FormatError::TruncatedRecord { offset });
        };

        let record = RawRecord::decode(offset, payload)?;
        self.pos = start + len;
        Ok(record)
    }
}

impl<'a> Iterator for RecordReader<'a> {
    type Item = Result<RawRecord<'a>, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.bytes.len() {
            return None;
        }
        let result = self.next_record();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}
