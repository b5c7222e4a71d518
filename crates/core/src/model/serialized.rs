use proflog_format::record::{payload_args, payload_color, payload_name};

/// Location of one record payload inside a [`SerializedData`] arena.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataRef {
    offset: u32,
    len: u16,
}

impl DataRef {
    pub fn offset(&self) -> usize {
        self.offset as usize
    }

    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Append-only arena holding the raw payload of every record of a trace.
///
/// Blocks refer into it by [`DataRef`]. A reference taken from one arena
/// resolves to an empty slice in any other arena that is too short for it,
/// but may resolve to unrelated bytes otherwise, so references must not be
/// kept across a session reload.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SerializedData {
    bytes: Vec<u8>,
}

impl SerializedData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Copy `payload` into the arena. `None` when the arena would grow past
    /// what a [`DataRef`] can address or the payload is longer than a record.
    pub fn push(&mut self, payload: &[u8]) -> Option<DataRef> {
        let offset = u32::try_from(self.bytes.len()).ok()?;
        let len = u16::try_from(payload.len()).ok()?;
        u32::try_from(self.bytes.len() + payload.len()).ok()?;
        self.bytes.extend_from_slice(payload);
        Some(DataRef { offset, len })
    }

    pub fn payload(&self, data: DataRef) -> &[u8] {
        self.bytes
            .get(data.offset()..data.offset() + data.len())
            .unwrap_or_default()
    }

    pub fn name(&self, data: DataRef) -> &str {
        payload_name(self.payload(data))
    }

    pub fn args(&self, data: DataRef) -> &[u8] {
        payload_args(self.payload(data))
    }

    pub fn color(&self, data: DataRef) -> u32 {
        payload_color(self.payload(data))
    }

    /// Total bytes stored.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn clear(&mut self) {
        self.bytes = Vec::new();
    }
}
