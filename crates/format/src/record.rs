use serde::{Deserialize, Serialize};

use crate::FormatError;

const BEGIN: usize = 0;
const END: usize = 8;
const THREAD: usize = 16;
const KIND: usize = 20;
const COLOR: usize = 21;
const NAME: usize = 25;

/// Smallest legal payload: the fixed fields plus an empty NUL-terminated name.
pub const MIN_PAYLOAD_LEN: usize = NAME + 1;

/// What a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Scope with a start and an end.
    Block,
    /// Instant marker, `begin == end`.
    Event,
}

impl BlockKind {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Block),
            1 => Some(Self::Event),
            _ => None,
        }
    }

    fn to_byte(self) -> u8 {
        match self {
            Self::Block => 0,
            Self::Event => 1,
        }
    }
}

/// A decoded record borrowing its name and argument blob from the input.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    /// Byte offset of the record's length prefix in the file.
    pub offset: usize,
    pub begin: u64,
    pub end: u64,
    pub thread_id: u32,
    pub kind: BlockKind,
    pub color: u32,
    pub name: &'a str,
    pub args: &'a [u8],
    /// The whole payload, exactly as stored in the file.
    pub payload: &'a [u8],
}

impl<'a> RawRecord<'a> {
    /// Decode and validate one payload. `offset` is only used for error
    /// reporting.
    pub fn decode(offset: usize, payload: &'a [u8]) -> Result<Self, FormatError> {
        if payload.len() < MIN_PAYLOAD_LEN {
            return Err(FormatError::PayloadTooShort {
                offset,
                len: payload.len(),
                min: MIN_PAYLOAD_LEN,
            });
        }

        let begin = le_u64(&payload[BEGIN..END]);
        let end = le_u64(&payload[END..THREAD]);
        if end < begin {
            return Err(FormatError::EndBeforeBegin { offset, begin, end });
        }

        let thread_id = le_u32(&payload[THREAD..KIND]);
        if thread_id == 0 {
            return Err(FormatError::InvalidThread { offset });
        }
        let kind = BlockKind::from_byte(payload[KIND]).ok_or(FormatError::UnknownKind {
            offset,
            kind: payload[KIND],
        })?;
        if kind == BlockKind::Event && begin != end {
            return Err(FormatError::EventWithDuration { offset });
        }

        let color = le_u32(&payload[COLOR..NAME]);

        let tail = &payload[NAME..];
        let Some(nul) = tail.iter().position(|&b| b == 0) else {
            return Err(FormatError::MissingNameTerminator { offset });
        };
        let name =
            std::str::from_utf8(&tail[..nul]).map_err(|_| FormatError::InvalidName { offset })?;

        Ok(Self {
            offset,
            begin,
            end,
            thread_id,
            kind,
            color,
            name,
            args: &tail[nul + 1..],
            payload,
        })
    }

    pub fn duration(&self) -> u64 {
        self.end - self.begin
    }
}

/// Name of an already-validated payload. Returns `""` if the payload is not
/// well-formed.
pub fn payload_name(payload: &[u8]) -> &str {
    let tail = payload.get(NAME..).unwrap_or_default();
    let nul = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    std::str::from_utf8(&tail[..nul]).unwrap_or_default()
}

/// Argument blob of an already-validated payload.
pub fn payload_args(payload: &[u8]) -> &[u8] {
    let tail = payload.get(NAME..).unwrap_or_default();
    match tail.iter().position(|&b| b == 0) {
        Some(nul) => &tail[nul + 1..],
        None => &[],
    }
}

/// Color hint of an already-validated payload.
pub fn payload_color(payload: &[u8]) -> u32 {
    payload.get(COLOR..NAME).map(le_u32).unwrap_or(0)
}

/// Owned record used when writing traces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub begin: u64,
    pub end: u64,
    pub thread_id: u32,
    pub kind: BlockKind,
    pub color: u32,
    pub name: String,
    #[serde(default)]
    pub args: Vec<u8>,
}

impl BlockRecord {
    pub fn block(name: impl Into<String>, thread_id: u32, begin: u64, end: u64) -> Self {
        Self {
            begin,
            end,
            thread_id,
            kind: BlockKind::Block,
            color: 0,
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn event(name: impl Into<String>, thread_id: u32, at: u64) -> Self {
        Self {
            kind: BlockKind::Event,
            ..Self::block(name, thread_id, at, at)
        }
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn with_args(mut self, args: impl Into<Vec<u8>>) -> Self {
        self.args = args.into();
        self
    }

    /// Serialize the payload (without the length prefix).
    pub fn encode_payload(&self) -> Result<Vec<u8>, FormatError> {
        if self.name.as_bytes().contains(&0) {
            return Err(FormatError::NulInName(self.name.clone()));
        }
        let len = MIN_PAYLOAD_LEN + self.name.len() + self.args.len();
        if len > usize::from(u16::MAX) {
            return Err(FormatError::RecordTooLarge(self.name.clone()));
        }

        let mut out = Vec::with_capacity(len);
        out.extend_from_slice(&self.begin.to_le_bytes());
        out.extend_from_slice(&self.end.to_le_bytes());
        out.extend_from_slice(&self.thread_id.to_le_bytes());
        out.push(self.kind.to_byte());
        out.extend_from_slice(&self.color.to_le_bytes());
        out.extend_from_slice(self.name.as_bytes());
        out.push(0);
        out.extend_from_slice(&self.args);
        Ok(out)
    }
}

fn le_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(buf)
}

fn le_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}
