use serde::{Deserialize, Serialize};

use crate::FormatError;

pub const MAGIC: [u8; 4] = *b"PRFL";
pub const FORMAT_VERSION: u16 = 1;

/// Fixed 16-byte preamble of every trace file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceHeader {
    pub version: u16,
    /// Frequency of the record timestamps. `0` means they are already
    /// nanoseconds.
    pub ticks_per_second: u64,
}

impl TraceHeader {
    pub const LEN: usize = 16;

    pub fn new(ticks_per_second: u64) -> Self {
        Self {
            version: FORMAT_VERSION,
            ticks_per_second,
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, FormatError> {
        let Some(raw) = bytes.get(..Self::LEN) else {
            return Err(FormatError::TruncatedHeader(bytes.len()));
        };

        let magic = [raw[0], raw[1], raw[2], raw[3]];
        if magic != MAGIC {
            return Err(FormatError::BadMagic(magic));
        }

        let version = u16::from_le_bytes([raw[4], raw[5]]);
        if version != FORMAT_VERSION {
            return Err(FormatError::UnsupportedVersion(version));
        }

        let mut freq = [0u8; 8];
        freq.copy_from_slice(&raw[8..16]);

        Ok(Self {
            version,
            ticks_per_second: u64::from_le_bytes(freq),
        })
    }

    pub fn encode(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out[..4].copy_from_slice(&MAGIC);
        out[4..6].copy_from_slice(&self.version.to_le_bytes());
        // bytes 6..8 reserved
        out[8..].copy_from_slice(&self.ticks_per_second.to_le_bytes());
        out
    }

    /// Convert a tick count to nanoseconds.
    pub fn ticks_to_ns(&self, ticks: u64) -> u64 {
        match self.ticks_per_second {
            0 | 1_000_000_000 => ticks,
            freq => ((u128::from(ticks) * 1_000_000_000) / u128::from(freq))
                .try_into()
                .unwrap_or(u64::MAX),
        }
    }
}

impl Default for TraceHeader {
    fn default() -> Self {
        Self::new(0)
    }
}
