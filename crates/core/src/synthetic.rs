//! Deterministic generated traces for exercising views without a capture.

use std::io::Write;

use proflog_format::{BlockRecord, FormatError, RawRecord, TraceHeader, TraceWriter};
use serde::{Deserialize, Serialize};

use crate::builder::TreeBuilder;
use crate::loader::{LoadError, LoadOptions, LoadedTrace};
use crate::model::BlockIndex;

/// Generated timestamps are microseconds.
const TICKS_PER_SECOND: u64 = 1_000_000;

/// Shape of a generated trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticParams {
    pub threads: u32,
    /// Top-level blocks per thread.
    pub frames_per_thread: u32,
    /// Nesting levels below each frame.
    pub depth: u32,
    /// Children of every non-leaf block.
    pub children_per_block: u32,
}

impl Default for SyntheticParams {
    fn default() -> Self {
        Self {
            threads: 1,
            frames_per_thread: 100,
            depth: 1,
            children_per_block: 3,
        }
    }
}

impl SyntheticParams {
    /// Number of blocks `generate` will produce, or `None` if it would not
    /// fit a single trace.
    pub fn expected_blocks(&self) -> Option<usize> {
        let mut per_frame: usize = 0;
        let mut level: usize = 1;
        for _ in 0..=self.depth {
            per_frame = per_frame.checked_add(level)?;
            level = level.checked_mul(self.children_per_block as usize)?;
        }
        let total = per_frame
            .checked_mul(self.frames_per_thread as usize)?
            .checked_mul(self.threads as usize)?;
        (total < BlockIndex::MAX_COUNT).then_some(total)
    }

    /// All records of the trace, in completion order.
    fn records(&self) -> Vec<BlockRecord> {
        let mut out = Vec::with_capacity(self.expected_blocks().unwrap_or(0));
        for t in 0..self.threads {
            let thread_id = t + 1;
            let mut cursor: u64 = 0;
            for frame in 0..self.frames_per_thread {
                let mut emitter = Emitter {
                    params: self,
                    thread_id,
                    seed: u64::from(thread_id) * 7919 + u64::from(frame),
                    out: &mut out,
                };
                cursor = emitter.emit(&format!("frame {frame}"), 0, cursor) + 5;
            }
        }
        out
    }
}

struct Emitter<'a> {
    params: &'a SyntheticParams,
    thread_id: u32,
    seed: u64,
    out: &'a mut Vec<BlockRecord>,
}

impl Emitter<'_> {
    /// Emit a block starting at `begin` and all its descendants. Returns the
    /// block's end.
    fn emit(&mut self, name: &str, level: u32, begin: u64) -> u64 {
        let end = if level == self.params.depth {
            self.seed = self.seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            begin + 10 + (self.seed >> 33) % 90
        } else {
            let mut cursor = begin + 1;
            for child in 0..self.params.children_per_block {
                let child_name = format!("scope {}.{child}", level + 1);
                cursor = self.emit(&child_name, level + 1, cursor) + 1;
            }
            cursor
        };

        let color = 0xff00_0000 | (0x0040_2010_u32.wrapping_mul(level + 1) & 0x00ff_ffff);
        self.out
            .push(BlockRecord::block(name, self.thread_id, begin, end).with_color(color));
        end
    }
}

/// Build a trace in memory without going through a file, honouring the
/// same options a file load would.
pub fn generate(
    params: &SyntheticParams,
    options: &LoadOptions,
) -> Result<LoadedTrace, LoadError> {
    params.expected_blocks().ok_or(LoadError::TooManyBlocks)?;

    let mut builder = TreeBuilder::new(
        TraceHeader::new(TICKS_PER_SECOND),
        options.gather_statistics,
        0,
    );
    for record in params.records() {
        let payload = record.encode_payload()?;
        builder.push(&RawRecord::decode(0, &payload)?)?;
    }
    Ok(builder.finish())
}

/// Write the trace `generate` would build as a `.prof` file. Returns the
/// number of records written.
pub fn write_synthetic<W: Write>(writer: W, params: &SyntheticParams) -> Result<usize, FormatError> {
    let mut writer = TraceWriter::new(writer, TraceHeader::new(TICKS_PER_SECOND))?;
    for record in params.records() {
        writer.write_block(&record)?;
    }
    let (_, count) = writer.finish()?;
    Ok(count)
}
