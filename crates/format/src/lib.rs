//! On-disk layout of `.prof` trace files.
//!
//! ```text
//!   header (16 B) ─┬─ record ─ record ─ record … EOF
//!                  │
//!                  └─ record = u16 payload_len ‖ payload
//!                     payload = begin u64 ‖ end u64 ‖ thread u32 ‖ kind u8
//!                               ‖ color u32 ‖ name … NUL ‖ args …
//! ```
//!
//! Records are flushed in completion order: a scope is written when it
//! closes, so nested scopes always precede the scope that encloses them.

pub mod error;
pub mod header;
pub mod reader;
pub mod record;
pub mod writer;

pub use error::FormatError;
pub use header::{FORMAT_VERSION, MAGIC, TraceHeader};
pub use reader::RecordReader;
pub use record::{BlockKind, BlockRecord, MIN_PAYLOAD_LEN, RawRecord};
pub use writer::TraceWriter;
