//! Loading of `.prof` profiler logs into per-thread block trees, and the
//! session state views read them from.

mod builder;
pub mod config;
pub mod loader;
pub mod model;
pub mod synthetic;

pub use config::{ConfigError, ProflogConfig};
pub use loader::{LoadError, LoadOptions, LoadedTrace, TraceLoader, fill_trees_from_file};
pub use model::{
    Block, BlockIndex, BlockStatistics, DataRef, GuiBlock, Selection, SerializedData, Session,
    SessionError, ThreadBlocksTree, ThreadId, ThreadTree,
};
pub use synthetic::{SyntheticParams, generate, write_synthetic};
