use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use proflog_format::{FormatError, RecordReader, TraceHeader};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::TreeBuilder;
use crate::model::{SerializedData, ThreadBlocksTree};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed trace: {0}")]
    Format(#[from] FormatError),
    #[error("trace contains no blocks")]
    Empty,
    #[error("trace holds more blocks than can be indexed")]
    TooManyBlocks,
    #[error("trace payload exceeds the addressable arena size")]
    ArenaOverflow,
}

/// Knobs for a trace load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Gather per-thread, per-name statistics while parsing and link every
    /// block to its entry.
    pub gather_statistics: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            gather_statistics: true,
        }
    }
}

/// Result of one load: the arena, the per-thread forest built over it and
/// the number of blocks it holds.
///
/// An empty trace (`total_blocks() == 0`) signals failure and must not be
/// installed into a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedTrace {
    header: TraceHeader,
    data: SerializedData,
    tree: ThreadBlocksTree,
    total_blocks: usize,
}

impl LoadedTrace {
    pub(crate) fn new(
        header: TraceHeader,
        data: SerializedData,
        tree: ThreadBlocksTree,
        total_blocks: usize,
    ) -> Self {
        Self {
            header,
            data,
            tree,
            total_blocks,
        }
    }

    pub fn header(&self) -> &TraceHeader {
        &self.header
    }

    pub fn data(&self) -> &SerializedData {
        &self.data
    }

    pub fn tree(&self) -> &ThreadBlocksTree {
        &self.tree
    }

    pub fn total_blocks(&self) -> usize {
        self.total_blocks
    }

    pub fn is_empty(&self) -> bool {
        self.total_blocks == 0
    }

    pub fn into_parts(self) -> (TraceHeader, SerializedData, ThreadBlocksTree, usize) {
        (self.header, self.data, self.tree, self.total_blocks)
    }
}

/// Reads `.prof` trace files into block trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceLoader {
    options: LoadOptions,
}

impl TraceLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Decode an in-memory trace.
    pub fn parse(&self, bytes: &[u8]) -> Result<LoadedTrace, LoadError> {
        let reader = RecordReader::new(bytes)?;
        let mut builder = TreeBuilder::new(
            *reader.header(),
            self.options.gather_statistics,
            reader.remaining(),
        );

        for record in reader {
            builder.push(&record?)?;
        }

        let trace = builder.finish();
        if trace.is_empty() {
            return Err(LoadError::Empty);
        }
        Ok(trace)
    }

    /// Read the whole file at `path` and decode it.
    pub fn read(&self, path: &Path) -> Result<LoadedTrace, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("read {} bytes from {}", bytes.len(), path.display());
        self.parse(&bytes)
    }

    /// Load `path`, collapsing every failure into an empty trace.
    pub fn load(&self, path: &Path) -> LoadedTrace {
        match self.read(path) {
            Ok(trace) => {
                info!(
                    "loaded {} blocks in {} threads from {}",
                    trace.total_blocks(),
                    trace.tree().len(),
                    path.display()
                );
                trace
            }
            Err(e) => {
                warn!("failed to load {}: {e}", path.display());
                LoadedTrace::default()
            }
        }
    }
}

/// Load a trace file, returning the arena, the forest and the block count.
/// A count of zero means the file could not be used.
pub fn fill_trees_from_file(
    path: impl AsRef<Path>,
    gather_statistics: bool,
) -> (SerializedData, ThreadBlocksTree, usize) {
    let trace = TraceLoader::new(LoadOptions { gather_statistics }).load(path.as_ref());
    let (_, data, tree, total_blocks) = trace.into_parts();
    (data, tree, total_blocks)
}
