use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use proflog_format::TraceHeader;
use thiserror::Error;

use super::{Block, BlockIndex, GuiBlock, Selection, SerializedData, ThreadBlocksTree, ThreadId};
use crate::loader::{LoadOptions, LoadedTrace, TraceLoader};
use crate::synthetic::{self, SyntheticParams};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("thread {0} is not part of the loaded trace")]
    UnknownThread(ThreadId),
    #[error("block {index} is out of range, the trace has {count} blocks")]
    BlockOutOfRange { index: BlockIndex, count: usize },
}

/// The currently loaded trace and the view state layered over it.
///
/// A session is owned by a single controller which serializes `load`,
/// `reload`, `reset` and `replace`. Each of these discards the previous
/// generation as a whole; borrowed blocks, arena slices and [`DataRef`]s
/// from before the call must not be used afterwards. [`generation`] changes
/// on every such swap so views can tell their caches are stale.
///
/// [`DataRef`]: super::DataRef
/// [`generation`]: Session::generation
#[derive(Debug, Default)]
pub struct Session {
    options: LoadOptions,
    last_path: Option<PathBuf>,
    header: TraceHeader,
    data: SerializedData,
    tree: ThreadBlocksTree,
    gui_blocks: Vec<GuiBlock>,
    selection: Selection,
    generation: u64,
}

impl Session {
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Load the trace at `path` and install it.
    ///
    /// Returns the number of blocks loaded. `0` means the file could not be
    /// used, in which case the session is left exactly as it was.
    pub fn load(&mut self, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        let trace = TraceLoader::new(self.options).load(path);
        if trace.is_empty() {
            return 0;
        }

        let count = trace.total_blocks();
        self.last_path = Some(path.to_path_buf());
        self.replace(trace);
        count
    }

    /// Load the last successfully loaded path again, discarding the
    /// current trace on success. Returns `0` if there is no such path or
    /// the load failed.
    pub fn reload(&mut self) -> usize {
        let Some(path) = self.last_path.clone() else {
            debug!("reload requested with no previous trace");
            return 0;
        };
        self.load(path)
    }

    /// Install a freshly loaded trace, resetting the selection and
    /// allocating one zeroed [`GuiBlock`] per block.
    ///
    /// Callers must not pass an empty trace; one is ignored.
    pub fn replace(&mut self, trace: LoadedTrace) {
        debug_assert!(!trace.is_empty(), "replace called with an empty trace");
        if trace.is_empty() {
            warn!("ignoring empty trace");
            return;
        }

        let (header, data, tree, total_blocks) = trace.into_parts();
        self.selection = Selection::none();
        self.header = header;
        self.data = data;
        self.tree = tree;
        self.gui_blocks = vec![GuiBlock::new(); total_blocks];
        self.generation += 1;
        debug!(
            "session generation {} holds {total_blocks} blocks",
            self.generation
        );
    }

    /// Drop the loaded trace and clear the selection. The last path is kept
    /// so `reload` still works.
    pub fn reset(&mut self) {
        self.selection = Selection::none();
        self.header = TraceHeader::default();
        self.data.clear();
        self.tree.clear();
        self.gui_blocks = Vec::new();
        self.generation += 1;
    }

    /// Clear the session and install a generated trace in its place, built
    /// with the session's load options. Returns the number of generated
    /// blocks.
    pub fn load_test_data(&mut self, params: &SyntheticParams) -> usize {
        self.reset();
        match synthetic::generate(params, &self.options) {
            Ok(trace) if !trace.is_empty() => {
                let count = trace.total_blocks();
                self.replace(trace);
                info!("installed {count} generated blocks");
                count
            }
            Ok(_) => 0,
            Err(e) => {
                warn!("test data generation failed: {e}");
                0
            }
        }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_deref()
    }

    /// Remember `path` as the trace to reload, e.g. when restoring a
    /// previous run.
    pub fn set_last_path(&mut self, path: impl Into<PathBuf>) {
        self.last_path = Some(path.into());
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

    pub fn gui_blocks(&self) -> &[GuiBlock] {
        &self.gui_blocks
    }

    pub fn gui_blocks_mut(&mut self) -> &mut [GuiBlock] {
        &mut self.gui_blocks
    }

    pub fn gui_block(&self, index: BlockIndex) -> Option<&GuiBlock> {
        self.gui_blocks.get(index.as_usize())
    }

    /// Number of blocks in the loaded trace.
    pub fn block_count(&self) -> usize {
        self.gui_blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gui_blocks.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn block_name(&self, block: &Block) -> &str {
        self.data.name(block.data)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn select_thread(&mut self, thread_id: ThreadId) -> Result<(), SessionError> {
        if !self.tree.contains(thread_id) {
            return Err(SessionError::UnknownThread(thread_id));
        }
        self.selection.thread = Some(thread_id);
        Ok(())
    }

    pub fn select_block(&mut self, index: BlockIndex) -> Result<(), SessionError> {
        if index.as_usize() >= self.gui_blocks.len() {
            return Err(SessionError::BlockOutOfRange {
                index,
                count: self.gui_blocks.len(),
            });
        }
        self.selection.block = Some(index);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::none();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SyntheticParams {
        SyntheticParams {
            threads: 2,
            frames_per_thread: 3,
            depth: 1,
            children_per_block: 2,
        }
    }

    #[test]
    fn empty_session() {
        let session = Session::new(LoadOptions::default());
        assert!(session.is_empty());
        assert_eq!(session.block_count(), 0);
        assert_eq!(session.selection(), Selection::none());
        assert!(session.last_path().is_none());
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn replace_allocates_unset_records_and_clears_selection() {
        let mut session = Session::default();
        assert_eq!(session.load_test_data(&small()), 18);

        session.select_thread(1).expect("thread 1");
        session.select_block(BlockIndex::from(4)).expect("block 4");
        session.gui_blocks_mut()[4].expanded = true;

        let trace = synthetic::generate(&small(), session.options()).expect("generate");
        session.replace(trace);

        assert_eq!(session.block_count(), 18);
        assert_eq!(session.selection(), Selection::none());
        assert!(session.gui_blocks().iter().all(|g| *g == GuiBlock::new()));
    }

    #[test]
    fn selection_is_validated() {
        let mut session = Session::default();
        session.load_test_data(&small());

        assert_eq!(
            session.select_thread(99),
            Err(SessionError::UnknownThread(99))
        );
        assert_eq!(
            session.select_block(BlockIndex::from(18)),
            Err(SessionError::BlockOutOfRange {
                index: BlockIndex::from(18),
                count: 18
            })
        );
        assert!(session.select_block(BlockIndex::from(17)).is_ok());
        assert_eq!(session.selection().block, Some(BlockIndex::from(17)));

        session.clear_selection();
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_data_honours_statistics_option() {
        let mut gathered = Session::new(LoadOptions::default());
        gathered.load_test_data(&small());
        assert!(gathered.tree().iter().all(|t| !t.statistics.is_empty()));

        let mut plain = Session::new(LoadOptions {
            gather_statistics: false,
        });
        plain.load_test_data(&small());
        assert!(plain.tree().iter().all(|t| t.statistics.is_empty()));
    }

    #[test]
    fn selected_thread_survives_persistence() {
        let mut session = Session::default();
        session.load_test_data(&small());
        session.select_thread(1).expect("thread 1");
        session.select_block(BlockIndex::from(0)).expect("block 0");

        let json = serde_json::to_string(&session.selection()).unwrap_or_default();
        let restored: Selection = serde_json::from_str(&json).unwrap_or_default();
        assert_eq!(restored, session.selection());
        assert_eq!(restored.thread, Some(1));
        assert_eq!(restored.block, Some(BlockIndex::from(0)));

        // No loaded trace can contain the thread id reserved for "none".
        assert_eq!(session.select_thread(0), Err(SessionError::UnknownThread(0)));
    }

    #[test]
    fn reload_without_history_is_a_no_op() {
        let mut session = Session::default();
        session.load_test_data(&small());
        let generation = session.generation();

        assert_eq!(session.reload(), 0);
        assert_eq!(session.block_count(), 18);
        assert_eq!(session.generation(), generation);
    }

    #[test]
    fn test_data_replaces_previous_trace() {
        let mut session = Session::default();
        session.load_test_data(&small());
        session.select_block(BlockIndex::from(0)).expect("select");

        let empty = SyntheticParams {
            threads: 0,
            ..small()
        };
        assert_eq!(session.load_test_data(&empty), 0);
        assert!(session.is_empty());
        assert!(session.tree().is_empty());
        assert!(session.data().is_empty());
        assert!(session.selection().is_empty());
    }

    #[test]
    fn block_names_resolve_through_session() {
        let mut session = Session::default();
        session.load_test_data(&small());
        let thread = session.tree().get(2).expect("thread 2");
        let first = &thread.roots[0];
        assert_eq!(session.block_name(first), "frame 0");
        assert_eq!(session.block_name(&first.children[1]), "scope 1.1");
    }
}
