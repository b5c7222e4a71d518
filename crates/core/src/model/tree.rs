use std::collections::BTreeMap;

use super::block::{Block, BlockIndex, ThreadId, Walk};
use super::statistics::{BlockStatistics, StatsId};

/// All blocks recorded on one thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadTree {
    pub thread_id: ThreadId,
    /// Top-level blocks in temporal order.
    pub roots: Vec<Block>,
    /// Number of blocks in this thread, at any depth.
    pub block_count: usize,
    /// Deepest nesting level present (0 when only roots exist).
    pub depth: u32,
    /// Per-name statistics, empty unless gathered at load time.
    pub statistics: Vec<BlockStatistics>,
}

impl ThreadTree {
    pub fn walk(&self) -> Walk<'_> {
        Walk::over(&self.roots)
    }

    pub fn statistics_for(&self, id: StatsId) -> Option<&BlockStatistics> {
        self.statistics.get(id.as_usize())
    }

    /// First timestamp covered by the thread, if it has any blocks.
    pub fn begin(&self) -> Option<u64> {
        self.roots.first().map(|b| b.begin)
    }

    /// Last timestamp covered by the thread, if it has any blocks.
    pub fn end(&self) -> Option<u64> {
        self.roots.iter().map(|b| b.end).max()
    }
}

/// The per-thread forest of a loaded trace, keyed by thread id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadBlocksTree {
    threads: BTreeMap<ThreadId, ThreadTree>,
}

impl ThreadBlocksTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, thread_id: ThreadId) -> Option<&ThreadTree> {
        self.threads.get(&thread_id)
    }

    pub fn contains(&self, thread_id: ThreadId) -> bool {
        self.threads.contains_key(&thread_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThreadTree> {
        self.threads.values()
    }

    pub fn threads(&self) -> impl Iterator<Item = ThreadId> + '_ {
        self.threads.keys().copied()
    }

    /// Number of threads.
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Number of blocks across all threads.
    pub fn total_blocks(&self) -> usize {
        self.threads.values().map(|t| t.block_count).sum()
    }

    /// Look a block up by its global index.
    pub fn find(&self, index: BlockIndex) -> Option<&Block> {
        self.threads
            .values()
            .flat_map(ThreadTree::walk)
            .find(|b| b.index == index)
    }

    pub fn swap(&mut self, other: &mut ThreadBlocksTree) {
        std::mem::swap(&mut self.threads, &mut other.threads);
    }

    pub fn clear(&mut self) {
        self.threads.clear();
    }

    pub(crate) fn insert(&mut self, tree: ThreadTree) {
        self.threads.insert(tree.thread_id, tree);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DataRef;
    use proflog_format::BlockKind;

    fn block(index: u32, thread_id: ThreadId, begin: u64, end: u64) -> Block {
        Block {
            index: BlockIndex::from(index),
            begin,
            end,
            thread_id,
            kind: BlockKind::Block,
            depth: 0,
            data: DataRef::default(),
            stats: None,
            children: Vec::new(),
        }
    }

    fn sample() -> ThreadBlocksTree {
        let mut root = block(1, 7, 0, 100);
        root.children.push(block(0, 7, 10, 20));

        let mut tree = ThreadBlocksTree::new();
        tree.insert(ThreadTree {
            thread_id: 7,
            roots: vec![root, block(2, 7, 150, 160)],
            block_count: 3,
            depth: 1,
            statistics: Vec::new(),
        });
        tree.insert(ThreadTree {
            thread_id: 3,
            roots: vec![block(3, 3, 5, 6)],
            block_count: 1,
            depth: 0,
            statistics: Vec::new(),
        });
        tree
    }

    #[test]
    fn counts_and_lookup() {
        let tree = sample();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.total_blocks(), 4);
        assert_eq!(tree.threads().collect::<Vec<_>>(), vec![3, 7]);
        assert_eq!(tree.find(BlockIndex::from(0)).map(|b| b.begin), Some(10));
        assert_eq!(tree.find(BlockIndex::from(3)).map(|b| b.thread_id), Some(3));
        assert!(tree.find(BlockIndex::from(9)).is_none());
    }

    #[test]
    fn thread_bounds() {
        let tree = sample();
        let main = tree.get(7).expect("thread 7");
        assert_eq!(main.begin(), Some(0));
        assert_eq!(main.end(), Some(160));
        assert_eq!(main.walk().count(), 3);
    }

    #[test]
    fn swap_and_clear() {
        let mut a = sample();
        let mut b = ThreadBlocksTree::new();
        a.swap(&mut b);
        assert!(a.is_empty());
        assert_eq!(b.total_blocks(), 4);
        b.clear();
        assert!(b.is_empty());
        assert!(!b.contains(7));
    }
}
