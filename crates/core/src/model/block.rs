use proflog_format::BlockKind;
use serde::{Deserialize, Serialize};

use super::serialized::DataRef;
use super::statistics::StatsId;

/// OS thread identifier as recorded in the trace. `0` never names a real
/// thread.
pub type ThreadId = u32;

/// Position of a block in the global, load-order enumeration of a trace.
///
/// Valid indices are `0..BlockIndex::MAX_COUNT`. `u32::MAX` is never handed
/// out, so persisted "unset" values cannot collide with a real block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockIndex(u32);

impl BlockIndex {
    /// Most blocks one trace may hold.
    pub const MAX_COUNT: usize = u32::MAX as usize;

    /// `None` if `index` falls outside `0..MAX_COUNT`.
    pub fn new(index: usize) -> Option<Self> {
        if index < Self::MAX_COUNT {
            u32::try_from(index).ok().map(Self)
        } else {
            None
        }
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<BlockIndex> for u32 {
    fn from(index: BlockIndex) -> u32 {
        index.0
    }
}

impl From<u32> for BlockIndex {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for BlockIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One profiled scope or instant event, owning its nested children.
///
/// Name and arguments live in the trace's [`SerializedData`](super::SerializedData);
/// `data` is only meaningful against the arena it was loaded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub index: BlockIndex,
    /// Start timestamp in trace ticks.
    pub begin: u64,
    /// End timestamp in trace ticks.
    pub end: u64,
    pub thread_id: ThreadId,
    pub kind: BlockKind,
    /// Nesting depth (0 = thread root).
    pub depth: u32,
    pub data: DataRef,
    /// Per-name statistics entry in the owning thread, if gathered.
    pub stats: Option<StatsId>,
    /// Nested blocks in temporal order.
    pub children: Vec<Block>,
}

impl Block {
    pub fn duration(&self) -> u64 {
        self.end - self.begin
    }

    pub fn is_event(&self) -> bool {
        self.kind == BlockKind::Event
    }

    /// Whether `[begin, end]` lies entirely within this block.
    pub fn encloses(&self, begin: u64, end: u64) -> bool {
        begin >= self.begin && end <= self.end
    }

    /// Time not covered by direct children.
    pub fn self_duration(&self) -> u64 {
        let covered: u64 = self.children.iter().map(Block::duration).sum();
        self.duration().saturating_sub(covered)
    }

    /// This block and all its descendants, parents before children.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Number of blocks in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        self.walk().count()
    }
}

/// Pre-order iterator over a block subtree.
pub struct Walk<'a> {
    stack: Vec<&'a Block>,
}

impl<'a> Walk<'a> {
    pub(crate) fn over(roots: &'a [Block]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<&'a Block> {
        let block = self.stack.pop()?;
        self.stack.extend(block.children.iter().rev());
        Some(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(index: u32, begin: u64, end: u64) -> Block {
        Block {
            index: BlockIndex::from(index),
            begin,
            end,
            thread_id: 1,
            kind: BlockKind::Block,
            depth: 1,
            data: DataRef::default(),
            stats: None,
            children: Vec::new(),
        }
    }

    #[test]
    fn index_rejects_reserved_value() {
        assert_eq!(BlockIndex::new(0).map(BlockIndex::get), Some(0));
        assert!(BlockIndex::new(BlockIndex::MAX_COUNT - 1).is_some());
        assert!(BlockIndex::new(BlockIndex::MAX_COUNT).is_none());
    }

    #[test]
    fn self_duration_excludes_children() {
        let mut parent = leaf(2, 0, 100);
        parent.children = vec![leaf(0, 10, 30), leaf(1, 40, 60)];
        assert_eq!(parent.duration(), 100);
        assert_eq!(parent.self_duration(), 60);
        assert!(parent.encloses(10, 30));
        assert!(!parent.encloses(90, 110));
    }

    #[test]
    fn walk_is_preorder() {
        let mut inner = leaf(1, 10, 20);
        inner.children = vec![leaf(0, 12, 14)];
        let mut root = leaf(3, 0, 50);
        root.children = vec![inner, leaf(2, 30, 40)];

        let order: Vec<u32> = root.walk().map(|b| b.index.get()).collect();
        assert_eq!(order, vec![3, 1, 0, 2]);
        assert_eq!(root.subtree_len(), 4);
    }
}
