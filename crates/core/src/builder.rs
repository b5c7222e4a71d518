use std::collections::BTreeMap;

use proflog_format::{BlockKind, RawRecord, TraceHeader};

use crate::loader::{LoadError, LoadedTrace};
use crate::model::statistics::StatisticsCollector;
use crate::model::{Block, BlockIndex, SerializedData, ThreadBlocksTree, ThreadId, ThreadTree};

/// Reassembles per-thread block trees from records in completion order.
///
/// Each record becomes a root of its thread; any roots it encloses that were
/// pushed before it are moved underneath it. Instant events never adopt
/// children. Records are numbered in the order they are pushed.
pub(crate) struct TreeBuilder {
    header: TraceHeader,
    data: SerializedData,
    threads: BTreeMap<ThreadId, ThreadState>,
    next_index: usize,
    gather_statistics: bool,
}

#[derive(Default)]
struct ThreadState {
    roots: Vec<Block>,
    block_count: usize,
    statistics: StatisticsCollector,
}

impl TreeBuilder {
    pub(crate) fn new(header: TraceHeader, gather_statistics: bool, capacity: usize) -> Self {
        Self {
            header,
            data: SerializedData::with_capacity(capacity),
            threads: BTreeMap::new(),
            next_index: 0,
            gather_statistics,
        }
    }

    pub(crate) fn push(&mut self, record: &RawRecord<'_>) -> Result<BlockIndex, LoadError> {
        let index = BlockIndex::new(self.next_index).ok_or(LoadError::TooManyBlocks)?;
        let data = self
            .data
            .push(record.payload)
            .ok_or(LoadError::ArenaOverflow)?;

        let state = self.threads.entry(record.thread_id).or_default();
        let stats = self.gather_statistics.then(|| {
            state
                .statistics
                .record(record.name, data, index, record.duration())
        });

        let split = if record.kind == BlockKind::Event {
            state.roots.len()
        } else {
            state
                .roots
                .iter()
                .rposition(|root| !(root.begin >= record.begin && root.end <= record.end))
                .map_or(0, |pos| pos + 1)
        };
        let children = state.roots.split_off(split);

        state.roots.push(Block {
            index,
            begin: record.begin,
            end: record.end,
            thread_id: record.thread_id,
            kind: record.kind,
            depth: 0,
            data,
            stats,
            children,
        });
        state.block_count += 1;
        self.next_index += 1;
        Ok(index)
    }

    pub(crate) fn finish(self) -> LoadedTrace {
        let mut tree = ThreadBlocksTree::new();
        for (thread_id, mut state) in self.threads {
            let depth = assign_depths(&mut state.roots);
            tree.insert(ThreadTree {
                thread_id,
                roots: state.roots,
                block_count: state.block_count,
                depth,
                statistics: state.statistics.finish(),
            });
        }
        LoadedTrace::new(self.header, self.data, tree, self.next_index)
    }
}

/// Set every block's depth, returning the deepest level found.
fn assign_depths(roots: &mut [Block]) -> u32 {
    let mut deepest = 0;
    let mut stack: Vec<(&mut Block, u32)> = roots.iter_mut().map(|b| (b, 0)).collect();
    while let Some((block, depth)) = stack.pop() {
        block.depth = depth;
        deepest = deepest.max(depth);
        stack.extend(block.children.iter_mut().map(|c| (c, depth + 1)));
    }
    deepest
}
