use std::collections::HashMap;

use super::block::BlockIndex;
use super::serialized::DataRef;

/// Index into a thread's statistics table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatsId(u32);

impl StatsId {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Aggregated timings of every block sharing a name within one thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStatistics {
    /// Payload of the first block seen with this name.
    pub name: DataRef,
    pub calls: u32,
    /// Sum of durations, in ticks.
    pub total_duration: u64,
    pub min_duration: u64,
    pub max_duration: u64,
    pub min_block: BlockIndex,
    pub max_block: BlockIndex,
}

impl BlockStatistics {
    fn first(name: DataRef, index: BlockIndex, duration: u64) -> Self {
        Self {
            name,
            calls: 1,
            total_duration: duration,
            min_duration: duration,
            max_duration: duration,
            min_block: index,
            max_block: index,
        }
    }

    fn add(&mut self, index: BlockIndex, duration: u64) {
        self.calls = self.calls.saturating_add(1);
        self.total_duration = self.total_duration.saturating_add(duration);
        if duration < self.min_duration {
            self.min_duration = duration;
            self.min_block = index;
        }
        if duration > self.max_duration {
            self.max_duration = duration;
            self.max_block = index;
        }
    }

    pub fn average_duration(&self) -> u64 {
        match self.calls {
            0 => 0,
            calls => self.total_duration / u64::from(calls),
        }
    }
}

/// Builds one thread's statistics table while its blocks are being loaded.
#[derive(Debug, Default)]
pub(crate) struct StatisticsCollector {
    by_name: HashMap<String, StatsId>,
    entries: Vec<BlockStatistics>,
}

impl StatisticsCollector {
    pub(crate) fn record(
        &mut self,
        name: &str,
        data: DataRef,
        index: BlockIndex,
        duration: u64,
    ) -> StatsId {
        if let Some(&id) = self.by_name.get(name) {
            self.entries[id.as_usize()].add(index, duration);
            return id;
        }

        // Fewer distinct names than blocks, and block indices fit a u32.
        let id = StatsId(self.entries.len() as u32);
        self.entries
            .push(BlockStatistics::first(data, index, duration));
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub(crate) fn finish(self) -> Vec<BlockStatistics> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregates_by_name() {
        let mut collector = StatisticsCollector::default();
        let a = collector.record("update", DataRef::default(), BlockIndex::from(0), 40);
        let b = collector.record("render", DataRef::default(), BlockIndex::from(1), 10);
        let c = collector.record("update", DataRef::default(), BlockIndex::from(2), 20);
        let d = collector.record("update", DataRef::default(), BlockIndex::from(3), 90);

        assert_eq!(a, c);
        assert_eq!(a, d);
        assert_ne!(a, b);

        let stats = collector.finish();
        assert_eq!(stats.len(), 2);

        let update = &stats[a.as_usize()];
        assert_eq!(update.calls, 3);
        assert_eq!(update.total_duration, 150);
        assert_eq!(update.min_duration, 20);
        assert_eq!(update.min_block, BlockIndex::from(2));
        assert_eq!(update.max_duration, 90);
        assert_eq!(update.max_block, BlockIndex::from(3));
        assert_eq!(update.average_duration(), 50);
    }
}
