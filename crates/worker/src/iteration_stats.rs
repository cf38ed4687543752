use std::collections::BTreeMap;
use std::time::Duration;

/// 迭代统计，仅由生命周期引擎持有
///
/// `count` 达到上限后连同耗时记录一起清零。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IterationStats {
    count: u32,
    timings: BTreeMap<u32, Duration>,
}

impl IterationStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 开始新一轮迭代，返回其序号（从1开始）
    pub fn begin(&mut self) -> u32 {
        self.count += 1;
        self.count
    }

    pub fn record(&mut self, iteration: u32, elapsed: Duration) {
        self.timings.insert(iteration, elapsed);
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn timings(&self) -> &BTreeMap<u32, Duration> {
        &self.timings
    }

    pub fn recorded(&self) -> usize {
        self.timings.len()
    }

    pub fn total(&self) -> Duration {
        self.timings.values().sum()
    }

    pub fn is_exhausted(&self, max_iteration_count: u32) -> bool {
        self.count >= max_iteration_count
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.timings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_and_record() {
        let mut stats = IterationStats::new();
        let first = stats.begin();
        stats.record(first, Duration::from_millis(10));
        let second = stats.begin();
        stats.record(second, Duration::from_millis(15));

        assert_eq!((first, second), (1, 2));
        assert_eq!(stats.count(), 2);
        assert_eq!(stats.recorded(), 2);
        assert_eq!(stats.total(), Duration::from_millis(25));
        assert_eq!(stats.timings().keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_exhaustion_and_reset() {
        let mut stats = IterationStats::new();
        stats.begin();
        assert!(!stats.is_exhausted(2));
        stats.begin();
        assert!(stats.is_exhausted(2));

        stats.reset();
        assert_eq!(stats.count(), 0);
        assert!(stats.timings().is_empty());
        assert_eq!(stats.begin(), 1);
    }
}
