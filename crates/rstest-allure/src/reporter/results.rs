//! Collector for finished test records.
//!
//! Every test finished through a [`Reporter`](super::Reporter) is snapshotted
//! here so a runner can hand the records to an external report writer once
//! the run completes.

use std::sync::Mutex;

use crate::model::TestRecord;
use crate::sync::lock;

/// Thread-safe store of test records gathered by one reporter.
#[derive(Debug, Default)]
pub(crate) struct ResultsCollector {
    records: Mutex<Vec<TestRecord>>,
}

impl ResultsCollector {
    /// Append a finished test record.
    pub(crate) fn record(&self, record: TestRecord) {
        lock(&self.records).push(record);
    }

    /// Clone the collected records in finish order.
    pub(crate) fn snapshot(&self) -> Vec<TestRecord> {
        lock(&self.records).clone()
    }

    /// Remove and return the collected records.
    pub(crate) fn drain(&self) -> Vec<TestRecord> {
        std::mem::take(&mut *lock(&self.records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Test;

    #[test]
    fn drain_clears_records() {
        let collector = ResultsCollector::default();
        collector.record(Test::new("first").record());
        collector.record(Test::new("second").record());
        assert_eq!(collector.snapshot().len(), 2);

        let drained = collector.drain();
        let names: Vec<&str> = drained.iter().map(|record| record.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
        assert!(collector.snapshot().is_empty());
    }
}
