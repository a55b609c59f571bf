//! Rolling transcript quality metrics in fixed-width time buckets.

use crate::defaults;
use std::collections::BTreeMap;

/// Aggregated confidence for one time bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsBucket {
    /// Bucket number: `floor(time / bucket_secs)`.
    pub index: u64,
    /// Start time of the first term recorded in this bucket.
    pub first_time: f64,
    pub confidence_sum: f64,
    pub term_count: usize,
    pub unsure_term_count: usize,
}

impl MetricsBucket {
    pub fn average_confidence(&self) -> f64 {
        if self.term_count == 0 {
            0.0
        } else {
            self.confidence_sum / self.term_count as f64
        }
    }
}

/// Totals over all buckets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSummary {
    pub term_count: usize,
    pub unsure_term_count: usize,
}

impl MetricsSummary {
    /// Share of unsure terms in percent; 0 when no terms were recorded.
    pub fn unsure_percent(&self) -> f64 {
        if self.term_count == 0 {
            0.0
        } else {
            self.unsure_term_count as f64 * 100.0 / self.term_count as f64
        }
    }
}

/// Per-bucket term statistics, ordered by time.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsTable {
    bucket_secs: f64,
    unsure_threshold: f64,
    buckets: BTreeMap<u64, MetricsBucket>,
}

impl Default for MetricsTable {
    fn default() -> Self {
        Self::new(defaults::METRICS_BUCKET_SECS, defaults::UNSURE_THRESHOLD)
    }
}

impl MetricsTable {
    pub fn new(bucket_secs: f64, unsure_threshold: f64) -> Self {
        Self {
            bucket_secs,
            unsure_threshold,
            buckets: BTreeMap::new(),
        }
    }

    /// Records one term that started at `time` seconds.
    pub fn record(&mut self, time: f64, confidence: f64) {
        let index = (time.max(0.0) / self.bucket_secs).floor() as u64;
        let bucket = self.buckets.entry(index).or_insert_with(|| MetricsBucket {
            index,
            first_time: time,
            confidence_sum: 0.0,
            term_count: 0,
            unsure_term_count: 0,
        });
        bucket.confidence_sum += confidence;
        bucket.term_count += 1;
        if confidence < self.unsure_threshold {
            bucket.unsure_term_count += 1;
        }
    }

    pub fn buckets(&self) -> impl Iterator<Item = &MetricsBucket> {
        self.buckets.values()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn summary(&self) -> MetricsSummary {
        self.buckets.values().fold(
            MetricsSummary {
                term_count: 0,
                unsure_term_count: 0,
            },
            |acc, b| MetricsSummary {
                term_count: acc.term_count + b.term_count,
                unsure_term_count: acc.unsure_term_count + b.unsure_term_count,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_by_ten_second_buckets() {
        let mut table = MetricsTable::default();
        table.record(0.5, 0.9);
        table.record(9.9, 0.4);
        table.record(10.0, 1.0);
        table.record(35.0, 0.2);

        let buckets: Vec<_> = table.buckets().collect();
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].index, 0);
        assert_eq!(buckets[0].term_count, 2);
        assert_eq!(buckets[0].unsure_term_count, 1);
        assert!((buckets[0].average_confidence() - 0.65).abs() < 1e-9);
        assert_eq!(buckets[1].index, 1);
        assert_eq!(buckets[1].first_time, 10.0);
        assert_eq!(buckets[2].index, 3);
    }

    #[test]
    fn unsure_is_strictly_below_threshold() {
        let mut table = MetricsTable::default();
        table.record(1.0, 0.5);
        table.record(1.0, 0.49);
        assert_eq!(table.summary().unsure_term_count, 1);
    }

    #[test]
    fn summary_percent() {
        let mut table = MetricsTable::default();
        for i in 0..4 {
            table.record(i as f64 * 7.0, if i == 0 { 0.1 } else { 0.95 });
        }
        let summary = table.summary();
        assert_eq!(summary.term_count, 4);
        assert_eq!(summary.unsure_term_count, 1);
        assert_eq!(summary.unsure_percent(), 25.0);
    }

    #[test]
    fn empty_summary_is_zero_percent() {
        let table = MetricsTable::default();
        assert!(table.is_empty());
        assert_eq!(table.summary().unsure_percent(), 0.0);
    }
}
