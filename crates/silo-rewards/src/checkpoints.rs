//! Append-ordered stake checkpoint series with point-in-time lookup.
//!
//! A series holds `(epoch, value)` pairs sorted by strictly increasing epoch.
//! Writing to the head epoch updates it in place; a point-in-time query
//! binary-searches for the latest checkpoint at or before the requested
//! epoch in O(log n).

use serde::{Deserialize, Serialize};

use crate::{Result, RewardError};

/// One stake observation effective from `epoch` onward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub epoch: u64,
    pub value: u64,
}

/// A stake history for one key (an account, or the global total).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointSeries {
    points: Vec<Checkpoint>,
}

impl CheckpointSeries {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` effective from `epoch`.
    ///
    /// If `epoch` equals the series head the head is updated in place;
    /// otherwise a new checkpoint is appended.
    ///
    /// # Errors
    ///
    /// - [`RewardError::CheckpointOutOfOrder`] if `epoch` is behind the head
    pub fn record(&mut self, epoch: u64, value: u64) -> Result<()> {
        if let Some(head) = self.points.last_mut() {
            if epoch < head.epoch {
                return Err(RewardError::CheckpointOutOfOrder {
                    epoch,
                    head: head.epoch,
                });
            }
            if epoch == head.epoch {
                head.value = value;
                return Ok(());
            }
        }
        self.points.push(Checkpoint { epoch, value });
        Ok(())
    }

    /// The value as of `epoch`: the latest checkpoint with
    /// `checkpoint.epoch <= epoch`, or zero if none exists.
    pub fn value_at(&self, epoch: u64) -> u64 {
        let idx = self.points.partition_point(|c| c.epoch <= epoch);
        if idx == 0 {
            0
        } else {
            self.points[idx - 1].value
        }
    }

    /// The most recent value, or zero for an empty series.
    pub fn latest(&self) -> u64 {
        self.points.last().map(|c| c.value).unwrap_or(0)
    }

    /// Number of checkpoints stored.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_series_reads_zero() {
        let series = CheckpointSeries::new();
        assert_eq!(series.value_at(0), 0);
        assert_eq!(series.value_at(100), 0);
        assert_eq!(series.latest(), 0);
    }

    #[test]
    fn test_record_and_lookup() {
        let mut series = CheckpointSeries::new();
        series.record(1, 100).expect("record");
        series.record(3, 250).expect("record");
        series.record(7, 0).expect("record");

        assert_eq!(series.value_at(0), 0, "before first checkpoint");
        assert_eq!(series.value_at(1), 100);
        assert_eq!(series.value_at(2), 100, "gap reads previous checkpoint");
        assert_eq!(series.value_at(3), 250);
        assert_eq!(series.value_at(6), 250);
        assert_eq!(series.value_at(7), 0);
        assert_eq!(series.value_at(u64::MAX), 0);
    }

    #[test]
    fn test_same_epoch_updates_in_place() {
        let mut series = CheckpointSeries::new();
        series.record(2, 100).expect("record");
        series.record(2, 175).expect("update");
        assert_eq!(series.len(), 1);
        assert_eq!(series.value_at(2), 175);
    }

    #[test]
    fn test_out_of_order_rejected() {
        let mut series = CheckpointSeries::new();
        series.record(5, 100).expect("record");
        let err = series.record(4, 50).unwrap_err();
        assert!(matches!(
            err,
            RewardError::CheckpointOutOfOrder { epoch: 4, head: 5 }
        ));
    }

    #[test]
    fn test_lookup_is_binary_search_compatible() {
        // A long series still answers correctly at every boundary.
        let mut series = CheckpointSeries::new();
        for i in 0..1_000u64 {
            series.record(i * 2, i).expect("record");
        }
        assert_eq!(series.value_at(0), 0);
        assert_eq!(series.value_at(1), 0);
        assert_eq!(series.value_at(998), 499);
        assert_eq!(series.value_at(999), 499);
        assert_eq!(series.value_at(1_998), 999);
    }
}
