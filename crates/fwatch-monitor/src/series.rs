//! Append-only follower time series with its trend anchor.

use chrono::{DateTime, Local};
use fwatch_common::{follower_delta, Sample};

/// Ordered samples of one monitoring session.
///
/// The anchor is the first sample recorded as non-bootstrap. It is set once
/// and never moves, and since the bootstrap sample always comes first it
/// sits at index 1 or later.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Series {
    samples: Vec<Sample>,
    anchor: Option<usize>,
}

impl Series {
    /// Creates an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample and returns its delta against the previous one.
    ///
    /// The first non-bootstrap sample becomes the anchor. Timestamps older
    /// than the last sample are clamped so the series stays ordered.
    pub fn push(&mut self, mut sample: Sample, is_bootstrap: bool) -> i64 {
        let delta = match self.samples.last() {
            Some(previous) => {
                if sample.timestamp < previous.timestamp {
                    sample.timestamp = previous.timestamp;
                }
                follower_delta(sample.followers, previous.followers)
            }
            None => 0,
        };

        self.samples.push(sample);
        if !is_bootstrap && self.anchor.is_none() {
            self.anchor = Some(self.samples.len() - 1);
        }
        delta
    }

    /// All samples in chronological order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// `(timestamp, followers)` pairs in chronological order, for exporters.
    pub fn points(&self) -> impl Iterator<Item = (DateTime<Local>, u64)> + '_ {
        self.samples.iter().map(|s| (s.timestamp, s.followers))
    }

    /// Delta of each sample against its predecessor; the first is always 0.
    pub fn deltas(&self) -> Vec<i64> {
        std::iter::once(0)
            .chain(
                self.samples
                    .windows(2)
                    .map(|pair| follower_delta(pair[1].followers, pair[0].followers)),
            )
            .take(self.samples.len())
            .collect()
    }

    /// The anchor sample, if one has been recorded.
    pub fn anchor(&self) -> Option<&Sample> {
        self.anchor.and_then(|index| self.samples.get(index))
    }

    /// Position of the anchor sample.
    pub fn anchor_index(&self) -> Option<usize> {
        self.anchor
    }

    /// Most recent sample.
    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no sample was recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn at(offset_secs: i64) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::seconds(offset_secs)
    }

    #[test]
    fn test_first_delta_is_zero() {
        let mut series = Series::new();
        assert_eq!(series.push(Sample::new(at(0), 1000), true), 0);
        assert_eq!(series.push(Sample::new(at(60), 1003), false), 3);
        assert_eq!(series.push(Sample::new(at(120), 998), false), -5);
        assert_eq!(series.deltas(), vec![0, 3, -5]);
    }

    #[test]
    fn test_anchor_is_first_non_bootstrap() {
        let mut series = Series::new();
        series.push(Sample::new(at(0), 1000), true);
        assert!(series.anchor().is_none());

        series.push(Sample::new(at(60), 1001), false);
        series.push(Sample::new(at(120), 1002), false);

        assert_eq!(series.anchor_index(), Some(1));
        assert_eq!(series.anchor().unwrap().followers, 1001);
    }

    #[test]
    fn test_out_of_order_timestamp_is_clamped() {
        let mut series = Series::new();
        series.push(Sample::new(at(60), 10), true);
        series.push(Sample::new(at(0), 11), false);
        assert_eq!(series.samples()[1].timestamp, at(60));
    }

    #[test]
    fn test_points_follow_insertion_order() {
        let mut series = Series::new();
        series.push(Sample::new(at(0), 5), true);
        series.push(Sample::new(at(40), 6), false);
        let points: Vec<_> = series.points().collect();
        assert_eq!(points, vec![(at(0), 5), (at(40), 6)]);
    }

    #[test]
    fn test_empty_series() {
        let series = Series::new();
        assert!(series.is_empty());
        assert!(series.last().is_none());
        assert!(series.deltas().is_empty());
    }

    proptest! {
        #[test]
        fn prop_series_invariants(
            counts in prop::collection::vec(0u64..10_000_000, 1..64),
            gaps in prop::collection::vec(0i64..3_600, 64),
        ) {
            let mut series = Series::new();
            let mut offset = 0;
            let mut deltas = Vec::new();
            for (i, followers) in counts.iter().enumerate() {
                offset += gaps[i];
                deltas.push(series.push(Sample::new(at(offset), *followers), i == 0));
            }

            prop_assert_eq!(series.len(), counts.len());
            prop_assert_eq!(deltas[0], 0);
            for i in 1..counts.len() {
                prop_assert_eq!(deltas[i], counts[i] as i64 - counts[i - 1] as i64);
            }
            prop_assert_eq!(&series.deltas(), &deltas);
            prop_assert!(series.samples().windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

            if counts.len() >= 2 {
                prop_assert_eq!(series.anchor_index(), Some(1));
            } else {
                prop_assert!(series.anchor().is_none());
            }
        }
    }
}
