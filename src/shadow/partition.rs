//! Cascade Partitioning
//!
//! Splits the camera's depth range into contiguous cascade intervals.
//!
//! Splits are cumulative values in `(0, partition_max]`: with the default
//! maximum of `100`, a split of `15` means "this cascade ends 15% of the way
//! through the camera's `far - near` range". Intervals are expressed in camera
//! view-space depth starting at the eye, so cascade 0 always begins at `0`.

use smallvec::SmallVec;

use crate::errors::{Result, UmbraError};

/// Maximum cascade count per directional light.
pub const MAX_CASCADES: usize = 8;

/// One cascade's depth slice in camera view space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CascadeInterval {
    pub begin: f32,
    pub end: f32,
}

impl CascadeInterval {
    #[must_use]
    pub fn length(&self) -> f32 {
        self.end - self.begin
    }

    #[must_use]
    pub fn contains(&self, depth: f32) -> bool {
        depth >= self.begin && depth <= self.end
    }
}

/// Validated, strictly ascending cascade splits.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadePartition {
    splits: SmallVec<[f32; 4]>,
    partition_max: f32,
}

impl CascadePartition {
    /// Validates `splits` against `partition_max`.
    ///
    /// Rejects an empty or oversized list, non-finite or non-positive values,
    /// values above `partition_max`, and any split that does not strictly
    /// exceed its predecessor.
    pub fn new(splits: &[f32], partition_max: f32) -> Result<Self> {
        if !partition_max.is_finite() || partition_max <= 0.0 {
            return Err(UmbraError::InvalidPartitionMax(partition_max));
        }
        if splits.is_empty() || splits.len() > MAX_CASCADES {
            return Err(UmbraError::InvalidCascadeCount {
                count: splits.len(),
                max: MAX_CASCADES,
            });
        }

        for (index, &value) in splits.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 || value > partition_max {
                return Err(UmbraError::SplitOutOfRange {
                    index,
                    value,
                    max: partition_max,
                });
            }
            if index > 0 && value <= splits[index - 1] {
                return Err(UmbraError::NonAscendingSplits {
                    index,
                    previous: splits[index - 1],
                    current: value,
                });
            }
        }

        Ok(Self {
            splits: SmallVec::from_slice(splits),
            partition_max,
        })
    }

    /// Evenly spaced splits ending at the far clip.
    pub fn uniform(cascade_count: usize) -> Result<Self> {
        let n = cascade_count.clamp(1, MAX_CASCADES) as f32;
        let splits: SmallVec<[f32; 4]> = (1..=cascade_count)
            .map(|i| i as f32 / n * 100.0)
            .collect();
        Self::new(&splits, 100.0)
    }

    /// Splits from the Practical Split Scheme.
    ///
    /// `lambda` blends between uniform (`0.0`) and logarithmic (`1.0`)
    /// distribution of the split distances over `[near, far]`. The resulting
    /// distances are converted to percentages of `far - near`, the last one
    /// landing exactly on the far clip.
    pub fn practical(cascade_count: usize, near: f32, far: f32, lambda: f32) -> Result<Self> {
        if cascade_count == 0 || cascade_count > MAX_CASCADES {
            return Err(UmbraError::InvalidCascadeCount {
                count: cascade_count,
                max: MAX_CASCADES,
            });
        }

        let near = near.max(f32::EPSILON);
        let range = (far - near).max(f32::EPSILON);
        let lambda = lambda.clamp(0.0, 1.0);
        let n = cascade_count as f32;

        let mut splits: SmallVec<[f32; 4]> = (1..=cascade_count)
            .map(|i| {
                let p = i as f32 / n;
                let log_split = near * (far / near).powf(p);
                let uni_split = near + range * p;
                let distance = lambda * log_split + (1.0 - lambda) * uni_split;
                (distance - near) / range * 100.0
            })
            .collect();

        // Ensure the last split reaches the far plane
        if let Some(last) = splits.last_mut() {
            *last = 100.0;
        }

        Self::new(&splits, 100.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.splits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    #[must_use]
    pub fn splits(&self) -> &[f32] {
        &self.splits
    }

    #[must_use]
    pub fn partition_max(&self) -> f32 {
        self.partition_max
    }

    /// Cumulative fraction of the depth range covered through cascade `index`.
    #[must_use]
    pub fn fraction(&self, index: usize) -> Option<f32> {
        self.splits.get(index).map(|s| s / self.partition_max)
    }

    /// Cascade intervals for a camera with the given clip planes.
    ///
    /// Interval `i` begins where `i - 1` ends (`0` for the first) and ends at
    /// `(far - near) * split[i] / partition_max`.
    #[must_use]
    pub fn intervals(&self, near_clip: f32, far_clip: f32) -> SmallVec<[CascadeInterval; 4]> {
        let range = far_clip - near_clip;
        let mut begin = 0.0;

        self.splits
            .iter()
            .map(|split| {
                let end = range * (split / self.partition_max);
                let interval = CascadeInterval { begin, end };
                begin = end;
                interval
            })
            .collect()
    }
}
