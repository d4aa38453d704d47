//! The common result type and calling interface shared by the chamfer and Euclidean transforms.

use crate::Result;
use crate::array::{BinaryArray, DistanceValue, ScalarArray};
use std::sync::Arc;

/// A distance map together with the largest distance found in it, which callers typically use
/// as a display range.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMap<T> {
    pub map: ScalarArray<T>,
    pub max_distance: T,
}

impl<T: DistanceValue> DistanceMap<T> {
    pub fn new(map: ScalarArray<T>, max_distance: T) -> Self {
        Self { map, max_distance }
    }
}

/// Identifies the pass of a transform that a progress report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Forward,
    Backward,
    Normalize,
    /// A separable pass along the given axis of the Euclidean transform
    Axis(usize),
}

/// A progress report: `line` of `lines` outer scan lines of `pass` have completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanProgress {
    pub pass: Pass,
    pub line: usize,
    pub lines: usize,
}

pub type ProgressFn = Arc<dyn Fn(&ScanProgress) + Send + Sync>;

pub(crate) fn report(progress: &Option<ProgressFn>, pass: Pass, line: usize, lines: usize) {
    if let Some(f) = progress {
        f(&ScanProgress { pass, line, lines });
    }
}

/// The operations exposed by every distance transform.
pub trait DistanceTransform<T: DistanceValue> {
    /// Compute the distance map of a binary array along with the largest distance found in it.
    /// Every `true` (foreground) element receives its distance to the nearest `false`
    /// (background) element, and background elements are zero.
    fn compute_result(&self, mask: &BinaryArray) -> Result<DistanceMap<T>>;

    /// Compute only the distance map of a binary array.
    fn distance_map(&self, mask: &BinaryArray) -> Result<ScalarArray<T>> {
        Ok(self.compute_result(mask)?.map)
    }
}
