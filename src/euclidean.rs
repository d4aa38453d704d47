//! This module contains an exact Euclidean distance transform for 2D and 3D binary arrays,
//! following the separable algorithm of Saito and Toriwaki (1994). Squared distances are built
//! one axis at a time:
//!
//! 1. Along axis 0, two linear scans of every line give the squared distance to the nearest
//!    background element on the same line.
//! 2. Along each following axis, every element takes the minimum over the elements `k` of its
//!    line of `g[k] + (k - y)² s²`, where `g` holds the squared distances of the previous pass
//!    and `s` is the element spacing along the axis. Only elements within `sqrt(g[y]) / s + 1`
//!    of `y` can improve the minimum, which bounds the search.
//!
//! The square root is taken once at the end. Lines within a pass are independent of each
//! other, so they are processed in parallel.

use crate::Result;
use crate::array::{BinaryArray, DistanceValue, ScalarArray, Shape};
use crate::result::{DistanceMap, DistanceTransform, Pass, ProgressFn, ScanProgress, report};
use crate::DistanceMapError;
use log::{debug, warn};
use rayon::prelude::*;
use std::marker::PhantomData;
use std::sync::Arc;

/// Compute the exact Euclidean distance map of a 2D or 3D binary array.
///
/// # Arguments
///
/// * `mask`: a 2D or 3D binary array where `true` marks foreground elements
/// * `spacing`: the physical size of an element along each axis, one entry per axis
///
/// returns: Result<ScalarArray<T>, Box<dyn Error, Global>>
///
/// # Examples
///
/// ```
/// use distmap::array::BinaryArray;
/// use distmap::euclidean::euclidean_distance_map;
///
/// let mask = BinaryArray::from_fn2(5, 5, |x, y| (x, y) != (0, 0));
/// let map = euclidean_distance_map::<f32>(&mask, &[1.0, 1.0]).unwrap();
/// assert_eq!(map.get2(3, 4), 5.0);
/// ```
pub fn euclidean_distance_map<T: DistanceValue>(
    mask: &BinaryArray,
    spacing: &[f64],
) -> Result<ScalarArray<T>> {
    EuclideanDistanceTransform::<T>::new()
        .with_spacing(spacing.to_vec())
        .distance_map(mask)
}

/// Exact Euclidean distance transform of 2D and 3D binary arrays with optional anisotropic
/// element spacing, producing a distance map with elements of type `T`.
///
/// Foreground elements with no background element anywhere in the array receive an infinite
/// distance, which saturates to `T::MAX` for integer element types.
#[derive(Clone)]
pub struct EuclideanDistanceTransform<T = f32> {
    spacing: Option<Vec<f64>>,
    progress: Option<ProgressFn>,
    marker: PhantomData<T>,
}

impl<T: DistanceValue> Default for EuclideanDistanceTransform<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DistanceValue> EuclideanDistanceTransform<T> {
    /// Create a transform with a spacing of 1.0 along every axis.
    pub fn new() -> Self {
        Self {
            spacing: None,
            progress: None,
            marker: PhantomData,
        }
    }

    /// Set the element spacing, one entry per axis. The length is checked against the array
    /// when the transform is computed.
    pub fn with_spacing(mut self, spacing: Vec<f64>) -> Self {
        self.spacing = Some(spacing);
        self
    }

    /// Attach a callback which is invoked after each axis pass.
    pub fn with_progress(mut self, f: impl Fn(&ScanProgress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(f));
        self
    }

    pub fn spacing(&self) -> Option<&[f64]> {
        self.spacing.as_deref()
    }

    fn resolve_spacing(&self, dim: usize) -> Result<Vec<f64>> {
        let spacing = match &self.spacing {
            Some(s) => s.clone(),
            None => vec![1.0; dim],
        };

        if spacing.len() != dim {
            return Err(DistanceMapError::argument(format!(
                "spacing has {} entries but the array has {} dimensions",
                spacing.len(),
                dim
            )));
        }

        if let Some(s) = spacing.iter().find(|s| !s.is_finite() || **s <= 0.0) {
            return Err(DistanceMapError::argument(format!(
                "spacing must be finite and positive, got {}",
                s
            )));
        }

        Ok(spacing)
    }
}

impl<T: DistanceValue> DistanceTransform<T> for EuclideanDistanceTransform<T> {
    fn compute_result(&self, mask: &BinaryArray) -> Result<DistanceMap<T>> {
        let dim = mask.dimensionality();
        if dim != 2 && dim != 3 {
            return Err(DistanceMapError::argument(format!(
                "the Euclidean transform requires a 2D or 3D array, got {}D",
                dim
            )));
        }
        let spacing = self.resolve_spacing(dim)?;

        debug!(
            "Euclidean transform of {:?} with spacing {:?}",
            mask.shape().sizes(),
            spacing
        );
        if !mask.has_background() {
            warn!(
                "mask of shape {:?} has no background elements, distances will be infinite",
                mask.shape().sizes()
            );
        }

        let mut squared = first_axis_pass(mask, spacing[0]);
        report(&self.progress, Pass::Axis(0), 1, dim);

        for (axis, &s) in spacing.iter().enumerate().skip(1) {
            debug!("pass along axis {}", axis);
            envelope_pass(mask.shape(), &mut squared, axis, s);
            report(&self.progress, Pass::Axis(axis), axis + 1, dim);
        }

        let max_squared = squared
            .par_iter()
            .zip(mask.as_slice().par_iter())
            .filter(|(_, fg)| **fg)
            .map(|(v, _)| *v)
            .reduce(|| 0.0, f64::max);

        debug!("square root of {} elements", squared.len());
        let values = squared
            .par_iter()
            .map(|v| T::from_f64_saturating(v.sqrt()))
            .collect::<Vec<_>>();

        let map = ScalarArray::from_vec(mask.shape().clone(), values)?;
        Ok(DistanceMap::new(
            map,
            T::from_f64_saturating(max_squared.sqrt()),
        ))
    }
}

/// Squared distance along axis 0 to the nearest background element on the same line, for every
/// element of the array. Axis 0 lines are contiguous in the flat buffer.
fn first_axis_pass(mask: &BinaryArray, spacing: f64) -> Vec<f64> {
    let size_x = mask.size(0);
    let mut squared = vec![0.0; mask.as_slice().len()];
    if size_x == 0 {
        return squared;
    }

    squared
        .par_chunks_mut(size_x)
        .zip(mask.as_slice().par_chunks(size_x))
        .for_each(|(line, fg)| {
            let mut df = f64::INFINITY;
            for i in 0..size_x {
                df = if fg[i] { df + spacing } else { 0.0 };
                line[i] = df * df;
            }

            let mut db = f64::INFINITY;
            for i in (0..size_x).rev() {
                db = if fg[i] { db + spacing } else { 0.0 };
                let d2 = db * db;
                if d2 < line[i] {
                    line[i] = d2;
                }
            }
        });

    squared
}

/// Replace the squared distances of every line along `axis` with the lower envelope of the
/// previous pass's squared distances along that line. The previous pass is copied once and every
/// element is then rewritten in place from that copy.
fn envelope_pass(shape: &Shape, squared: &mut [f64], axis: usize, spacing: f64) {
    let n = shape.size(axis);
    let stride = shape.stride(axis);
    if n == 0 || stride == 0 {
        return;
    }
    let previous = squared.to_vec();

    squared.par_iter_mut().enumerate().for_each(|(i, v)| {
        let y = (i / stride) % n;
        let start = i - y * stride;
        *v = lower_envelope_at(|k| previous[start + k * stride], n, y, spacing);
    });
}

/// The minimum of `g(k) + (k - y)² s²` over every `k` of a line of length `n`.
fn lower_envelope_at(g: impl Fn(usize) -> f64, n: usize, y: usize, spacing: f64) -> f64 {
    let mut dist = g(y);
    if dist == 0.0 {
        return dist;
    }

    let r_max = if dist.is_finite() {
        (dist.sqrt() / spacing + 1.0).ceil() as usize
    } else {
        n
    };
    let r_start = r_max.min(y);
    let r_end = r_max.min(n - y);
    let s2 = spacing * spacing;

    for k in (y - r_start)..(y + r_end) {
        let d = k as f64 - y as f64;
        let w = g(k) + d * d * s2;
        if w < dist {
            dist = w;
        }
    }

    dist
}
