//! This module contains chamfer distance transforms for 2D and 3D binary arrays. A chamfer
//! transform approximates the Euclidean distance to the nearest background element by
//! propagating weighted path lengths through a small neighborhood mask in two raster scans:
//! a forward scan in increasing raster order which reads the already visited half of the
//! neighborhood, and a backward scan in decreasing order which reads the other half.
//!
//! Distances accumulate in units of the mask weights, in the wide type `T::Wide` of the output
//! element type (`u64` or `f64`). With normalization enabled the result is divided by the
//! weight of a unit orthogonal step, so that it is expressed in elements. Only then is it
//! narrowed to `T`, saturating at `T::MAX`.

mod mask2;
mod mask3;
mod offset;
mod transform2;
mod transform3;
mod weights;

pub use mask2::ChamferMask2D;
pub use mask3::ChamferMask3D;
pub use offset::{NeighborClass, Offset2, Offset3, Vector2I, Vector3I, precedes_in_raster};
pub use transform2::ChamferDistanceTransform2D;
pub use transform3::ChamferDistanceTransform3D;
pub use weights::{ChamferWeights, MaskWeights};

use crate::Result;
use crate::array::{BinaryArray, DistanceValue, ScalarArray};
use crate::result::DistanceTransform;
use log::{debug, warn};
use rayon::prelude::*;

/// Compute the chamfer distance map of a 2D binary array.
///
/// # Arguments
///
/// * `mask`: a 2D binary array where `true` marks foreground elements
/// * `weights`: the chamfer mask to propagate distances with
/// * `normalize`: if true, divide the result by the weight of a unit orthogonal step
///
/// returns: Result<ScalarArray<T>, Box<dyn Error, Global>>
///
/// # Examples
///
/// ```
/// use distmap::array::BinaryArray;
/// use distmap::chamfer::{ChamferMask2D, distance_map_2d};
///
/// let mask = BinaryArray::from_rows(&["11111", "11111", "11011", "11111", "11111"]).unwrap();
/// let map = distance_map_2d::<u16>(&mask, &ChamferMask2D::chessboard(), false).unwrap();
/// assert_eq!(map.get2(0, 0), 2);
/// assert_eq!(map.get2(2, 2), 0);
/// ```
pub fn distance_map_2d<T: DistanceValue>(
    mask: &BinaryArray,
    weights: &ChamferMask2D,
    normalize: bool,
) -> Result<ScalarArray<T>> {
    ChamferDistanceTransform2D::<T>::new(weights.clone(), normalize).distance_map(mask)
}

/// Compute the chamfer distance map of a 3D binary array.
///
/// # Arguments
///
/// * `mask`: a 3D binary array where `true` marks foreground elements
/// * `weights`: the chamfer mask to propagate distances with
/// * `normalize`: if true, divide the result by the weight of a unit orthogonal step
///
/// returns: Result<ScalarArray<T>, Box<dyn Error, Global>>
pub fn distance_map_3d<T: DistanceValue>(
    mask: &BinaryArray,
    weights: &ChamferMask3D,
    normalize: bool,
) -> Result<ScalarArray<T>> {
    ChamferDistanceTransform3D::<T>::new(weights.clone(), normalize).distance_map(mask)
}

/// A neighbor shift converted to signed index arithmetic with its weight in the element type
/// of the output.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Step<T> {
    pub dx: isize,
    pub dy: isize,
    pub dz: isize,
    pub weight: T,
}

pub(crate) fn steps_2d<T: DistanceValue>(offsets: &[Offset2]) -> Vec<Step<T>> {
    offsets
        .iter()
        .map(|o| Step {
            dx: o.dx() as isize,
            dy: o.dy() as isize,
            dz: 0,
            weight: T::from_weight(o.weight, o.int_weight),
        })
        .collect()
}

pub(crate) fn steps_3d<T: DistanceValue>(offsets: &[Offset3]) -> Vec<Step<T>> {
    offsets
        .iter()
        .map(|o| Step {
            dx: o.dx() as isize,
            dy: o.dy() as isize,
            dz: o.dz() as isize,
            weight: T::from_weight(o.weight, o.int_weight),
        })
        .collect()
}

/// Allocate the working array: zero on background elements and `W::far()` on foreground.
pub(crate) fn initialize_distances<W: DistanceValue>(mask: &BinaryArray) -> ScalarArray<W> {
    debug!("initializing {} distances", mask.as_slice().len());
    if !mask.has_background() {
        warn!(
            "mask of shape {:?} has no background elements, distances will saturate",
            mask.shape().sizes()
        );
    }

    let mut distances = ScalarArray::filled(mask.shape().clone(), W::far());
    distances
        .values_mut()
        .par_iter_mut()
        .zip(mask.as_slice().par_iter())
        .for_each(|(v, &fg)| {
            if !fg {
                *v = W::zero();
            }
        });

    distances
}

/// Divide every reached foreground distance by the normalization weight, returning the
/// normalized maximum. Elements still at `W::far()` were never reached and stay there.
pub(crate) fn normalize_distances<W: DistanceValue>(
    mask: &BinaryArray,
    distances: &mut ScalarArray<W>,
    max_distance: W,
    weight: f64,
    int_weight: u32,
) -> W {
    debug!("normalizing by weight {} ({})", weight, int_weight);
    distances
        .values_mut()
        .par_iter_mut()
        .zip(mask.as_slice().par_iter())
        .for_each(|(v, &fg)| {
            if fg && *v < W::far() {
                *v = v.normalized(weight, int_weight);
            }
        });

    if max_distance < W::far() {
        max_distance.normalized(weight, int_weight)
    } else {
        max_distance
    }
}

/// Convert a finished distance into the output element type. Unreached elements map to
/// `T::far()` and reached distances saturate at it.
pub(crate) fn narrow<T: DistanceValue>(value: T::Wide) -> T {
    if value < <T::Wide as DistanceValue>::far() {
        T::from_wide(value)
    } else {
        T::far()
    }
}

/// Convert the accumulated distances of a finished transform into the output element type.
pub(crate) fn narrow_distances<T: DistanceValue>(
    distances: &ScalarArray<T::Wide>,
) -> ScalarArray<T> {
    distances.map(narrow::<T>)
}
