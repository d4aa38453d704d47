use crate::Result;
use crate::array::{BinaryArray, DistanceValue, ScalarArray};
use crate::chamfer::{
    ChamferMask3D, Step, initialize_distances, narrow, narrow_distances, normalize_distances,
    steps_3d,
};
use crate::result::{DistanceMap, DistanceTransform, Pass, ProgressFn, ScanProgress, report};
use log::debug;
use num_traits::Zero;
use std::marker::PhantomData;
use std::sync::Arc;

/// Chamfer distance transform of 3D binary arrays. This follows the same sequence as
/// `ChamferDistanceTransform2D`, with raster order z outer, y middle, x inner, and progress
/// reported once per z plane.
#[derive(Clone)]
pub struct ChamferDistanceTransform3D<T = u16> {
    mask: ChamferMask3D,
    normalize: bool,
    progress: Option<ProgressFn>,
    marker: PhantomData<T>,
}

impl<T: DistanceValue> ChamferDistanceTransform3D<T> {
    /// Create a new transform.
    ///
    /// # Arguments
    ///
    /// * `mask`: the 3D chamfer mask whose offsets and weights are propagated
    /// * `normalize`: if true, the accumulated distances are divided by the mask's normalization
    ///   weight (round-divided for integer element types)
    ///
    /// returns: ChamferDistanceTransform3D<T>
    pub fn new(mask: ChamferMask3D, normalize: bool) -> Self {
        Self {
            mask,
            normalize,
            progress: None,
            marker: PhantomData,
        }
    }

    /// Attach a callback which is invoked after each z plane of each scan.
    pub fn with_progress(mut self, f: impl Fn(&ScanProgress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(f));
        self
    }

    pub fn mask(&self) -> &ChamferMask3D {
        &self.mask
    }

    pub fn normalize(&self) -> bool {
        self.normalize
    }

    fn forward_scan(&self, mask: &BinaryArray, distances: &mut ScalarArray<T::Wide>) {
        let steps = steps_3d::<T::Wide>(self.mask.forward_offsets());
        let size_z = mask.size(2);

        for z in 0..size_z {
            for y in 0..mask.size(1) {
                for x in 0..mask.size(0) {
                    if !mask.get3(x, y, z) {
                        continue;
                    }

                    let current = distances.get3(x, y, z);
                    let value = propagate(distances, [x, y, z], &steps, current);
                    if value < current {
                        distances.set3(x, y, z, value);
                    }
                }
            }
            report(&self.progress, Pass::Forward, z + 1, size_z);
        }
    }

    fn backward_scan(
        &self,
        mask: &BinaryArray,
        distances: &mut ScalarArray<T::Wide>,
    ) -> T::Wide {
        let steps = steps_3d::<T::Wide>(self.mask.backward_offsets());
        let size_z = mask.size(2);
        let mut max_distance = <T::Wide as Zero>::zero();

        for (done, z) in (0..size_z).rev().enumerate() {
            for y in (0..mask.size(1)).rev() {
                for x in (0..mask.size(0)).rev() {
                    if !mask.get3(x, y, z) {
                        continue;
                    }

                    let current = distances.get3(x, y, z);
                    let value = propagate(distances, [x, y, z], &steps, current);
                    if value < current {
                        distances.set3(x, y, z, value);
                    }
                    if value > max_distance {
                        max_distance = value;
                    }
                }
            }
            report(&self.progress, Pass::Backward, done + 1, size_z);
        }

        max_distance
    }
}

impl<T: DistanceValue> DistanceTransform<T> for ChamferDistanceTransform3D<T> {
    fn compute_result(&self, mask: &BinaryArray) -> Result<DistanceMap<T>> {
        mask.shape().require_dimensionality(3)?;
        debug!(
            "3D chamfer transform of {:?} with weights {:?}",
            mask.shape().sizes(),
            self.mask.weights()
        );

        let mut distances = initialize_distances::<T::Wide>(mask);

        debug!("forward scan");
        self.forward_scan(mask, &mut distances);

        debug!("backward scan");
        let mut max_distance = self.backward_scan(mask, &mut distances);

        if self.normalize {
            max_distance = normalize_distances(
                mask,
                &mut distances,
                max_distance,
                self.mask.normalization_weight(),
                self.mask.int_normalization_weight(),
            );
            report(&self.progress, Pass::Normalize, 1, 1);
        }

        Ok(DistanceMap::new(
            narrow_distances::<T>(&distances),
            narrow::<T>(max_distance),
        ))
    }
}

fn propagate<T: DistanceValue>(
    distances: &ScalarArray<T>,
    p: [usize; 3],
    steps: &[Step<T>],
    mut value: T,
) -> T {
    let sx = distances.size(0) as isize;
    let sy = distances.size(1) as isize;
    let sz = distances.size(2) as isize;

    for s in steps {
        let nx = p[0] as isize + s.dx;
        let ny = p[1] as isize + s.dy;
        let nz = p[2] as isize + s.dz;
        if nx < 0 || ny < 0 || nz < 0 || nx >= sx || ny >= sy || nz >= sz {
            continue;
        }

        let candidate = distances
            .get3(nx as usize, ny as usize, nz as usize)
            .add_weight(s.weight);
        if candidate < value {
            value = candidate;
        }
    }

    value
}
