use crate::Result;
use crate::array::{BinaryArray, DistanceValue, ScalarArray};
use crate::chamfer::{
    ChamferMask2D, Step, initialize_distances, narrow, narrow_distances, normalize_distances,
    steps_2d,
};
use crate::result::{DistanceMap, DistanceTransform, Pass, ProgressFn, ScanProgress, report};
use log::debug;
use num_traits::Zero;
use std::marker::PhantomData;
use std::sync::Arc;

/// Chamfer distance transform of 2D binary arrays, producing a distance map with elements of
/// type `T`. Integer element types propagate the integer weights of the mask, floating point
/// element types propagate the floating point weights.
///
/// The transform runs strictly sequentially: initialization, a forward scan in increasing raster
/// order (y outer, x inner), a backward scan in decreasing order, and an optional normalization.
/// Within a scan each element is updated in place, so later elements see values written earlier
/// in the same scan. Neighbors which fall outside of the array are skipped; the border is not
/// treated as background.
#[derive(Clone)]
pub struct ChamferDistanceTransform2D<T = u16> {
    mask: ChamferMask2D,
    normalize: bool,
    progress: Option<ProgressFn>,
    marker: PhantomData<T>,
}

impl<T: DistanceValue> ChamferDistanceTransform2D<T> {
    /// Create a new transform.
    ///
    /// # Arguments
    ///
    /// * `mask`: the chamfer mask whose offsets and weights are propagated
    /// * `normalize`: if true, the accumulated distances are divided by the mask's normalization
    ///   weight (round-divided for integer element types)
    ///
    /// returns: ChamferDistanceTransform2D<T>
    pub fn new(mask: ChamferMask2D, normalize: bool) -> Self {
        Self {
            mask,
            normalize,
            progress: None,
            marker: PhantomData,
        }
    }

    /// Attach a callback which is invoked after each row of each scan.
    pub fn with_progress(mut self, f: impl Fn(&ScanProgress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(f));
        self
    }

    pub fn mask(&self) -> &ChamferMask2D {
        &self.mask
    }

    pub fn normalize(&self) -> bool {
        self.normalize
    }

    fn forward_scan(&self, mask: &BinaryArray, distances: &mut ScalarArray<T::Wide>) {
        let steps = steps_2d::<T::Wide>(self.mask.forward_offsets());
        let size_y = mask.size(1);

        for y in 0..size_y {
            for x in 0..mask.size(0) {
                if !mask.get2(x, y) {
                    continue;
                }

                let current = distances.get2(x, y);
                let value = propagate(distances, x, y, &steps, current);
                if value < current {
                    distances.set2(x, y, value);
                }
            }
            report(&self.progress, Pass::Forward, y + 1, size_y);
        }
    }

    /// The backward scan, which also returns the largest distance in the finished map.
    fn backward_scan(
        &self,
        mask: &BinaryArray,
        distances: &mut ScalarArray<T::Wide>,
    ) -> T::Wide {
        let steps = steps_2d::<T::Wide>(self.mask.backward_offsets());
        let size_y = mask.size(1);
        let mut max_distance = <T::Wide as Zero>::zero();

        for (done, y) in (0..size_y).rev().enumerate() {
            for x in (0..mask.size(0)).rev() {
                if !mask.get2(x, y) {
                    continue;
                }

                let current = distances.get2(x, y);
                let value = propagate(distances, x, y, &steps, current);
                if value < current {
                    distances.set2(x, y, value);
                }
                if value > max_distance {
                    max_distance = value;
                }
            }
            report(&self.progress, Pass::Backward, done + 1, size_y);
        }

        max_distance
    }
}

impl<T: DistanceValue> DistanceTransform<T> for ChamferDistanceTransform2D<T> {
    fn compute_result(&self, mask: &BinaryArray) -> Result<DistanceMap<T>> {
        mask.shape().require_dimensionality(2)?;
        debug!(
            "2D chamfer transform of {:?} with weights {:?}",
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

/// The smallest of `value` and every in-bounds neighbor distance plus its step weight.
fn propagate<T: DistanceValue>(
    distances: &ScalarArray<T>,
    x: usize,
    y: usize,
    steps: &[Step<T>],
    mut value: T,
) -> T {
    let size_x = distances.size(0) as isize;
    let size_y = distances.size(1) as isize;

    for s in steps {
        let nx = x as isize + s.dx;
        let ny = y as isize + s.dy;
        if nx < 0 || ny < 0 || nx >= size_x || ny >= size_y {
            continue;
        }

        let candidate = distances.get2(nx as usize, ny as usize).add_weight(s.weight);
        if candidate < value {
            value = candidate;
        }
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chamfer::ChamferWeights;
    use crate::is_invalid_argument;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::Mutex;
    use test_case::test_case;

    fn single_background(size: usize, bx: usize, by: usize) -> BinaryArray {
        BinaryArray::from_fn2(size, size, |x, y| !(x == bx && y == by))
    }

    fn random_mask(rng: &mut StdRng, sx: usize, sy: usize, p: f64) -> BinaryArray {
        let mut mask = BinaryArray::empty2(sx, sy);
        for y in 0..sy {
            for x in 0..sx {
                mask.set2(x, y, rng.random_bool(p));
            }
        }
        // Make sure there is at least one background element
        mask.set2(sx / 2, sy / 2, false);
        mask
    }

    #[test]
    fn chessboard_single_point() {
        let mask = single_background(5, 2, 2);
        let dt = ChamferDistanceTransform2D::<u16>::new(ChamferMask2D::chessboard(), false);
        let map = dt.distance_map(&mask).unwrap();

        for y in 0..5 {
            for x in 0..5 {
                let expected = (x as i32 - 2).abs().max((y as i32 - 2).abs()) as u16;
                assert_eq!(map.get2(x, y), expected);
            }
        }
    }

    #[test]
    fn city_block_single_point() {
        let mask = single_background(7, 1, 5);
        let dt = ChamferDistanceTransform2D::<u8>::new(ChamferMask2D::city_block(), false);
        let result = dt.compute_result(&mask).unwrap();

        for y in 0..7 {
            for x in 0..7 {
                let expected = ((x as i32 - 1).abs() + (y as i32 - 5).abs()) as u8;
                assert_eq!(result.map.get2(x, y), expected);
            }
        }
        assert_eq!(result.max_distance, 5 + 5);
    }

    #[test]
    fn borgefors_raw_values() {
        let mask = single_background(5, 0, 0);
        let dt = ChamferDistanceTransform2D::<u16>::new(ChamferMask2D::borgefors(), false);
        let map = dt.distance_map(&mask).unwrap();

        assert_eq!(map.get2(1, 0), 3);
        assert_eq!(map.get2(1, 1), 4);
        assert_eq!(map.get2(2, 1), 7);
        assert_eq!(map.get2(4, 4), 16);
        assert_eq!(map.get2(4, 0), 12);
    }

    #[test]
    fn chess_knight_uses_knight_moves() {
        let mask = single_background(5, 0, 0);
        let dt = ChamferDistanceTransform2D::<u16>::new(ChamferMask2D::chess_knight(), false);
        let map = dt.distance_map(&mask).unwrap();

        assert_eq!(map.get2(2, 1), 11);
        assert_eq!(map.get2(1, 2), 11);
        assert_eq!(map.get2(2, 2), 14);
    }

    #[test_case(ChamferWeights::Chessboard)]
    #[test_case(ChamferWeights::CityBlock)]
    #[test_case(ChamferWeights::QuasiEuclidean)]
    #[test_case(ChamferWeights::Borgefors)]
    #[test_case(ChamferWeights::Weights57)]
    #[test_case(ChamferWeights::ChessKnight)]
    fn background_stays_zero(weights: ChamferWeights) {
        let mut rng = StdRng::seed_from_u64(11);
        let mask = random_mask(&mut rng, 23, 17, 0.8);
        for normalize in [false, true] {
            let dt = ChamferDistanceTransform2D::<u16>::new(weights.mask_2d().unwrap(), normalize);
            let map = dt.distance_map(&mask).unwrap();
            let fmap = ChamferDistanceTransform2D::<f32>::new(weights.mask_2d().unwrap(), normalize)
                .distance_map(&mask)
                .unwrap();
            for p in mask.shape().iter_positions() {
                if !mask.get(&p) {
                    assert_eq!(map.get(&p), 0);
                    assert_eq!(fmap.get(&p), 0.0);
                } else {
                    assert!(map.get(&p) > 0);
                    assert!(fmap.get(&p) > 0.0);
                }
            }
        }
    }

    #[test_case(ChamferWeights::Chessboard)]
    #[test_case(ChamferWeights::CityBlock)]
    #[test_case(ChamferWeights::QuasiEuclidean)]
    #[test_case(ChamferWeights::Borgefors)]
    #[test_case(ChamferWeights::ChessKnight)]
    fn locally_optimal_after_two_passes(weights: ChamferWeights) {
        let mut rng = StdRng::seed_from_u64(3);
        let mask = random_mask(&mut rng, 31, 19, 0.9);
        let cm = weights.mask_2d().unwrap();
        let map = ChamferDistanceTransform2D::<u32>::new(cm.clone(), false)
            .distance_map(&mask)
            .unwrap();

        for p in mask.iter_true() {
            let d = map.get(&p);
            for o in cm.offsets() {
                let q = [p[0] as i64 + o.dx() as i64, p[1] as i64 + o.dy() as i64];
                if !mask.shape().contains(&q) {
                    continue;
                }
                let dq = map.get2(q[0] as usize, q[1] as usize);
                assert!(d <= dq + o.int_weight, "{:?} -> {:?}", p, q);
            }
        }
    }

    #[test]
    fn normalization_divides_raw_distances() {
        let mut rng = StdRng::seed_from_u64(5);
        let mask = random_mask(&mut rng, 20, 20, 0.85);
        let cm = ChamferMask2D::borgefors();

        let raw = ChamferDistanceTransform2D::<u16>::new(cm.clone(), false)
            .distance_map(&mask)
            .unwrap();
        let norm = ChamferDistanceTransform2D::<u16>::new(cm.clone(), true)
            .distance_map(&mask)
            .unwrap();
        let raw_f = ChamferDistanceTransform2D::<f64>::new(cm.clone(), false)
            .distance_map(&mask)
            .unwrap();
        let norm_f = ChamferDistanceTransform2D::<f64>::new(cm, true)
            .distance_map(&mask)
            .unwrap();

        for p in mask.iter_true() {
            assert_eq!(norm.get(&p), (raw.get(&p) + 1) / 3);
            assert_relative_eq!(norm_f.get(&p), raw_f.get(&p) / 3.0);
        }
    }

    #[test]
    fn quasi_euclidean_float_and_integer() {
        let mask = single_background(6, 0, 0);
        let cm = ChamferMask2D::quasi_euclidean();

        let fmap = ChamferDistanceTransform2D::<f32>::new(cm.clone(), true)
            .distance_map(&mask)
            .unwrap();
        assert_relative_eq!(fmap.get2(3, 3), 3.0 * 2.0f32.sqrt(), epsilon = 1e-5);
        assert_relative_eq!(fmap.get2(5, 2), 3.0 + 2.0 * 2.0f32.sqrt(), epsilon = 1e-5);

        let imap = ChamferDistanceTransform2D::<u16>::new(cm, false)
            .distance_map(&mask)
            .unwrap();
        assert_eq!(imap.get2(3, 3), 42);
        assert_eq!(imap.get2(5, 2), 58);
    }

    #[test]
    fn border_is_not_background() {
        // A single background element in a corner: the far corner is reached only through
        // the interior, never from outside the array
        let mask = BinaryArray::from_rows(&["0111", "1111"]).unwrap();
        let map = ChamferDistanceTransform2D::<u16>::new(ChamferMask2D::city_block(), false)
            .distance_map(&mask)
            .unwrap();
        assert_eq!(map.get2(3, 1), 4);
        assert_eq!(map.get2(3, 0), 3);
    }

    #[test]
    fn all_foreground_saturates() {
        let mask = BinaryArray::filled(crate::array::Shape::new2(4, 3), true);
        let result = ChamferDistanceTransform2D::<u16>::new(ChamferMask2D::borgefors(), true)
            .compute_result(&mask)
            .unwrap();
        assert!(result.map.values().iter().all(|&v| v == u16::MAX));
        assert_eq!(result.max_distance, u16::MAX);
    }

    #[test]
    fn normalized_distances_fit_when_raw_distances_overflow() {
        // Raw Borgefors distances reach 3 * 99 = 297, beyond u8::MAX, while the normalized
        // distances stay below it
        let mask = BinaryArray::from_fn2(100, 1, |x, _| x != 0);
        let result = ChamferDistanceTransform2D::<u8>::new(ChamferMask2D::borgefors(), true)
            .compute_result(&mask)
            .unwrap();
        for x in 0..100 {
            assert_eq!(result.map.get2(x, 0), x as u8);
        }
        assert_eq!(result.max_distance, 99);

        let raw = ChamferDistanceTransform2D::<u8>::new(ChamferMask2D::borgefors(), false)
            .distance_map(&mask)
            .unwrap();
        assert_eq!(raw.get2(84, 0), 252);
        assert_eq!(raw.get2(99, 0), u8::MAX);
    }

    #[test]
    fn long_quasi_euclidean_line_in_u16() {
        let mask = BinaryArray::from_fn2(7000, 1, |x, _| x != 0);
        let result =
            ChamferDistanceTransform2D::<u16>::new(ChamferMask2D::quasi_euclidean(), true)
                .compute_result(&mask)
                .unwrap();
        assert_eq!(result.map.get2(6553, 0), 6553);
        assert_eq!(result.map.get2(6554, 0), 6554);
        assert_eq!(result.map.get2(6999, 0), 6999);
        assert_eq!(result.max_distance, 6999);
    }

    #[test]
    fn max_distance_is_normalized() {
        let mask = single_background(7, 3, 3);
        let result = ChamferDistanceTransform2D::<u16>::new(ChamferMask2D::borgefors(), true)
            .compute_result(&mask)
            .unwrap();
        // Corner is three diagonal steps away, 12 raw
        assert_eq!(result.max_distance, 4);
        assert_eq!(result.map.max_value(), Some(4));
    }

    #[test]
    fn rejects_3d_arrays() {
        let mask = BinaryArray::empty3(4, 4, 4);
        let dt = ChamferDistanceTransform2D::<u16>::new(ChamferMask2D::borgefors(), true);
        let err = dt.compute_result(&mask).unwrap_err();
        assert!(is_invalid_argument(err.as_ref()));
    }

    #[test]
    fn progress_reports_each_row() {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = reports.clone();
        let mask = single_background(4, 1, 1);
        let dt = ChamferDistanceTransform2D::<u16>::new(ChamferMask2D::borgefors(), true)
            .with_progress(move |p| sink.lock().unwrap().push(*p));
        dt.distance_map(&mask).unwrap();

        let reports = reports.lock().unwrap();
        assert_eq!(reports.len(), 4 + 4 + 1);
        assert_eq!(
            reports[3],
            ScanProgress {
                pass: Pass::Forward,
                line: 4,
                lines: 4
            }
        );
        assert_eq!(reports[4].pass, Pass::Backward);
        assert_eq!(reports[8].pass, Pass::Normalize);
    }
}
