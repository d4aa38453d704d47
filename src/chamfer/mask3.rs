use crate::Result;
use crate::chamfer::offset::{NeighborClass, Offset3, precedes_in_raster};
use crate::chamfer::weights::MaskWeights;
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use std::error::Error;

/// Neighbor classes of a 3D mask, in the order that weights attach to them.
const CLASSES_3D: [NeighborClass; 4] = [
    NeighborClass::Orthogonal,
    NeighborClass::Diagonal,
    NeighborClass::CubeDiagonal,
    NeighborClass::Knight,
];

/// A 3D chamfer mask, split into forward and backward offsets in the same way as
/// `ChamferMask2D`. Raster order is z outer, y middle, x inner.
///
/// Weights attach to neighbor classes in order:
///
/// - 1 weight: face neighbors only, the 6-neighborhood
/// - 2 weights: face and edge neighbors, the 18-neighborhood
/// - 3 weights: face, edge, and vertex neighbors, the 26-neighborhood
/// - 4 weights: the 26-neighborhood plus the 24 knight-move neighbors such as `(2, 1, 0)`, as in
///   the 3-4-5-7 mask of Svensson and Borgefors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MaskWeights", into = "MaskWeights")]
pub struct ChamferMask3D {
    weights: Vec<f64>,
    int_weights: Vec<u32>,
    forward: Vec<Offset3>,
    backward: Vec<Offset3>,
}

impl ChamferMask3D {
    /// Create a mask from floating point weights. The integer weights are the rounded floating
    /// point weights.
    pub fn from_weights(weights: &[f64]) -> Result<Self> {
        Self::try_from(MaskWeights {
            weights: weights.to_vec(),
            int_weights: None,
        })
    }

    /// Create a mask from integer weights. The floating point weights are the same values.
    pub fn from_int_weights(int_weights: &[u32]) -> Result<Self> {
        Self::try_from(MaskWeights {
            weights: int_weights.iter().map(|&w| w as f64).collect(),
            int_weights: Some(int_weights.to_vec()),
        })
    }

    /// Create a mask with separately specified floating point and integer weights.
    pub fn with_weights(weights: &[f64], int_weights: &[u32]) -> Result<Self> {
        Self::try_from(MaskWeights {
            weights: weights.to_vec(),
            int_weights: Some(int_weights.to_vec()),
        })
    }

    pub fn chessboard() -> Self {
        Self::build(vec![1.0, 1.0, 1.0], vec![1, 1, 1])
    }

    pub fn city_block() -> Self {
        Self::build(vec![1.0, 2.0, 3.0], vec![1, 2, 3])
    }

    pub fn quasi_euclidean() -> Self {
        Self::build(
            vec![1.0, std::f64::consts::SQRT_2, 3.0f64.sqrt()],
            vec![10, 14, 17],
        )
    }

    pub fn borgefors() -> Self {
        Self::build(vec![3.0, 4.0, 5.0], vec![3, 4, 5])
    }

    pub fn svensson() -> Self {
        Self::build(vec![3.0, 4.0, 5.0, 7.0], vec![3, 4, 5, 7])
    }

    fn build(weights: Vec<f64>, int_weights: Vec<u32>) -> Self {
        let mut forward = Vec::new();
        for (dz, dy, dx) in iproduct!(-2..=2, -2..=2, -2..=2) {
            let shift = [dx, dy, dz];
            if !precedes_in_raster(&shift) {
                continue;
            }
            let Some(class) = NeighborClass::classify(&shift) else {
                continue;
            };
            if let Some(i) = CLASSES_3D.iter().position(|&c| c == class) {
                if i < weights.len() {
                    forward.push(Offset3::new(dx, dy, dz, weights[i], int_weights[i]));
                }
            }
        }

        let backward = forward.iter().map(|o| o.reflected()).collect();

        Self {
            weights,
            int_weights,
            forward,
            backward,
        }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn int_weights(&self) -> &[u32] {
        &self.int_weights
    }

    pub fn forward_offsets(&self) -> &[Offset3] {
        &self.forward
    }

    pub fn backward_offsets(&self) -> &[Offset3] {
        &self.backward
    }

    pub fn offsets(&self) -> impl Iterator<Item = &Offset3> {
        self.forward.iter().chain(self.backward.iter())
    }

    pub fn normalization_weight(&self) -> f64 {
        self.weights[0]
    }

    pub fn int_normalization_weight(&self) -> u32 {
        self.int_weights[0]
    }

    pub fn max_weight(&self) -> f64 {
        self.weights.iter().copied().fold(0.0, f64::max)
    }

    pub fn max_int_weight(&self) -> u32 {
        self.int_weights.iter().copied().max().unwrap_or(0)
    }
}

impl TryFrom<MaskWeights> for ChamferMask3D {
    type Error = Box<dyn Error>;

    fn try_from(value: MaskWeights) -> Result<Self> {
        let (weights, int_weights) = value.resolve(CLASSES_3D.len())?;
        Ok(Self::build(weights, int_weights))
    }
}

impl From<ChamferMask3D> for MaskWeights {
    fn from(mask: ChamferMask3D) -> Self {
        MaskWeights {
            weights: mask.weights,
            int_weights: Some(mask.int_weights),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is_invalid_configuration;
    use std::collections::HashSet;
    use test_case::test_case;

    fn shifts(offsets: &[Offset3]) -> HashSet<(i32, i32, i32, u32)> {
        offsets
            .iter()
            .map(|o| (o.dx(), o.dy(), o.dz(), o.int_weight))
            .collect()
    }

    #[test_case(&[1], 3)]
    #[test_case(&[1, 2], 9)]
    #[test_case(&[3, 4, 5], 13)]
    #[test_case(&[3, 4, 5, 7], 25)]
    fn forward_offset_counts(weights: &[u32], count: usize) {
        let mask = ChamferMask3D::from_int_weights(weights).unwrap();
        assert_eq!(mask.forward_offsets().len(), count);
        assert_eq!(mask.backward_offsets().len(), count);
    }

    #[test]
    fn svensson_weights_by_class() {
        let mask = ChamferMask3D::svensson();
        let fwd = shifts(mask.forward_offsets());
        assert!(fwd.contains(&(0, 0, -1, 3)));
        assert!(fwd.contains(&(1, -1, 0, 4)));
        assert!(fwd.contains(&(-1, 1, -1, 5)));
        assert!(fwd.contains(&(0, 2, -1, 7)));
        assert!(fwd.contains(&(-2, -1, 0, 7)));
        assert_eq!(mask.int_normalization_weight(), 3);
    }

    #[test]
    fn backward_is_reflection_of_forward() {
        for mask in [
            ChamferMask3D::chessboard(),
            ChamferMask3D::city_block(),
            ChamferMask3D::quasi_euclidean(),
            ChamferMask3D::borgefors(),
            ChamferMask3D::svensson(),
        ] {
            let reflected = mask
                .forward_offsets()
                .iter()
                .map(|o| (-o.dx(), -o.dy(), -o.dz(), o.int_weight))
                .collect::<HashSet<_>>();
            assert_eq!(reflected, shifts(mask.backward_offsets()));
            for o in mask.forward_offsets() {
                assert!(precedes_in_raster(&[o.dx(), o.dy(), o.dz()]));
            }
        }
    }

    #[test]
    fn five_weights_rejected() {
        let err = ChamferMask3D::from_int_weights(&[3, 4, 5, 7, 9]).unwrap_err();
        assert!(is_invalid_configuration(err.as_ref()));
    }

    #[test]
    fn float_weights_round_to_integers() {
        let mask = ChamferMask3D::from_weights(&[1.0, 1.4, 1.7]).unwrap();
        assert_eq!(mask.int_weights(), &[1, 1, 2]);
        assert_eq!(mask.max_weight(), 1.7);
    }
}
