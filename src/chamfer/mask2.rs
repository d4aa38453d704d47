use crate::chamfer::offset::{NeighborClass, Offset2, precedes_in_raster};
use crate::chamfer::weights::MaskWeights;
use crate::Result;
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use std::error::Error;

/// Neighbor classes of a 2D mask, in the order that weights attach to them.
const CLASSES_2D: [NeighborClass; 3] = [
    NeighborClass::Orthogonal,
    NeighborClass::Diagonal,
    NeighborClass::Knight,
];

/// A 2D chamfer mask: a set of weighted neighbor offsets split into the half visited before the
/// current element in a raster scan (the forward offsets) and its point reflection (the backward
/// offsets). The offsets are generated once at construction and are immutable afterwards.
///
/// Weights attach to neighbor classes in order:
///
/// - 1 weight: orthogonal neighbors only, the 4-neighborhood. Diagonal steps cost twice the
///   orthogonal weight by composition.
/// - 2 weights: orthogonal and diagonal neighbors, the 8-neighborhood.
/// - 3 weights: orthogonal, diagonal, and knight-move neighbors, the 16-neighborhood of a 5x5
///   mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MaskWeights", into = "MaskWeights")]
pub struct ChamferMask2D {
    weights: Vec<f64>,
    int_weights: Vec<u32>,
    forward: Vec<Offset2>,
    backward: Vec<Offset2>,
}

impl ChamferMask2D {
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

    /// Create a mask with separately specified floating point and integer weights, for example
    /// `(1, √2)` and `(10, 14)` for the quasi-Euclidean mask.
    pub fn with_weights(weights: &[f64], int_weights: &[u32]) -> Result<Self> {
        Self::try_from(MaskWeights {
            weights: weights.to_vec(),
            int_weights: Some(int_weights.to_vec()),
        })
    }

    pub fn chessboard() -> Self {
        Self::build(vec![1.0, 1.0], vec![1, 1])
    }

    pub fn city_block() -> Self {
        Self::build(vec![1.0, 2.0], vec![1, 2])
    }

    pub fn quasi_euclidean() -> Self {
        Self::build(vec![1.0, std::f64::consts::SQRT_2], vec![10, 14])
    }

    pub fn borgefors() -> Self {
        Self::build(vec![3.0, 4.0], vec![3, 4])
    }

    pub fn chess_knight() -> Self {
        Self::build(vec![5.0, 7.0, 11.0], vec![5, 7, 11])
    }

    fn build(weights: Vec<f64>, int_weights: Vec<u32>) -> Self {
        let mut forward = Vec::new();
        for (dy, dx) in iproduct!(-2..=2, -2..=2) {
            let shift = [dx, dy];
            if !precedes_in_raster(&shift) {
                continue;
            }
            let Some(class) = NeighborClass::classify(&shift) else {
                continue;
            };
            if let Some(i) = CLASSES_2D.iter().position(|&c| c == class) {
                if i < weights.len() {
                    forward.push(Offset2::new(dx, dy, weights[i], int_weights[i]));
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

    /// Offsets to neighbors which precede an element in increasing raster order.
    pub fn forward_offsets(&self) -> &[Offset2] {
        &self.forward
    }

    /// Offsets to neighbors which follow an element in increasing raster order, the point
    /// reflection of the forward offsets.
    pub fn backward_offsets(&self) -> &[Offset2] {
        &self.backward
    }

    /// All offsets of the mask, forward half first.
    pub fn offsets(&self) -> impl Iterator<Item = &Offset2> {
        self.forward.iter().chain(self.backward.iter())
    }

    /// The floating point weight of a unit orthogonal step.
    pub fn normalization_weight(&self) -> f64 {
        self.weights[0]
    }

    /// The integer weight of a unit orthogonal step.
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

impl TryFrom<MaskWeights> for ChamferMask2D {
    type Error = Box<dyn Error>;

    fn try_from(value: MaskWeights) -> Result<Self> {
        let (weights, int_weights) = value.resolve(CLASSES_2D.len())?;
        Ok(Self::build(weights, int_weights))
    }
}

impl From<ChamferMask2D> for MaskWeights {
    fn from(mask: ChamferMask2D) -> Self {
        MaskWeights {
            weights: mask.weights,
            int_weights: Some(mask.int_weights),
        }
    }
}
