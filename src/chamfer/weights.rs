//! Chamfer weight tables and the named weight presets.

use crate::chamfer::{ChamferMask2D, ChamferMask3D};
use crate::{DistanceMapError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;

/// The weights of a chamfer mask, one per neighbor class, in both floating point and integer
/// form. This is the serialized form of `ChamferMask2D` and `ChamferMask3D`; the offsets are
/// rebuilt from it on deserialization. When `int_weights` is omitted the floating point weights
/// are rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskWeights {
    pub weights: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int_weights: Option<Vec<u32>>,
}

impl MaskWeights {
    /// Check the weights against the number of neighbor classes available and return the pair
    /// of floating point and integer weight lists.
    pub(crate) fn resolve(&self, max_len: usize) -> Result<(Vec<f64>, Vec<u32>)> {
        let n = self.weights.len();
        if n == 0 || n > max_len {
            return Err(DistanceMapError::configuration(format!(
                "expected between 1 and {} weights, got {}",
                max_len, n
            )));
        }

        if let Some(w) = self.weights.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(DistanceMapError::configuration(format!(
                "chamfer weights must be finite and positive, got {}",
                w
            )));
        }

        let int_weights = match &self.int_weights {
            Some(iw) => iw.clone(),
            None => self.weights.iter().map(|w| w.round() as u32).collect(),
        };

        if int_weights.len() != n {
            return Err(DistanceMapError::configuration(format!(
                "got {} float weights but {} integer weights",
                n,
                int_weights.len()
            )));
        }

        // Explicit integer weights must be the float weights scaled by a common factor
        if self.int_weights.is_some() {
            let k = int_weights[0] as f64 / self.weights[0];
            let consistent = self
                .weights
                .iter()
                .zip(int_weights.iter())
                .all(|(&w, &iw)| (w * k).round() == iw as f64);
            if !consistent {
                return Err(DistanceMapError::configuration(format!(
                    "integer weights {:?} are not a rounded multiple of float weights {:?}",
                    int_weights, self.weights
                )));
            }
        }

        if int_weights.contains(&0) {
            return Err(DistanceMapError::configuration(
                "integer chamfer weights must be at least 1",
            ));
        }

        Ok((self.weights.clone(), int_weights))
    }
}

/// Named chamfer weight presets, plus arbitrary custom weights. A preset describes weights for
/// both 2D and 3D masks where it has a meaning in that dimensionality.
///
/// | Preset            | 2D          | 3D              |
/// |-------------------|-------------|-----------------|
/// | `Chessboard`      | 1, 1        | 1, 1, 1         |
/// | `CityBlock`       | 1, 2        | 1, 2, 3         |
/// | `QuasiEuclidean`  | 1, √2 (10, 14) | 1, √2, √3 (10, 14, 17) |
/// | `Borgefors`       | 3, 4        | 3, 4, 5         |
/// | `Weights23`       | 2, 3        |                 |
/// | `Weights57`       | 5, 7        |                 |
/// | `ChessKnight`     | 5, 7, 11    |                 |
/// | `Svensson`        |             | 3, 4, 5, 7      |
/// | `Weights10_14_17_22` |          | 10, 14, 17, 22  |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChamferWeights {
    Chessboard,
    CityBlock,
    QuasiEuclidean,
    Borgefors,
    Weights23,
    Weights57,
    ChessKnight,
    Svensson,
    #[serde(rename = "weights_10_14_17_22")]
    Weights10_14_17_22,
    Custom(MaskWeights),
}

impl ChamferWeights {
    /// Build the 2D chamfer mask for these weights.
    pub fn mask_2d(&self) -> Result<ChamferMask2D> {
        match self {
            ChamferWeights::Chessboard => ChamferMask2D::from_int_weights(&[1, 1]),
            ChamferWeights::CityBlock => ChamferMask2D::from_int_weights(&[1, 2]),
            ChamferWeights::QuasiEuclidean => {
                ChamferMask2D::with_weights(&[1.0, SQRT_2], &[10, 14])
            }
            ChamferWeights::Borgefors => ChamferMask2D::from_int_weights(&[3, 4]),
            ChamferWeights::Weights23 => ChamferMask2D::from_int_weights(&[2, 3]),
            ChamferWeights::Weights57 => ChamferMask2D::from_int_weights(&[5, 7]),
            ChamferWeights::ChessKnight => ChamferMask2D::from_int_weights(&[5, 7, 11]),
            ChamferWeights::Custom(w) => ChamferMask2D::try_from(w.clone()),
            _ => Err(DistanceMapError::configuration(format!(
                "{:?} weights are only defined for 3D masks",
                self
            ))),
        }
    }

    /// Build the 3D chamfer mask for these weights.
    pub fn mask_3d(&self) -> Result<ChamferMask3D> {
        match self {
            ChamferWeights::Chessboard => ChamferMask3D::from_int_weights(&[1, 1, 1]),
            ChamferWeights::CityBlock => ChamferMask3D::from_int_weights(&[1, 2, 3]),
            ChamferWeights::QuasiEuclidean => {
                ChamferMask3D::with_weights(&[1.0, SQRT_2, 3.0f64.sqrt()], &[10, 14, 17])
            }
            ChamferWeights::Borgefors => ChamferMask3D::from_int_weights(&[3, 4, 5]),
            ChamferWeights::Svensson => ChamferMask3D::from_int_weights(&[3, 4, 5, 7]),
            ChamferWeights::Weights10_14_17_22 => {
                ChamferMask3D::from_int_weights(&[10, 14, 17, 22])
            }
            ChamferWeights::Custom(w) => ChamferMask3D::try_from(w.clone()),
            _ => Err(DistanceMapError::configuration(format!(
                "{:?} weights are only defined for 2D masks",
                self
            ))),
        }
    }
}
