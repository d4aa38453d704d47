//! Serializable descriptions of a distance transform, for callers which select the method and
//! its parameters at runtime (for example from a JSON settings file).

use crate::array::{BinaryArray, DistanceValue};
use crate::chamfer::{ChamferDistanceTransform2D, ChamferDistanceTransform3D, ChamferWeights};
use crate::euclidean::EuclideanDistanceTransform;
use crate::result::{DistanceMap, DistanceTransform};
use crate::{DistanceMapError, Result};
use serde::{Deserialize, Serialize};

fn default_normalize() -> bool {
    true
}

/// The method and parameters of a distance transform. The JSON form is tagged by `"method"`:
///
/// ```json
/// { "method": "chamfer", "weights": "borgefors", "normalize": true }
/// { "method": "chamfer", "weights": { "custom": { "weights": [5, 7, 11] } } }
/// { "method": "euclidean", "spacing": [1.0, 1.0, 2.5] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum TransformConfig {
    Chamfer {
        weights: ChamferWeights,
        #[serde(default = "default_normalize")]
        normalize: bool,
    },
    Euclidean {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        spacing: Option<Vec<f64>>,
    },
}

impl TransformConfig {
    /// Parse a configuration from a JSON string. Malformed input is reported as an invalid
    /// configuration.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| DistanceMapError::configuration(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Compute the distance map of a 2D or 3D binary array with the configured method. The
    /// chamfer mask is built for the dimensionality of the array.
    ///
    /// # Arguments
    ///
    /// * `mask`: a 2D or 3D binary array where `true` marks foreground elements
    ///
    /// returns: Result<DistanceMap<T>, Box<dyn Error, Global>>
    pub fn compute<T: DistanceValue>(&self, mask: &BinaryArray) -> Result<DistanceMap<T>> {
        match (self, mask.dimensionality()) {
            (TransformConfig::Chamfer { weights, normalize }, 2) => {
                ChamferDistanceTransform2D::<T>::new(weights.mask_2d()?, *normalize)
                    .compute_result(mask)
            }
            (TransformConfig::Chamfer { weights, normalize }, 3) => {
                ChamferDistanceTransform3D::<T>::new(weights.mask_3d()?, *normalize)
                    .compute_result(mask)
            }
            (TransformConfig::Euclidean { spacing }, _) => {
                let mut transform = EuclideanDistanceTransform::<T>::new();
                if let Some(s) = spacing {
                    transform = transform.with_spacing(s.clone());
                }
                transform.compute_result(mask)
            }
            (_, d) => Err(DistanceMapError::argument(format!(
                "distance transforms require a 2D or 3D array, got {}D",
                d
            ))),
        }
    }
}
