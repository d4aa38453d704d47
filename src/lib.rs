//! Distance transforms of 2D and 3D binary arrays. For every foreground (`true`) element of a
//! binary array, a distance transform computes the distance to the nearest background (`false`)
//! element. Two families are provided:
//!
//! * chamfer transforms (`chamfer`), which approximate the Euclidean distance by propagating
//!   weighted steps through a small neighborhood mask in two raster scans
//! * an exact Euclidean transform (`euclidean`), separable along the axes of the array and
//!   supporting anisotropic element spacing
//!
//! Both implement the `DistanceTransform` trait, and `config::TransformConfig` selects one of
//! them from a serialized description.

use std::error::Error;

pub mod array;
pub mod chamfer;
pub mod config;
mod errors;
pub mod euclidean;
mod result;

pub use errors::*;
pub use parry3d_f64::na;
pub use result::*;

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;
