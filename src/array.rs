//! This module contains the dense N-dimensional arrays which the distance transforms consume and
//! produce. A `BinaryArray` holds the foreground/background mask, and a `ScalarArray<T>` holds
//! numeric values of a caller-selected element type. Both are flat buffers in raster order, with
//! axis 0 (x) varying fastest, then axis 1 (y), then axis 2 (z).

mod binary_array;
mod element;
mod scalar_array;
mod shape;

pub use binary_array::BinaryArray;
pub use element::DistanceValue;
pub use scalar_array::ScalarArray;
pub use shape::{RasterIter, Shape};
