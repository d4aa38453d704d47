use crate::array::{DistanceValue, Shape};
use crate::{DistanceMapError, Result};

/// A dense N-dimensional array of numeric values of element type `T`, sharing the indexing
/// contract of `BinaryArray`. Distance maps are returned as `ScalarArray`s with the same shape as
/// the mask they were computed from.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarArray<T> {
    shape: Shape,
    values: Vec<T>,
}

impl<T: DistanceValue> ScalarArray<T> {
    /// Create a new array of the given shape with every element set to zero.
    pub fn new(shape: Shape) -> Self {
        Self::filled(shape, T::zero())
    }

    pub fn filled(shape: Shape, value: T) -> Self {
        let values = vec![value; shape.len()];
        Self { shape, values }
    }

    /// Create an array from a raw buffer in raster order. The buffer length must match the
    /// number of elements in the shape.
    pub fn from_vec(shape: Shape, values: Vec<T>) -> Result<Self> {
        if values.len() != shape.len() {
            return Err(DistanceMapError::argument(format!(
                "buffer of length {} cannot fill shape {:?}",
                values.len(),
                shape.sizes()
            )));
        }
        Ok(Self { shape, values })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn dimensionality(&self) -> usize {
        self.shape.dimensionality()
    }

    pub fn size(&self, dim: usize) -> usize {
        self.shape.size(dim)
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    pub fn get(&self, pos: &[usize]) -> T {
        self.values[self.shape.index(pos)]
    }

    pub fn set(&mut self, pos: &[usize], value: T) {
        let i = self.shape.index(pos);
        self.values[i] = value;
    }

    pub fn get2(&self, x: usize, y: usize) -> T {
        self.values[x + self.shape.size(0) * y]
    }

    pub fn set2(&mut self, x: usize, y: usize, value: T) {
        let i = x + self.shape.size(0) * y;
        self.values[i] = value;
    }

    pub fn get3(&self, x: usize, y: usize, z: usize) -> T {
        self.values[x + self.shape.size(0) * (y + self.shape.size(1) * z)]
    }

    pub fn set3(&mut self, x: usize, y: usize, z: usize, value: T) {
        let i = x + self.shape.size(0) * (y + self.shape.size(1) * z);
        self.values[i] = value;
    }

    /// Create a new array of the same shape by applying `f` to every element.
    pub fn map<U: DistanceValue>(&self, f: impl Fn(T) -> U) -> ScalarArray<U> {
        ScalarArray {
            shape: self.shape.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Convert every element to `f64`, which is convenient for comparisons against analytic
    /// values regardless of the element type.
    pub fn to_f64(&self) -> ScalarArray<f64> {
        self.map(|v| v.as_f64())
    }

    /// The largest element of the array, or `None` if the array is empty.
    pub fn max_value(&self) -> Option<T> {
        self.values
            .iter()
            .copied()
            .reduce(|a, b| if b > a { b } else { a })
    }

    /// Copy out the 2D plane at index `z` of a 3D array.
    pub fn slice_z(&self, z: usize) -> Result<ScalarArray<T>> {
        self.shape.require_dimensionality(3)?;
        if z >= self.shape.size(2) {
            return Err(DistanceMapError::argument(format!(
                "slice index {} out of range for depth {}",
                z,
                self.shape.size(2)
            )));
        }

        let plane = self.shape.size(0) * self.shape.size(1);
        Ok(ScalarArray {
            shape: Shape::new2(self.shape.size(0), self.shape.size(1)),
            values: self.values[z * plane..(z + 1) * plane].to_vec(),
        })
    }
}
