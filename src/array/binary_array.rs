use crate::array::Shape;
use crate::{DistanceMapError, Result};

/// A dense N-dimensional array of booleans. For the distance transforms a `true` element is
/// foreground (its distance will be computed) and a `false` element is background (distance
/// zero).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryArray {
    shape: Shape,
    buffer: Vec<bool>,
}

impl BinaryArray {
    /// Create a new `BinaryArray` of the given shape with all elements set to `false`.
    pub fn new(shape: Shape) -> BinaryArray {
        let buffer = vec![false; shape.len()];
        BinaryArray { shape, buffer }
    }

    /// Create a new `BinaryArray` of the given shape with all elements set to `value`.
    pub fn filled(shape: Shape, value: bool) -> BinaryArray {
        let buffer = vec![value; shape.len()];
        BinaryArray { shape, buffer }
    }

    pub fn empty2(size_x: usize, size_y: usize) -> BinaryArray {
        Self::new(Shape::new2(size_x, size_y))
    }

    pub fn empty3(size_x: usize, size_y: usize, size_z: usize) -> BinaryArray {
        Self::new(Shape::new3(size_x, size_y, size_z))
    }

    /// Create a 2D array by evaluating `f(x, y)` at every position.
    pub fn from_fn2(size_x: usize, size_y: usize, f: impl Fn(usize, usize) -> bool) -> Self {
        let mut array = Self::empty2(size_x, size_y);
        for y in 0..size_y {
            for x in 0..size_x {
                array.set2(x, y, f(x, y));
            }
        }
        array
    }

    /// Create a 3D array by evaluating `f(x, y, z)` at every position.
    pub fn from_fn3(
        size_x: usize,
        size_y: usize,
        size_z: usize,
        f: impl Fn(usize, usize, usize) -> bool,
    ) -> Self {
        let mut array = Self::empty3(size_x, size_y, size_z);
        for z in 0..size_z {
            for y in 0..size_y {
                for x in 0..size_x {
                    array.set3(x, y, z, f(x, y, z));
                }
            }
        }
        array
    }

    /// Build a 2D array from rows of text, where each row is a line of constant y and the
    /// character `'1'` marks a foreground element. All rows must have the same length.
    ///
    /// # Arguments
    ///
    /// * `rows`: the rows of the array, the first row being `y = 0`
    ///
    /// returns: Result<BinaryArray, Box<dyn Error, Global>>
    ///
    /// # Examples
    ///
    /// ```
    /// use distmap::array::BinaryArray;
    /// let mask = BinaryArray::from_rows(&["111", "101", "111"]).unwrap();
    /// assert!(!mask.get2(1, 1));
    /// assert_eq!(mask.count_true(), 8);
    /// ```
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let size_y = rows.len();
        let size_x = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let mut array = Self::empty2(size_x, size_y);

        for (y, line) in rows.iter().enumerate() {
            if line.chars().count() != size_x {
                return Err(DistanceMapError::argument(format!(
                    "row {} has length {}, expected {}",
                    y,
                    line.chars().count(),
                    size_x
                )));
            }
            for (x, c) in line.chars().enumerate() {
                array.set2(x, y, c == '1');
            }
        }

        Ok(array)
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

    /// The raw buffer of the array, in raster order.
    pub fn as_slice(&self) -> &[bool] {
        &self.buffer
    }

    pub fn get(&self, pos: &[usize]) -> bool {
        self.buffer[self.shape.index(pos)]
    }

    pub fn set(&mut self, pos: &[usize], value: bool) {
        let i = self.shape.index(pos);
        self.buffer[i] = value;
    }

    pub fn get2(&self, x: usize, y: usize) -> bool {
        self.buffer[x + self.shape.size(0) * y]
    }

    pub fn set2(&mut self, x: usize, y: usize, value: bool) {
        let i = x + self.shape.size(0) * y;
        self.buffer[i] = value;
    }

    pub fn get3(&self, x: usize, y: usize, z: usize) -> bool {
        self.buffer[x + self.shape.size(0) * (y + self.shape.size(1) * z)]
    }

    pub fn set3(&mut self, x: usize, y: usize, z: usize, value: bool) {
        let i = x + self.shape.size(0) * (y + self.shape.size(1) * z);
        self.buffer[i] = value;
    }

    // ==========================================================================================
    // Truth operations
    // ==========================================================================================

    pub fn count_true(&self) -> usize {
        self.buffer.iter().filter(|&&v| v).count()
    }

    /// True if at least one element of the array is background.
    pub fn has_background(&self) -> bool {
        self.buffer.iter().any(|&v| !v)
    }

    /// Iterate over the positions of all `true` elements in raster order.
    pub fn iter_true(&self) -> impl Iterator<Item = Vec<usize>> + '_ {
        self.buffer
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(|(i, _)| self.shape.position(i))
    }

    /// Invert the array in place, i.e., set all true values to false and vice versa.
    pub fn not_mut(&mut self) {
        for v in self.buffer.iter_mut() {
            *v = !*v;
        }
    }

    /// Create a new array that is the inverse of the current array.
    pub fn not(&self) -> BinaryArray {
        let mut inverted = self.clone();
        inverted.not_mut();
        inverted
    }

    // ==========================================================================================
    // Views
    // ==========================================================================================

    /// Copy out the 2D plane at index `z` of a 3D array.
    pub fn slice_z(&self, z: usize) -> Result<BinaryArray> {
        self.shape.require_dimensionality(3)?;
        if z >= self.shape.size(2) {
            return Err(DistanceMapError::argument(format!(
                "slice index {} out of range for depth {}",
                z,
                self.shape.size(2)
            )));
        }

        let plane = self.shape.size(0) * self.shape.size(1);
        Ok(BinaryArray {
            shape: Shape::new2(self.shape.size(0), self.shape.size(1)),
            buffer: self.buffer[z * plane..(z + 1) * plane].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is_invalid_argument;

    #[test]
    fn count_true() {
        let mut mask = BinaryArray::empty2(4, 2);
        mask.set2(0, 0, true);
        mask.set2(1, 1, true);
        mask.set2(2, 0, true);

        assert_eq!(mask.count_true(), 3);
        assert!(mask.has_background());
    }

    #[test]
    fn not_mut() {
        let mut mask = BinaryArray::empty2(4, 2);
        mask.set2(0, 0, true);
        mask.set2(1, 1, true);

        mask.not_mut();

        assert!(!mask.get2(0, 0));
        assert!(!mask.get2(1, 1));
        assert_eq!(mask.count_true(), 6);
    }

    #[test]
    fn generic_and_direct_access_agree() {
        let mask = BinaryArray::from_fn3(3, 4, 5, |x, y, z| (x + 2 * y + 3 * z) % 4 == 0);
        for p in mask.shape().iter_positions() {
            assert_eq!(mask.get(&p), mask.get3(p[0], p[1], p[2]));
        }
    }

    #[test]
    fn iter_true() {
        let mut mask = BinaryArray::empty2(4, 3);
        mask.set2(1, 0, true);
        mask.set2(3, 1, true);
        mask.set2(2, 2, true);

        let mut iter = mask.iter_true();
        assert_eq!(iter.next(), Some(vec![1, 0]));
        assert_eq!(iter.next(), Some(vec![3, 1]));
        assert_eq!(iter.next(), Some(vec![2, 2]));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn rows_must_be_rectangular() {
        let err = BinaryArray::from_rows(&["111", "11"]).unwrap_err();
        assert!(is_invalid_argument(err.as_ref()));
    }

    #[test]
    fn slice_z_copies_plane() {
        let mask = BinaryArray::from_fn3(3, 2, 4, |_, _, z| z == 2);
        let plane = mask.slice_z(2).unwrap();
        assert_eq!(plane.dimensionality(), 2);
        assert_eq!(plane.count_true(), 6);
        assert_eq!(mask.slice_z(1).unwrap().count_true(), 0);
    }

    #[test]
    fn slice_z_out_of_range() {
        let mask = BinaryArray::empty3(3, 2, 4);
        assert!(is_invalid_argument(mask.slice_z(4).unwrap_err().as_ref()));

        let flat = BinaryArray::empty2(3, 2);
        assert!(is_invalid_argument(flat.slice_z(0).unwrap_err().as_ref()));
    }
}
