use crate::{DistanceMapError, Result};

/// The per-axis extent of a dense array. Axis 0 is the x axis and varies fastest in the flat
/// buffer, so the flat index of `(x, y, z)` is `x + nx * (y + ny * z)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    sizes: Vec<usize>,
}

impl Shape {
    pub fn new(sizes: &[usize]) -> Self {
        Self {
            sizes: sizes.to_vec(),
        }
    }

    pub fn new2(size_x: usize, size_y: usize) -> Self {
        Self::new(&[size_x, size_y])
    }

    pub fn new3(size_x: usize, size_y: usize, size_z: usize) -> Self {
        Self::new(&[size_x, size_y, size_z])
    }

    pub fn dimensionality(&self) -> usize {
        self.sizes.len()
    }

    /// Size of the array along the given axis. Panics if `dim` is not a valid axis.
    pub fn size(&self, dim: usize) -> usize {
        self.sizes[dim]
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// The total number of elements in the array.
    pub fn len(&self) -> usize {
        self.sizes.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The distance in the flat buffer between two elements which are adjacent along `dim`.
    pub fn stride(&self, dim: usize) -> usize {
        self.sizes[..dim].iter().product()
    }

    /// Flat buffer index of a position. Panics if the position has the wrong number of
    /// coordinates or lies outside of the array.
    pub fn index(&self, pos: &[usize]) -> usize {
        assert_eq!(
            pos.len(),
            self.sizes.len(),
            "position {:?} does not match shape {:?}",
            pos,
            self.sizes
        );
        let mut index = 0;
        for d in (0..pos.len()).rev() {
            assert!(pos[d] < self.sizes[d], "position {:?} out of bounds", pos);
            index = index * self.sizes[d] + pos[d];
        }
        index
    }

    /// Inverse of `index`, converting a flat buffer index back into a position.
    pub fn position(&self, mut index: usize) -> Vec<usize> {
        let mut pos = Vec::with_capacity(self.sizes.len());
        for &s in self.sizes.iter() {
            pos.push(index % s);
            index /= s;
        }
        pos
    }

    /// Check whether a signed position lies within the bounds of the array.
    pub fn contains(&self, pos: &[i64]) -> bool {
        pos.len() == self.sizes.len()
            && pos
                .iter()
                .zip(self.sizes.iter())
                .all(|(&p, &s)| p >= 0 && (p as usize) < s)
    }

    /// Fails with `InvalidArgument` unless the shape has exactly `dim` axes.
    pub fn require_dimensionality(&self, dim: usize) -> Result<()> {
        if self.dimensionality() != dim {
            return Err(DistanceMapError::argument(format!(
                "expected a {}D array, got a {}D array with shape {:?}",
                dim,
                self.dimensionality(),
                self.sizes
            )));
        }
        Ok(())
    }

    /// Iterate over every position of the array in increasing raster order.
    pub fn iter_positions(&self) -> RasterIter<'_> {
        RasterIter::new(self)
    }
}

/// Iterator over the positions of a `Shape` in raster order, with axis 0 varying fastest.
pub struct RasterIter<'a> {
    shape: &'a Shape,
    current: Option<Vec<usize>>,
}

impl<'a> RasterIter<'a> {
    pub fn new(shape: &'a Shape) -> Self {
        let current = if shape.is_empty() || shape.dimensionality() == 0 {
            None
        } else {
            Some(vec![0; shape.dimensionality()])
        };
        RasterIter { shape, current }
    }
}

impl<'a> Iterator for RasterIter<'a> {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.current.take()?;

        let mut next = pos.clone();
        let mut d = 0;
        loop {
            next[d] += 1;
            if next[d] < self.shape.size(d) {
                self.current = Some(next);
                break;
            }
            next[d] = 0;
            d += 1;
            if d >= next.len() {
                break;
            }
        }

        Some(pos)
    }
}
