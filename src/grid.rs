/// A dense 2D grid stored row-major, row 0 at the top.
///
/// Unlike a world map, a regional map does not wrap: neighbours are clamped
/// at every edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Wrap existing row-major data. Returns `None` when the length does not
    /// match the dimensions.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == width * height).then_some(Self { width, height, data })
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// 8-connected neighbours inside the grid.
    pub fn neighbors_8(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut result = Vec::with_capacity(8);

        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx >= 0 && ny >= 0 && nx < self.width as i64 && ny < self.height as i64 {
                    result.push((nx as usize, ny as usize));
                }
            }
        }

        result
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % self.width;
            let y = idx / self.width;
            (x, y, val)
        })
    }

    /// Raw row-major storage, for row-parallel fills.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl Grid<f32> {
    /// Bilinear interpolation at fractional cell coordinates, clamped to the
    /// grid. NaN (missing) nodes propagate.
    pub fn sample_bilinear(&self, x: f64, y: f64) -> f32 {
        let x = x.clamp(0.0, (self.width - 1) as f64);
        let y = y.clamp(0.0, (self.height - 1) as f64);

        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = (x - x0 as f64) as f32;
        let fy = (y - y0 as f64) as f32;

        let top = *self.get(x0, y0) * (1.0 - fx) + *self.get(x1, y0) * fx;
        let bottom = *self.get(x0, y1) * (1.0 - fx) + *self.get(x1, y1) * fx;
        top * (1.0 - fy) + bottom * fy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_clamp_at_edges() {
        let grid = Grid::new_with(4, 3, 0u8);
        assert_eq!(grid.neighbors_8(0, 0).len(), 3);
        assert_eq!(grid.neighbors_8(1, 1).len(), 8);
        assert_eq!(grid.neighbors_8(3, 2).len(), 3);
        assert_eq!(grid.neighbors_8(3, 1).len(), 5);
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert!(Grid::from_vec(2, 2, vec![1, 2, 3, 4]).is_some());
        assert!(Grid::from_vec(2, 2, vec![1, 2, 3]).is_none());
    }

    #[test]
    fn test_bilinear_sampling() {
        let grid = Grid::from_vec(2, 2, vec![0.0f32, 10.0, 20.0, 30.0]).unwrap();
        assert_eq!(grid.sample_bilinear(0.0, 0.0), 0.0);
        assert_eq!(grid.sample_bilinear(1.0, 1.0), 30.0);
        assert!((grid.sample_bilinear(0.5, 0.5) - 15.0).abs() < 1e-6);
        // Outside the grid clamps to the edge
        assert_eq!(grid.sample_bilinear(-3.0, 5.0), 20.0);
    }

    #[test]
    fn test_set_and_iter() {
        let mut grid = Grid::new_with(3, 2, 0i32);
        grid.set(2, 1, 7);
        assert_eq!(*grid.get(2, 1), 7);
        let found: Vec<_> = grid.iter().filter(|(_, _, v)| **v == 7).map(|(x, y, _)| (x, y)).collect();
        assert_eq!(found, vec![(2, 1)]);
    }
}
