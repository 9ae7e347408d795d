/// Grid sides whose cube is an allowed process count.
pub const SUPPORTED_GRID_SIDES: [usize; 2] = [2, 4];

/// Smallest block size that switches local multiplication to divide and conquer.
pub const DEFAULT_RECURSIVE_THRESHOLD: usize = 64;

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunConfiguration {
    supported_grid_sides: Vec<usize>,
    recursive_threshold: usize,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self::new(SUPPORTED_GRID_SIDES.to_vec(), DEFAULT_RECURSIVE_THRESHOLD)
    }
}

impl RunConfiguration {
    pub fn new(supported_grid_sides: Vec<usize>, recursive_threshold: usize) -> Self {
        Self {
            supported_grid_sides,
            recursive_threshold,
        }
    }

    pub fn supported_grid_sides(&self) -> &[usize] {
        &self.supported_grid_sides
    }

    pub fn recursive_threshold(&self) -> usize {
        self.recursive_threshold
    }

    pub fn supported_process_counts(&self) -> Vec<usize> {
        self.supported_grid_sides
            .iter()
            .map(|side| side.saturating_pow(3))
            .collect()
    }
}
