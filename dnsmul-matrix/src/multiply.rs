use crate::{Block, Element};

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Block size at which the divide and conquer product falls back to the triple loop.
const RECURSION_BASE_SIZE: usize = 16;

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Triple-loop product of two blocks of equal size. Overflow wraps.
pub fn multiply(left: &Block, right: &Block) -> Block {
    assert_eq!(left.size(), right.size(), "blocks differ in size");

    let size = left.size();
    let mut elements = Vec::with_capacity(size * size);

    for row in 0..size {
        for column in 0..size {
            let mut value: Element = 0;

            for index in 0..size {
                value = value
                    .wrapping_add(left.get(row, index).wrapping_mul(right.get(index, column)));
            }

            elements.push(value);
        }
    }

    Block::new(size, elements)
}

/// Divide and conquer product over quadrants. Same result as [`multiply`]; only worth it for
/// large power of two blocks where the quadrants stay cache resident.
pub fn multiply_recursive(left: &Block, right: &Block) -> Block {
    assert_eq!(left.size(), right.size(), "blocks differ in size");

    let size = left.size();

    if size <= RECURSION_BASE_SIZE || size % 2 != 0 {
        return multiply(left, right);
    }

    let half = size / 2;
    let mut result = Block::zeroed(size);

    for row in 0..2 {
        for column in 0..2 {
            let mut quadrant = Block::zeroed(half);

            for index in 0..2 {
                quadrant.accumulate(&multiply_recursive(
                    &left.region(row * half, index * half, half),
                    &right.region(index * half, column * half, half),
                ));
            }

            result.write_region(row * half, column * half, &quadrant);
        }
    }

    result
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MultiplyStrategy {
    Iterative,
    Recursive,
}

impl MultiplyStrategy {
    /// Divide and conquer only pays off for power of two blocks of at least `threshold`.
    pub fn select(part_size: usize, threshold: usize) -> Self {
        if part_size >= threshold && part_size.is_power_of_two() {
            Self::Recursive
        } else {
            Self::Iterative
        }
    }

    pub fn multiply(self, left: &Block, right: &Block) -> Block {
        match self {
            Self::Iterative => multiply(left, right),
            Self::Recursive => multiply_recursive(left, right),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
