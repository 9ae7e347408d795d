use crate::{format_row, Block, BlockPosition, Element};
use rand::Rng;
use std::fmt::{self, Display, Formatter};
use std::ops::RangeInclusive;

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Whole `N×N` operand or product held in one place. Processes never build one; it serves as
/// the reference for generated inputs and checked outputs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Matrix(Block);

impl Display for Matrix {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        let mut line = String::new();

        for row in self.0.rows().take(self.size()) {
            format_row(row, &mut line);
        }

        formatter.write_str(&line)
    }
}

impl From<Block> for Matrix {
    fn from(block: Block) -> Self {
        Self(block)
    }
}

impl Matrix {
    pub fn new(size: usize, elements: Vec<Element>) -> Self {
        Self(Block::new(size, elements))
    }

    pub fn from_rows<R>(rows: R) -> Self
    where
        R: IntoIterator<Item = Vec<Element>>,
    {
        Self(Block::from_rows(rows))
    }

    pub fn identity(size: usize) -> Self {
        Self(Block::identity(size))
    }

    pub fn random<R>(size: usize, range: RangeInclusive<Element>, rng: &mut R) -> Self
    where
        R: Rng,
    {
        Self::new(
            size,
            (0..size * size)
                .map(|_| rng.gen_range(range.clone()))
                .collect(),
        )
    }

    pub fn size(&self) -> usize {
        self.0.size()
    }

    pub fn get(&self, row: usize, column: usize) -> Element {
        self.0.get(row, column)
    }

    pub fn row(&self, row: usize) -> &[Element] {
        self.0.row(row)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Element]> {
        self.0.rows().take(self.size())
    }

    pub fn block(&self, position: BlockPosition, part_size: usize) -> Block {
        self.0.region(
            position.row() * part_size,
            position.column() * part_size,
            part_size,
        )
    }

    /// Brute-force wrapping product.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        assert_eq!(self.size(), other.size(), "matrices differ in size");

        let size = self.size();
        let mut elements = Vec::with_capacity(size * size);

        for row in 0..size {
            for column in 0..size {
                elements.push((0..size).fold(0 as Element, |sum, index| {
                    sum.wrapping_add(self.get(row, index).wrapping_mul(other.get(index, column)))
                }));
            }
        }

        Self::new(size, elements)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
