pub use dnsmul_core::element::Element;

use std::ops::Range;

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Square row-major submatrix. A block has exactly one owner; it moves into a message payload
/// when sent and a fresh block is built from a received payload.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Block {
    size: usize,
    elements: Vec<Element>,
}

impl From<Block> for Vec<Element> {
    fn from(block: Block) -> Self {
        block.elements
    }
}

impl Block {
    /// # Panics
    ///
    /// Panics if `elements` does not hold exactly `size * size` values.
    pub fn new(size: usize, elements: Vec<Element>) -> Self {
        assert_eq!(
            elements.len(),
            size * size,
            "block of size {size} needs {} elements",
            size * size
        );

        Self { size, elements }
    }

    pub fn zeroed(size: usize) -> Self {
        Self::new(size, vec![0; size * size])
    }

    pub fn identity(size: usize) -> Self {
        let mut block = Self::zeroed(size);

        for index in 0..size {
            block.set(index, index, 1);
        }

        block
    }

    pub fn from_rows<R>(rows: R) -> Self
    where
        R: IntoIterator<Item = Vec<Element>>,
    {
        let rows = rows.into_iter().collect::<Vec<_>>();
        let size = rows.len();

        Self::new(size, rows.into_iter().flatten().collect())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    pub fn get(&self, row: usize, column: usize) -> Element {
        self.elements[row * self.size + column]
    }

    pub fn set(&mut self, row: usize, column: usize, value: Element) {
        self.elements[row * self.size + column] = value;
    }

    pub fn row(&self, row: usize) -> &[Element] {
        &self.elements[row * self.size..(row + 1) * self.size]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Element]> {
        self.elements.chunks_exact(self.size.max(1))
    }

    /// Element-wise wrapping sum of `other` into `self`.
    pub fn accumulate(&mut self, other: &Block) {
        assert_eq!(self.size, other.size, "blocks differ in size");

        for (value, addend) in self.elements.iter_mut().zip(&other.elements) {
            *value = value.wrapping_add(*addend);
        }
    }

    /// Copies the square region starting at (`row`, `column`) of side `size`.
    pub fn region(&self, row: usize, column: usize, size: usize) -> Block {
        let mut elements = Vec::with_capacity(size * size);

        for index in row..row + size {
            elements.extend_from_slice(&self.row(index)[column..column + size]);
        }

        Block::new(size, elements)
    }

    /// Writes `block` into the square region starting at (`row`, `column`).
    pub fn write_region(&mut self, row: usize, column: usize, block: &Block) {
        for (offset, source) in block.rows().enumerate() {
            let start = (row + offset) * self.size + column;
            self.elements[start..start + block.size].copy_from_slice(source);
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Block row and block column of one operand block.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct BlockPosition {
    row: usize,
    column: usize,
}

impl From<BlockPosition> for (usize, usize) {
    fn from(position: BlockPosition) -> Self {
        (position.row, position.column)
    }
}

impl BlockPosition {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn row_range(&self, part_size: usize) -> Range<usize> {
        self.row * part_size..(self.row + 1) * part_size
    }

    pub fn column_range(&self, part_size: usize) -> Range<usize> {
        self.column * part_size..(self.column + 1) * part_size
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
