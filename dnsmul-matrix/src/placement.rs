use crate::{
    Block, BlockPosition, MatrixSource, Partition, ProcessCoordinates, ProcessId, SourceError,
    Topology,
};
use dnsmul_core::common::tracing::trace;
use std::fmt::{self, Display, Formatter};

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Operand {
    A,
    B,
}

impl Display for Operand {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match self {
            Self::A => write!(formatter, "A"),
            Self::B => write!(formatter, "B"),
        }
    }
}

impl Operand {
    /// Process holding copy `third` of block (`block_row`, `block_column`).
    ///
    /// Block `A(i, k)` goes to every `(i, j, k)` with `third = j`, block `B(k, j)` goes to
    /// every `(i, j, k)` with `third = i`. Over all `n³` triples both maps hit every process
    /// exactly once.
    pub fn owner(
        self,
        topology: &Topology,
        block_row: usize,
        block_column: usize,
        third: usize,
    ) -> ProcessId {
        let coordinates = match self {
            Self::A => ProcessCoordinates::new(block_row, third, block_column),
            Self::B => ProcessCoordinates::new(third, block_column, block_row),
        };

        topology.process_id(coordinates)
    }

    /// The single block of this operand held by `process_id`.
    pub fn owned_block(self, topology: &Topology, process_id: ProcessId) -> BlockPosition {
        let coordinates = topology.coordinates(process_id);

        match self {
            Self::A => BlockPosition::new(coordinates.i(), coordinates.k()),
            Self::B => BlockPosition::new(coordinates.k(), coordinates.j()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Streams the whole `source` and keeps the block of `operand` owned by `process_id`.
///
/// Every row is parsed and checked against the matrix size, so all processes reading the same
/// source reach the same verdict on malformed input.
pub async fn place<S>(
    source: &S,
    operand: Operand,
    topology: &Topology,
    partition: &Partition,
    process_id: ProcessId,
) -> Result<Block, SourceError>
where
    S: MatrixSource + ?Sized,
{
    let position = operand.owned_block(topology, process_id);
    let part_size = partition.part_size();
    let matrix_size = partition.matrix_size();
    let rows = position.row_range(part_size);
    let columns = position.column_range(part_size);

    let mut reader = source.open().await?;
    let mut elements = Vec::with_capacity(partition.block_element_count());
    let mut row = 0;

    while let Some(values) = reader.next_row().await? {
        if values.len() != matrix_size {
            return Err(SourceError::RowLength {
                row,
                expected: matrix_size,
                actual: values.len(),
            });
        }

        if rows.contains(&row) {
            elements.extend_from_slice(&values[columns.clone()]);
        }

        row += 1;
    }

    if row != matrix_size {
        return Err(SourceError::RowCount {
            expected: matrix_size,
            actual: row,
        });
    }

    trace!(
        "Process {} placed {}{:?}",
        process_id,
        operand,
        <(usize, usize)>::from(position)
    );

    Ok(Block::new(part_size, elements))
}

////////////////////////////////////////////////////////////////////////////////////////////////////
