use crate::{Block, Partition, ProcessId, RowWriter, RunError, Topology};
use dnsmul_core::communicator::{CommunicationError, Communicator};
use dnsmul_core::common::io::AsyncWrite;
use dnsmul_core::message::Tag;

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Assembles the product at the coordinator one global row at a time.
///
/// Segments of block row 0, block column 0 come from `result`. Every other segment is one
/// message of `part_size` elements from the reducer of its block, received in ascending block
/// column order.
pub async fn gather<C, W>(
    communicator: &mut C,
    topology: &Topology,
    partition: &Partition,
    result: &Block,
    writer: &mut RowWriter<W>,
) -> Result<(), RunError>
where
    C: Communicator + ?Sized,
    W: AsyncWrite + Unpin,
{
    let part_size = partition.part_size();

    for row in 0..partition.matrix_size() {
        let block_row = partition.block_index(row);
        let local_row = row % part_size;
        let mut line = Vec::with_capacity(partition.matrix_size());

        for block_column in 0..topology.side() {
            if (block_row, block_column) == (0, 0) {
                line.extend_from_slice(result.row(local_row));
            } else {
                let source = topology.reducer(block_row, block_column);

                line.extend(
                    communicator
                        .receive(source.into(), Tag::RESULT_ROW, part_size)
                        .await?,
                );
            }
        }

        writer.write_row(&line).await?;
    }

    Ok(())
}

/// Sends every row of a reducer's result block to the coordinator, first row first.
pub async fn scatter_rows<C>(
    communicator: &mut C,
    topology: &Topology,
    result: Block,
) -> Result<(), CommunicationError>
where
    C: Communicator + ?Sized,
{
    let coordinator: ProcessId = topology.coordinator();

    for row in result.rows() {
        communicator
            .send(coordinator.into(), Tag::RESULT_ROW, row.to_vec())
            .await?;
    }

    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////
