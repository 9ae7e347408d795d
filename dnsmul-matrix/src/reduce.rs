use crate::{Block, Partition, ProcessCoordinates, ProcessId, Topology};
use dnsmul_core::communicator::{CommunicationError, Communicator};
use dnsmul_core::common::tracing::debug;
use dnsmul_core::message::Tag;

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Sums the partial products of one `(i, j)` group at its reducer.
///
/// Members with `k > 0` send their block to the reducer and return `None`. The reducer waits
/// for exactly `n - 1` blocks and returns the finished result block.
pub async fn reduce<C>(
    communicator: &mut C,
    topology: &Topology,
    partition: &Partition,
    partial: Block,
) -> Result<Option<Block>, CommunicationError>
where
    C: Communicator + ?Sized,
{
    let process_id = ProcessId::from(communicator.rank());
    let coordinates = topology.coordinates(process_id);
    let reducer = topology.reducer(coordinates.i(), coordinates.j());

    if process_id != reducer {
        communicator
            .send(reducer.into(), Tag::PARTIAL_PRODUCT, partial.into_elements())
            .await?;

        return Ok(None);
    }

    let mut result = partial;
    let mut contributions = 1;

    for k in 1..topology.side() {
        let source = topology.process_id(ProcessCoordinates::new(
            coordinates.i(),
            coordinates.j(),
            k,
        ));

        let elements = communicator
            .receive(
                source.into(),
                Tag::PARTIAL_PRODUCT,
                partition.block_element_count(),
            )
            .await?;

        result.accumulate(&Block::new(partition.part_size(), elements));
        contributions += 1;
    }

    debug!(
        "Reduced block ({}, {}) from {} contributions",
        coordinates.i(),
        coordinates.j(),
        contributions
    );

    Ok(Some(result))
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use super::*;
    use crate::SUPPORTED_GRID_SIDES;
    use dnsmul_core::local::local_world;

    #[tokio::test]
    async fn reduce_sums_group() {
        let topology = Topology::resolve(8, &SUPPORTED_GRID_SIDES).unwrap();
        let partition = topology.partition(2).unwrap();

        let handles = local_world(8)
            .into_iter()
            .map(|mut communicator| {
                tokio::spawn(async move {
                    let rank = communicator.rank() as i64;
                    let partial = Block::new(1, vec![rank]);

                    reduce(&mut communicator, &topology, &partition, partial)
                        .await
                        .unwrap()
                })
            })
            .collect::<Vec<_>>();

        let mut results = Vec::new();

        for handle in handles {
            results.push(handle.await.unwrap());
        }

        assert_eq!(
            results,
            vec![
                Some(Block::new(1, vec![1])),
                None,
                Some(Block::new(1, vec![5])),
                None,
                Some(Block::new(1, vec![9])),
                None,
                Some(Block::new(1, vec![13])),
                None,
            ]
        );
    }

    #[tokio::test]
    async fn reduce_counts_side_contributions() {
        let topology = Topology::resolve(64, &SUPPORTED_GRID_SIDES).unwrap();
        let partition = topology.partition(4).unwrap();

        let handles = local_world(64)
            .into_iter()
            .map(|mut communicator| {
                tokio::spawn(async move {
                    reduce(&mut communicator, &topology, &partition, Block::new(1, vec![1]))
                        .await
                        .unwrap()
                })
            })
            .collect::<Vec<_>>();

        let mut reduced = 0;

        for handle in handles {
            if let Some(block) = handle.await.unwrap() {
                assert_eq!(block, Block::new(1, vec![4]));
                reduced += 1;
            }
        }

        assert_eq!(reduced, 16);
    }
}
