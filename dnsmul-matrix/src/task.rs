use crate::{
    discover_matrix_size, gather, place, reduce, scatter_rows, ConfigurationError,
    MatrixSource, MultiplyStrategy, Operand, ProcessId, RowWriter, RunConfiguration, RunError,
    SourceError, Topology,
};
use dnsmul_core::communicator::Communicator;
use dnsmul_core::common::io::AsyncWrite;
use dnsmul_core::common::tracing::{debug, error, info, info_span, Instrument};
use std::fmt::{self, Display, Formatter};

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Phases of one process. A process only ever moves forward.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ProcessState {
    Init,
    Place,
    Compute,
    Reduce,
    Gather,
    Emit,
    Done,
    Shutdown,
}

impl Display for ProcessState {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Place => "place",
            Self::Compute => "compute",
            Self::Reduce => "reduce",
            Self::Gather => "gather",
            Self::Emit => "emit",
            Self::Done => "done",
            Self::Shutdown => "shutdown",
        };

        formatter.write_str(name)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// One process of the grid: places its blocks, multiplies them, takes part in the reduction of
/// its group and, on the coordinator, assembles the product.
#[derive(Debug)]
pub struct ProcessTask<C, S>
where
    C: Communicator,
    S: MatrixSource,
{
    communicator: C,
    configuration: RunConfiguration,
    left: S,
    right: S,
    state: ProcessState,
}

impl<C, S> ProcessTask<C, S>
where
    C: Communicator,
    S: MatrixSource,
{
    pub fn new(communicator: C, configuration: RunConfiguration, left: S, right: S) -> Self {
        Self {
            communicator,
            configuration,
            left,
            right,
            state: ProcessState::Init,
        }
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Runs every phase to completion. Only the coordinator writes to `output`; every process
    /// gets it back on success.
    pub async fn run<W>(self, output: W) -> Result<W, RunError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let rank = self.communicator.rank();

        async move {
            info!("Started in a world of {} processes", self.communicator.size());

            let result = self.run_phases(output).await;

            match &result {
                Ok(_) => info!("Finished"),
                Err(error) => error!("{}", error),
            }

            result
        }
        .instrument(info_span!("process", rank))
        .await
    }

    async fn run_phases<W>(mut self, output: W) -> Result<W, RunError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let topology = Topology::from_configuration(self.communicator.size(), &self.configuration)?;
        let process_id = ProcessId::from(self.communicator.rank());

        if !topology.contains(process_id) {
            return Err(ConfigurationError::UnknownRank {
                rank: process_id.into(),
                process_count: topology.process_count(),
            }
            .into());
        }

        let matrix_size = discover_matrix_size(&self.left).await?;
        let right_size = discover_matrix_size(&self.right).await?;

        if matrix_size != right_size {
            return Err(SourceError::SizeMismatch {
                left: matrix_size,
                right: right_size,
            }
            .into());
        }

        let partition = topology.partition(matrix_size)?;

        self.transition(ProcessState::Place);

        let left = place(&self.left, Operand::A, &topology, &partition, process_id).await?;
        let right = place(&self.right, Operand::B, &topology, &partition, process_id).await?;

        self.transition(ProcessState::Compute);

        let strategy = MultiplyStrategy::select(
            partition.part_size(),
            self.configuration.recursive_threshold(),
        );
        let partial = strategy.multiply(&left, &right);

        self.transition(ProcessState::Reduce);

        let output = match reduce(&mut self.communicator, &topology, &partition, partial).await? {
            Some(result) if process_id == topology.coordinator() => {
                self.transition(ProcessState::Gather);

                let mut writer = RowWriter::new(output);
                gather(
                    &mut self.communicator,
                    &topology,
                    &partition,
                    &result,
                    &mut writer,
                )
                .await?;

                self.transition(ProcessState::Emit);

                let rows = writer.rows_written();
                let output = writer.finish().await?;

                info!("Emitted {}x{} product in {} rows", matrix_size, matrix_size, rows);

                output
            }
            Some(result) => {
                scatter_rows(&mut self.communicator, &topology, result).await?;

                output
            }
            None => output,
        };

        self.transition(ProcessState::Done);
        self.transition(ProcessState::Shutdown);

        self.communicator.finalize().await?;

        Ok(output)
    }

    fn transition(&mut self, state: ProcessState) {
        debug_assert!(
            state > self.state,
            "process cannot move from {} back to {}",
            self.state,
            state
        );

        debug!("{} -> {}", self.state, state);

        self.state = state;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Matrix, MemoryMatrixSource};
    use dnsmul_core::communicator::CommunicationError;
    use dnsmul_core::local::local_world;
    use dnsmul_core::message::Tag;
    use std::time::Duration;
    use tokio::time::timeout;

    #[test]
    fn state_order() {
        assert!(ProcessState::Init < ProcessState::Place);
        assert!(ProcessState::Reduce < ProcessState::Gather);
        assert!(ProcessState::Done < ProcessState::Shutdown);
    }

    #[test]
    fn new_starts_in_init() {
        let communicator = local_world(1).pop().unwrap();
        let source = MemoryMatrixSource::from("1\n");
        let task = ProcessTask::new(
            communicator,
            RunConfiguration::default(),
            source.clone(),
            source,
        );

        assert_eq!(task.state(), ProcessState::Init);
    }

    #[tokio::test]
    async fn unsupported_process_count_without_messaging() {
        let source = MemoryMatrixSource::from(&Matrix::identity(4));

        // Each rank in turn stays idle and watches for anything the others send it.
        for observer_rank in 0..16 {
            let mut world = local_world(16);
            let mut observer = world.remove(observer_rank);

            for communicator in world {
                let task = ProcessTask::new(
                    communicator,
                    RunConfiguration::default(),
                    source.clone(),
                    source.clone(),
                );

                // A receive would wait for a peer that never runs.
                let result = timeout(Duration::from_secs(5), task.run(Vec::new()))
                    .await
                    .unwrap();

                assert!(matches!(
                    result,
                    Err(RunError::Configuration(
                        ConfigurationError::UnsupportedProcessCount {
                            process_count: 16,
                            ..
                        }
                    ))
                ));
            }

            for rank in (0..16).filter(|rank| *rank != observer_rank) {
                assert!(matches!(
                    observer.receive(rank, Tag::PARTIAL_PRODUCT, 0).await,
                    Err(CommunicationError::Closed(closed)) if closed == rank
                ));
            }
        }
    }

    #[tokio::test]
    async fn size_mismatch() {
        let left = MemoryMatrixSource::from(&Matrix::identity(4));
        let right = MemoryMatrixSource::from(&Matrix::identity(2));

        for communicator in local_world(8) {
            let task = ProcessTask::new(
                communicator,
                RunConfiguration::default(),
                left.clone(),
                right.clone(),
            );

            assert!(matches!(
                task.run(Vec::new()).await,
                Err(RunError::Source(SourceError::SizeMismatch { left: 4, right: 2 }))
            ));
        }
    }

    #[tokio::test]
    async fn indivisible_matrix_size() {
        let source = MemoryMatrixSource::from(&Matrix::identity(3));

        for communicator in local_world(8) {
            let task = ProcessTask::new(
                communicator,
                RunConfiguration::default(),
                source.clone(),
                source.clone(),
            );

            assert!(matches!(
                task.run(Vec::new()).await,
                Err(RunError::Configuration(
                    ConfigurationError::IndivisibleMatrixSize {
                        matrix_size: 3,
                        side: 2
                    }
                ))
            ));
        }
    }
}
