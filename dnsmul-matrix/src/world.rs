use crate::{MatrixSource, ProcessTask, RunConfiguration, RunError, Topology};
use dnsmul_core::common::io::{sink, AsyncWrite};
use dnsmul_core::common::runtime::spawn;
use dnsmul_core::common::tracing::error;
use dnsmul_core::local::local_world;

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Runs all `process_count` processes as separate tasks of this OS process, connected by a
/// local world. The coordinator writes the product to `output`.
///
/// Every process checks the process count on its own, so an unsupported count fails in every
/// task. The first error in rank order is returned.
pub async fn run_local<S, W>(
    process_count: usize,
    configuration: RunConfiguration,
    left: S,
    right: S,
    output: W,
) -> Result<W, RunError>
where
    S: MatrixSource + Clone + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let mut communicators = local_world(process_count).into_iter();

    let coordinator = match communicators.next() {
        Some(communicator) => communicator,
        None => {
            if let Err(error) = Topology::from_configuration(process_count, &configuration) {
                error!("{}", error);
                return Err(error.into());
            }

            return Ok(output);
        }
    };

    let coordinator = spawn(
        ProcessTask::new(
            coordinator,
            configuration.clone(),
            left.clone(),
            right.clone(),
        )
        .run(output),
    );

    let handles = communicators
        .map(|communicator| {
            spawn(
                ProcessTask::new(communicator, configuration.clone(), left.clone(), right.clone())
                    .run(sink()),
            )
        })
        .collect::<Vec<_>>();

    let mut result = coordinator.await?;

    for handle in handles {
        if let Err(error) = handle.await? {
            if result.is_ok() {
                result = Err(error);
            }
        }
    }

    result
}

////////////////////////////////////////////////////////////////////////////////////////////////////
