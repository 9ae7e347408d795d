use crate::common::async_trait;
use crate::communicator::{check_rank, open_envelope, CommunicationError, Communicator};
use crate::element::Element;
use crate::message::{message_queue, Envelope, MessageQueueReceiver, MessageQueueSender, Tag};
use crate::rank::Rank;
use tracing::trace;

////////////////////////////////////////////////////////////////////////////////////////////////////

const LOCAL_QUEUE_CAPACITY: usize = 16;

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Creates `size` communicators connected by one bounded queue per ordered pair of ranks. Each
/// communicator is meant to be moved into its own task.
pub fn local_world(size: usize) -> Vec<LocalCommunicator> {
    let mut senders = (0..size)
        .map(|_| Vec::with_capacity(size))
        .collect::<Vec<_>>();
    let mut receivers = (0..size)
        .map(|_| Vec::with_capacity(size))
        .collect::<Vec<_>>();

    for source in senders.iter_mut() {
        for destination in receivers.iter_mut() {
            let (sender, receiver) = message_queue(LOCAL_QUEUE_CAPACITY);
            source.push(sender);
            destination.push(receiver);
        }
    }

    senders
        .into_iter()
        .zip(receivers)
        .enumerate()
        .map(|(rank, (senders, receivers))| LocalCommunicator::new(rank, senders, receivers))
        .collect()
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub struct LocalCommunicator {
    rank: Rank,
    senders: Vec<MessageQueueSender<Envelope>>,
    receivers: Vec<MessageQueueReceiver<Envelope>>,
}

#[async_trait]
impl Communicator for LocalCommunicator {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.senders.len()
    }

    async fn send(
        &mut self,
        destination: Rank,
        tag: Tag,
        payload: Vec<Element>,
    ) -> Result<(), CommunicationError> {
        check_rank(destination, self.size())?;

        trace!(
            "{} -> {} tag {} with {} elements",
            self.rank,
            destination,
            tag,
            payload.len()
        );

        self.senders[destination]
            .send(Envelope::new(self.rank, tag, payload))
            .await
            .map_err(|_| CommunicationError::Closed(destination))
    }

    async fn receive(
        &mut self,
        source: Rank,
        tag: Tag,
        length: usize,
    ) -> Result<Vec<Element>, CommunicationError> {
        check_rank(source, self.size())?;

        let envelope = self.receivers[source]
            .receive()
            .await
            .ok_or(CommunicationError::Closed(source))?;

        trace!("{} <- {} tag {}", self.rank, source, envelope.tag());

        open_envelope(envelope, source, tag, length)
    }

    async fn finalize(self) -> Result<(), CommunicationError>
    where
        Self: Sized,
    {
        trace!("{} finalized", self.rank);

        Ok(())
    }
}

impl LocalCommunicator {
    fn new(
        rank: Rank,
        senders: Vec<MessageQueueSender<Envelope>>,
        receivers: Vec<MessageQueueReceiver<Envelope>>,
    ) -> Self {
        Self {
            rank,
            senders,
            receivers,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
