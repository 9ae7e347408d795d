mod error;

////////////////////////////////////////////////////////////////////////////////////////////////////

pub use error::*;

////////////////////////////////////////////////////////////////////////////////////////////////////

use crate::common::async_trait;
use crate::element::Element;
use crate::message::{Envelope, Tag};
use crate::rank::Rank;

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Point-to-point messaging between a fixed set of processes.
///
/// Sends and receives block the calling process until they complete. Messages from one source
/// to one destination arrive in the order they were sent. Nothing is retried and nothing times
/// out: a receive without a matching send waits forever.
#[async_trait]
pub trait Communicator: Send {
    fn rank(&self) -> Rank;

    fn size(&self) -> usize;

    async fn send(
        &mut self,
        destination: Rank,
        tag: Tag,
        payload: Vec<Element>,
    ) -> Result<(), CommunicationError>;

    /// Receives the next message from `source`, which must carry `tag` and exactly `length`
    /// elements.
    async fn receive(
        &mut self,
        source: Rank,
        tag: Tag,
        length: usize,
    ) -> Result<Vec<Element>, CommunicationError>;

    /// Releases the transport. No message may be sent or received afterwards.
    async fn finalize(self) -> Result<(), CommunicationError>
    where
        Self: Sized;
}

////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) fn check_rank(rank: Rank, size: usize) -> Result<(), CommunicationError> {
    if rank < size {
        Ok(())
    } else {
        Err(CommunicationError::UnknownRank { rank, size })
    }
}

pub(crate) fn open_envelope(
    envelope: Envelope,
    source: Rank,
    tag: Tag,
    length: usize,
) -> Result<Vec<Element>, CommunicationError> {
    let (actual_source, actual_tag, payload) = envelope.into();

    if actual_source != source {
        return Err(CommunicationError::SourceMismatch {
            expected: source,
            actual: actual_source,
        });
    }

    if actual_tag != tag {
        return Err(CommunicationError::TagMismatch {
            source,
            expected: tag,
            actual: actual_tag,
        });
    }

    if payload.len() != length {
        return Err(CommunicationError::LengthMismatch {
            source,
            expected: length,
            actual: payload.len(),
        });
    }

    Ok(payload)
}
