use crate::message::{MessageError, Tag};
use crate::rank::Rank;
use std::error;
use std::fmt::{self, Display, Formatter};
use std::io;

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub enum CommunicationError {
    UnknownRank {
        rank: Rank,
        size: usize,
    },
    Closed(Rank),
    SourceMismatch {
        expected: Rank,
        actual: Rank,
    },
    TagMismatch {
        source: Rank,
        expected: Tag,
        actual: Tag,
    },
    LengthMismatch {
        source: Rank,
        expected: usize,
        actual: usize,
    },
    DuplicatePeer(Rank),
    Message(MessageError),
    Io(io::Error),
}

impl error::Error for CommunicationError {}

impl Display for CommunicationError {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match self {
            Self::UnknownRank { rank, size } => {
                write!(formatter, "Rank {rank} is outside of a world of size {size}")
            }
            Self::Closed(rank) => write!(formatter, "Channel to rank {rank} is closed"),
            Self::SourceMismatch { expected, actual } => write!(
                formatter,
                "Expected message from rank {expected}, received one from rank {actual}"
            ),
            Self::TagMismatch {
                source,
                expected,
                actual,
            } => write!(
                formatter,
                "Expected tag {expected} from rank {source}, received tag {actual}"
            ),
            Self::LengthMismatch {
                source,
                expected,
                actual,
            } => write!(
                formatter,
                "Expected {expected} elements from rank {source}, received {actual}"
            ),
            Self::DuplicatePeer(rank) => write!(formatter, "Rank {rank} connected twice"),
            Self::Message(error) => Display::fmt(error, formatter),
            Self::Io(error) => Display::fmt(error, formatter),
        }
    }
}

impl From<MessageError> for CommunicationError {
    fn from(error: MessageError) -> Self {
        Self::Message(error)
    }
}

impl From<io::Error> for CommunicationError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}
