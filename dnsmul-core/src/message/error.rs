use crate::common::deserialize::DeserializeError;
use crate::common::serialize::SerializeError;
use std::error;
use std::fmt::{self, Display, Formatter};
use std::io;

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub enum MessageError {
    UnexpectedEnd,
    UnexpectedMessage,
    ExpectedMessage,
    TrailingBytes(usize),
    Closed,
    Serialize(SerializeError),
    Deserialize(DeserializeError),
    Io(io::Error),
}

impl error::Error for MessageError {}

impl Display for MessageError {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match self {
            Self::UnexpectedEnd => write!(formatter, "Unexpected end"),
            Self::UnexpectedMessage => write!(formatter, "Unexpected message"),
            Self::ExpectedMessage => write!(formatter, "Expected message"),
            Self::TrailingBytes(count) => {
                write!(formatter, "{count} unexpected bytes after message")
            }
            Self::Closed => write!(formatter, "Message queue closed"),
            Self::Serialize(error) => Display::fmt(error, formatter),
            Self::Deserialize(error) => Display::fmt(error, formatter),
            Self::Io(error) => Display::fmt(error, formatter),
        }
    }
}

impl From<SerializeError> for MessageError {
    fn from(error: SerializeError) -> Self {
        Self::Serialize(error)
    }
}

impl From<DeserializeError> for MessageError {
    fn from(error: DeserializeError) -> Self {
        if error.is_unexpected_end() {
            Self::UnexpectedEnd
        } else {
            Self::Deserialize(error)
        }
    }
}

impl From<io::Error> for MessageError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}
