use crate::element::Element;
use crate::rank::Rank;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Constant channel tag. Messages are paired by (source, destination) order, the tag only
/// guards against a phase reading another phase's traffic.
#[derive(Copy, Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Tag(u16);

impl Display for Tag {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        self.0.fmt(formatter)
    }
}

impl From<u16> for Tag {
    fn from(value: u16) -> Self {
        Self::new(value)
    }
}

impl From<Tag> for u16 {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

impl Tag {
    pub const PARTIAL_PRODUCT: Self = Self::new(1);
    pub const RESULT_ROW: Self = Self::new(2);

    pub const fn new(value: u16) -> Self {
        Self(value)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Envelope {
    source: Rank,
    tag: Tag,
    payload: Vec<Element>,
}

impl From<Envelope> for (Rank, Tag, Vec<Element>) {
    fn from(envelope: Envelope) -> Self {
        (envelope.source, envelope.tag, envelope.payload)
    }
}

impl Envelope {
    pub fn new(source: Rank, tag: Tag, payload: Vec<Element>) -> Self {
        Self {
            source,
            tag,
            payload,
        }
    }

    pub fn source(&self) -> Rank {
        self.source
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn payload(&self) -> &[Element] {
        &self.payload
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HelloMessage {
    rank: Rank,
}

impl From<HelloMessage> for (Rank,) {
    fn from(message: HelloMessage) -> Self {
        (message.rank,)
    }
}

impl HelloMessage {
    pub fn new(rank: Rank) -> Self {
        Self { rank }
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PeerMessage {
    Hello(HelloMessage),
    Envelope(Envelope),
}

impl From<HelloMessage> for PeerMessage {
    fn from(message: HelloMessage) -> Self {
        Self::Hello(message)
    }
}

impl From<Envelope> for PeerMessage {
    fn from(envelope: Envelope) -> Self {
        Self::Envelope(envelope)
    }
}
