pub mod common;
pub mod communicator;
pub mod local;
pub mod message;
pub mod socket;

////////////////////////////////////////////////////////////////////////////////////////////////////

pub mod element {
    /// Fixed-width matrix element. Arithmetic on elements wraps on overflow.
    pub type Element = i64;
}

////////////////////////////////////////////////////////////////////////////////////////////////////

pub mod rank {
    pub type Rank = usize;
}
