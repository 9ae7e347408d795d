mod envelope;
mod error;
mod queue;
mod socket;

////////////////////////////////////////////////////////////////////////////////////////////////////

pub use envelope::*;
pub use error::*;
pub use queue::*;
pub use socket::*;
