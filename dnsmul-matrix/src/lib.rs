mod block;
mod configuration;
mod error;
mod gather;
mod matrix;
mod multiply;
mod output;
mod placement;
mod reduce;
mod source;
mod task;
mod topology;
mod world;

////////////////////////////////////////////////////////////////////////////////////////////////////

pub use block::*;
pub use configuration::*;
pub use error::*;
pub use gather::*;
pub use matrix::*;
pub use multiply::*;
pub use output::*;
pub use placement::*;
pub use reduce::*;
pub use source::*;
pub use task::*;
pub use topology::*;
pub use world::*;
