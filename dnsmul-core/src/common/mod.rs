pub mod deserialize;
pub mod serialize;

////////////////////////////////////////////////////////////////////////////////////////////////////

pub use async_trait::async_trait;

////////////////////////////////////////////////////////////////////////////////////////////////////

pub mod runtime {
    pub use tokio::spawn;
    pub use tokio::task::JoinError;
}

////////////////////////////////////////////////////////////////////////////////////////////////////

pub mod future {
    pub use futures::*;
}

////////////////////////////////////////////////////////////////////////////////////////////////////

pub mod io {
    pub use tokio::io::*;
}

////////////////////////////////////////////////////////////////////////////////////////////////////

pub mod fs {
    pub use tokio::fs::*;
}

////////////////////////////////////////////////////////////////////////////////////////////////////

pub mod bytes {
    pub use bytes::*;
}

////////////////////////////////////////////////////////////////////////////////////////////////////

pub mod tracing {
    pub use tracing::*;
}
