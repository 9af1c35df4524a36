mod config;
mod error;
mod relay;
mod session;
mod snapshot;
mod store;

pub use config::*;
pub use error::*;
pub use relay::*;
pub use session::*;
pub use snapshot::*;
pub use store::*;

pub use tandem_core::model;
