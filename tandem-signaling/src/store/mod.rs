mod memory_store;
mod room_store;

pub use memory_store::*;
pub use room_store::*;
