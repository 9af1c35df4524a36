mod dedup_ledger;
mod role_resolver;
mod snapshot_differ;
mod snapshot_parser;

pub use dedup_ledger::*;
pub use role_resolver::*;
pub use snapshot_differ::*;
pub use snapshot_parser::*;
