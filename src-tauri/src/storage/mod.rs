pub mod paths;
pub mod records;

pub use paths::MarketPaths;
pub use records::{MintedRecord, RecordEntry, RecordStore};
