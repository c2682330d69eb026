pub mod record;

pub use record::{FileRecordStore, MemoryRecordStore, RecordStore};
