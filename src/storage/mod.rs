//! Key-value storage and the JSON adapter the managers persist through.

pub mod adapter;
pub mod file;
pub mod kv;

pub use adapter::{PersistentStore, decode_entries, encode_entries};
pub use file::FileStore;
pub use kv::{KeyValueStore, MemoryStore};
