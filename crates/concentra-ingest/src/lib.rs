//! # concentra-ingest
//! Record loaders and alias tables for the Concentra metrics engine.

pub mod aliases;
pub mod memory;
pub mod snapshot;

pub use aliases::AliasTable;
pub use memory::MemoryLoader;
pub use snapshot::{NetworkSnapshot, SnapshotLoader};
