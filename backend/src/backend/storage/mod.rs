//! # Storage Module
//!
//! Handles all data persistence for the tracker.
//!
//! The domain layer only sees the [`GirlStorage`] and [`EntryStorage`] traits,
//! so the backend can be swapped without touching services or aggregation.
//! Both backends enforce the girl reference of an entry and the delete
//! cascade inside the store, under one lock, so no entry can outlive its girl.
//!
//! ## Backends
//!
//! - **csv**: files under a data directory. Girls live in `girls.yaml`,
//!   entries in `entries.csv`. Writes go to a temp file and are renamed into
//!   place.
//! - **memory**: in-process vectors, for tests and embedders that do not
//!   want anything on disk.

pub mod csv;
pub mod memory;
pub mod traits;

pub use self::csv::CsvConnection;
pub use self::memory::MemoryConnection;
pub use traits::{Connection, DeletedCounts, EntryStorage, GirlStorage};
