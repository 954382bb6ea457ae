//! # blogsmith-storage
//!
//! Object-store persistence for Blogsmith.
//!
//! A finished document is written exactly once under a key that is a
//! deterministic, injective function of the request id and the creation
//! time. Failures surface as storage errors; there is no internal retry and
//! no read path.

mod store;
mod writer;

pub use store::{HttpObjectStore, ObjectStore};
pub use writer::{storage_key, StorageWriter};
