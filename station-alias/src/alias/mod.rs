//! Station alias resolution.
//!
//! Maps a (pool code, station name) pair to an operator-assigned alias. The
//! in-memory index answers lookups; the store holds the truth and is written
//! before the index on every change.

mod error;
mod index;
mod resolver;

pub use error::ResolverError;
pub use index::AliasIndex;
pub use resolver::AliasResolver;
