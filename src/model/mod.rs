//! Entries, the collections that hold them, and the pure transitions
//! managers apply to those collections.

mod collection;
mod entry;
pub mod outcome;

pub use collection::{ItemCollection, SortDirection};
pub use entry::{Candidate, Entry};
pub use outcome::{CollectionKind, Outcome, Transition};
