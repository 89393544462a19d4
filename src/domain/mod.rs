//! Domain logic - pure version and commit rules independent of any host

pub mod commit;
pub mod tag;
pub mod version;

pub use commit::{ClassifiedCommit, CommitType, RawCommit};
pub use tag::Tag;
pub use version::{Identifier, IncrementKind};
