pub mod index;
pub mod media;

pub use index::SpeciesEntry;
pub use media::{MediaKind, MediaRecord, TagCounts};
