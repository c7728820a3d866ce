//! Aviary Index Library
//!
//! The index maintainer: the one component that writes the Inverted Index
//! and Alias Map, deriving both deterministically from the Primary Store.
//! Upsert, bulk tag edit, and delete live in `maintainer`; the search side
//! (read-only over the Inverted Index) lives in `search`.

pub mod maintainer;
pub mod search;

pub use maintainer::{
    BulkEditOp, DeleteItemResult, EditItemResult, IndexMaintainer, UpsertOutcome, UpsertRequest,
};
