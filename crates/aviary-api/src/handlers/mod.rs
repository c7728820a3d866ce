pub mod ingest;
pub mod media_delete;
pub mod search;
pub mod tag_edit;
