pub mod source;
pub mod types;

pub use source::{load_candidates, read_document, Document, SourceError};
pub use types::CandidateRecord;
