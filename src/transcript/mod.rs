//! Transcript and gene data model.

pub mod gene;
pub mod types;

pub use gene::{GeneBuilder, GeneRecord};
pub use types::{Completeness, TranscriptAttributes, TranscriptRecord};
