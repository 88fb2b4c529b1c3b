//! Error types for the annotbl library.

use thiserror::Error;

/// Errors that can occur while loading or converting annotations.
///
/// Every variant is fatal for the run: a conversion either completes or
/// aborts without partial output.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A parse error occurred while reading input data.
    #[error("{0}")]
    Parse(String),

    /// A validation constraint was violated.
    #[error("{0}")]
    Validation(String),

    /// The same transcript id was added to a gene twice.
    #[error("duplicate transcript '{transcript_id}' in gene '{gene_id}'")]
    DuplicateTranscript {
        gene_id: String,
        transcript_id: String,
    },

    /// No attribute row exists for a transcript.
    #[error("no attribute row for transcript '{0}'")]
    MissingAttributes(String),

    /// A biotype is absent from the classification tables.
    #[error("unrecognized biotype: '{0}'")]
    UnknownBiotype(String),

    /// The static classification tables contradict each other.
    #[error("inconsistent biotype tables: {0}")]
    InconsistentTables(String),
}
