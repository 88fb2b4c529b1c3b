//! CDS modelling for projected transcripts: frame reconciliation, partiality,
//! exon re-splitting and pseudogene calls.

pub mod completeness;
pub mod exon_split;
pub mod pseudogene;
pub mod reconcile;

use crate::interval::GenomicInterval;
use crate::strand::Strand;
use crate::transcript::TranscriptRecord;

use completeness::{CompletenessInputs, resolve_completeness};
use reconcile::reconcile_frames;

/// Working CDS model for one transcript, discarded once its rows are written.
///
/// Regions and gaps are disjoint and in genomic order. Partiality flags are
/// genomic: `start_incomplete` refers to the low coordinate end.
#[derive(Debug, Clone)]
pub struct CdsSpec {
    pub strand: Strand,
    pub regions: Vec<GenomicInterval>,
    pub gaps: Vec<GenomicInterval>,
    pub start_incomplete: bool,
    pub end_incomplete: bool,
}

impl CdsSpec {
    /// Reconciles the transcript's coding exons and resolves partiality.
    /// Returns `None` for transcripts without a coding interval.
    #[must_use]
    pub fn from_transcript(transcript: &TranscriptRecord) -> Option<Self> {
        let coding = transcript.coding_interval()?;
        let reconciled = reconcile_frames(transcript, &coding);
        let length = reconciled.regions.iter().map(GenomicInterval::len).sum();
        let ends = resolve_completeness(&CompletenessInputs::for_transcript(
            transcript,
            reconciled.initial_frame,
            length,
        ));

        Some(Self {
            strand: transcript.strand(),
            regions: reconciled.regions,
            gaps: reconciled.gaps,
            start_incomplete: ends.start_incomplete,
            end_incomplete: ends.end_incomplete,
        })
    }

    #[must_use]
    pub fn cds_length(&self) -> u64 {
        self.regions.iter().map(GenomicInterval::len).sum()
    }

    /// `(first region start, last region stop)`, or `None` if nothing survived.
    #[must_use]
    pub fn span(&self) -> Option<(u64, u64)> {
        match (self.regions.first(), self.regions.last()) {
            (Some(first), Some(last)) => Some((first.start, last.stop)),
            _ => None,
        }
    }
}
