//! 5'/3' partiality of a reconciled CDS.

use crate::frame::Frame;
use crate::strand::Strand;
use crate::transcript::{Completeness, TranscriptRecord};

/// Everything the completeness decision depends on.
#[derive(Debug, Clone, Copy)]
pub struct CompletenessInputs {
    pub strand: Strand,
    pub initial_frame: Frame,
    pub cds_length: u64,
    pub valid_start: bool,
    pub valid_stop: bool,
    /// Hint for the low genomic end.
    pub start_hint: Completeness,
    /// Hint for the high genomic end.
    pub end_hint: Completeness,
    pub three_prime_adjusted: bool,
}

impl CompletenessInputs {
    #[must_use]
    pub fn for_transcript(
        transcript: &TranscriptRecord,
        initial_frame: Frame,
        cds_length: u64,
    ) -> Self {
        let attrs = &transcript.attributes;
        Self {
            strand: transcript.strand(),
            initial_frame,
            cds_length,
            valid_start: attrs.valid_start,
            valid_stop: attrs.valid_stop,
            start_hint: attrs.cds_start_completeness,
            end_hint: attrs.cds_end_completeness,
            three_prime_adjusted: transcript.three_prime_bound_adjusted(),
        }
    }
}

/// Partiality in genomic terms: `start` is the low coordinate end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartialEnds {
    pub start_incomplete: bool,
    pub end_incomplete: bool,
}

/// Decides which CDS ends are incomplete.
///
/// The 5' end is incomplete when the first coding exon is not in frame 0, the
/// start codon is invalid, or the hint for that genomic end says so. The 3' end
/// is incomplete when the length is not a whole number of codons or its hint
/// says so, unless the stop codon is valid or the 3' bound was moved to reach one.
#[must_use]
pub fn resolve_completeness(inputs: &CompletenessInputs) -> PartialEnds {
    let (five_prime_hint, three_prime_hint) = match inputs.strand {
        Strand::Forward => (inputs.start_hint, inputs.end_hint),
        Strand::Reverse => (inputs.end_hint, inputs.start_hint),
    };

    let five_prime_incomplete = inputs.initial_frame != Frame::ZERO
        || five_prime_hint == Completeness::Incomplete
        || !inputs.valid_start;

    let mut three_prime_incomplete =
        inputs.cds_length % 3 != 0 || three_prime_hint == Completeness::Incomplete;
    if inputs.valid_stop || inputs.three_prime_adjusted {
        three_prime_incomplete = false;
    }

    match inputs.strand {
        Strand::Forward => PartialEnds {
            start_incomplete: five_prime_incomplete,
            end_incomplete: three_prime_incomplete,
        },
        Strand::Reverse => PartialEnds {
            start_incomplete: three_prime_incomplete,
            end_incomplete: five_prime_incomplete,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(strand: Strand) -> CompletenessInputs {
        CompletenessInputs {
            strand,
            initial_frame: Frame::ZERO,
            cds_length: 300,
            valid_start: true,
            valid_stop: true,
            start_hint: Completeness::Complete,
            end_hint: Completeness::Complete,
            three_prime_adjusted: false,
        }
    }

    #[test]
    fn complete_cds() {
        assert_eq!(resolve_completeness(&complete(Strand::Forward)), PartialEnds::default());
        assert_eq!(resolve_completeness(&complete(Strand::Reverse)), PartialEnds::default());
    }

    #[test]
    fn nonzero_initial_frame_marks_five_prime() {
        let mut inputs = complete(Strand::Forward);
        inputs.initial_frame = Frame::ZERO.increment(1);
        assert!(resolve_completeness(&inputs).start_incomplete);

        inputs.strand = Strand::Reverse;
        let ends = resolve_completeness(&inputs);
        assert!(ends.end_incomplete);
        assert!(!ends.start_incomplete);
    }

    #[test]
    fn partial_codon_marks_three_prime_unless_stop_valid() {
        let mut inputs = complete(Strand::Forward);
        inputs.cds_length = 301;
        assert!(!resolve_completeness(&inputs).end_incomplete);

        inputs.valid_stop = false;
        assert!(resolve_completeness(&inputs).end_incomplete);

        inputs.strand = Strand::Reverse;
        assert!(resolve_completeness(&inputs).start_incomplete);
    }

    #[test]
    fn hints_apply_to_genomic_ends() {
        let mut inputs = complete(Strand::Reverse);
        inputs.valid_stop = false;
        inputs.start_hint = Completeness::Incomplete;
        // On the reverse strand the low end is the 3' end
        let ends = resolve_completeness(&inputs);
        assert!(ends.start_incomplete);
        assert!(!ends.end_incomplete);

        inputs.start_hint = Completeness::Complete;
        inputs.end_hint = Completeness::Incomplete;
        let ends = resolve_completeness(&inputs);
        assert!(!ends.start_incomplete);
        assert!(ends.end_incomplete);
    }

    #[test]
    fn invalid_start_codon() {
        let mut inputs = complete(Strand::Reverse);
        inputs.valid_start = false;
        assert!(resolve_completeness(&inputs).end_incomplete);
    }

    #[test]
    fn adjusted_three_prime_bound_forces_complete() {
        let mut inputs = complete(Strand::Forward);
        inputs.valid_stop = false;
        inputs.cds_length = 302;
        inputs.end_hint = Completeness::Incomplete;
        inputs.three_prime_adjusted = true;
        assert!(!resolve_completeness(&inputs).end_incomplete);
    }

    #[test]
    fn stop_override_leaves_five_prime_alone() {
        let mut inputs = complete(Strand::Forward);
        inputs.valid_start = false;
        let ends = resolve_completeness(&inputs);
        assert!(ends.start_incomplete);
        assert!(!ends.end_incomplete);
    }
}
