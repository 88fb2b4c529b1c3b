//! Frame reconciliation: restores a consistent reading frame across exons by
//! carving short gaps out of the CDS where the projected exon frames disagree
//! with the running frame.

use log::debug;

use crate::frame::Frame;
use crate::interval::GenomicInterval;
use crate::strand::Strand;
use crate::transcript::TranscriptRecord;

/// Output of [`reconcile_frames`], with regions and gaps in genomic order.
#[derive(Debug, Clone, Default)]
pub struct Reconciled {
    pub regions: Vec<GenomicInterval>,
    pub gaps: Vec<GenomicInterval>,
    /// Frame of the first coding exon in transcription direction.
    pub initial_frame: Frame,
}

/// Walks the coding exons 5' to 3' and inserts a gap (at most 2 bases) at the
/// 5' end of every exon whose frame does not match the running frame.
#[must_use]
pub fn reconcile_frames(transcript: &TranscriptRecord, coding: &GenomicInterval) -> Reconciled {
    let strand = transcript.strand();
    let mut expected = Frame::ZERO;
    let mut initial_frame = None;
    let mut regions = Vec::new();
    let mut gaps = Vec::new();

    for (exon, frame) in transcript.exons_in_transcription_order() {
        let Some(part) = exon.intersection(coding) else {
            continue;
        };
        let frame = frame.unwrap_or(expected);
        initial_frame.get_or_insert(frame);

        let shift = u64::from(expected.steps_to(frame)).min(part.len());
        let part = if shift > 0 {
            let (gap, rest) = carve_five_prime(&part, shift, strand);
            debug!(
                "{}: {shift} bp gap at {gap} (expected frame {expected}, exon frame {frame})",
                transcript.id
            );
            gaps.push(gap);
            rest
        } else {
            part
        };

        if !part.is_empty() {
            expected = expected.increment(part.len() as i64);
            regions.push(part);
        }
    }

    regions.sort();
    gaps.sort();
    Reconciled {
        regions,
        gaps,
        initial_frame: initial_frame.unwrap_or_default(),
    }
}

/// Splits `length` bases off the transcriptional 5' end of `part`, returning (gap, remainder).
fn carve_five_prime(
    part: &GenomicInterval,
    length: u64,
    strand: Strand,
) -> (GenomicInterval, GenomicInterval) {
    match strand {
        Strand::Forward => {
            let cut = part.start + length;
            (part.with_bounds(part.start, cut), part.with_bounds(cut, part.stop))
        }
        Strand::Reverse => {
            let cut = part.stop - length;
            (part.with_bounds(cut, part.stop), part.with_bounds(part.start, cut))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::types::fixtures::{coding_attributes, transcript};

    fn bounds(intervals: &[GenomicInterval]) -> Vec<(u64, u64)> {
        intervals.iter().map(|i| (i.start, i.stop)).collect()
    }

    #[test]
    fn in_frame_transcript_has_no_gaps() {
        // 50 + 60 + 40 coding bases with frames following the running total
        let tx = transcript(
            "T1",
            Strand::Forward,
            &[(100, 160, Some(0)), (200, 260, Some(2)), (300, 400, Some(2))],
            (110, 340),
            coding_attributes(),
        );
        let coding = tx.coding_interval().unwrap();
        let result = reconcile_frames(&tx, &coding);
        assert!(result.gaps.is_empty());
        assert_eq!(bounds(&result.regions), vec![(110, 160), (200, 260), (300, 340)]);
        let total: u64 = result.regions.iter().map(GenomicInterval::len).sum();
        assert_eq!(total, tx.source_cds_length());
    }

    #[test]
    fn forward_gap_at_exon_start() {
        // Running frame after 49 bases is 1; the second exon claims frame 2
        let tx = transcript(
            "T1",
            Strand::Forward,
            &[(100, 149, Some(0)), (149, 251, Some(2))],
            (100, 251),
            coding_attributes(),
        );
        let coding = tx.coding_interval().unwrap();
        let result = reconcile_frames(&tx, &coding);
        assert_eq!(bounds(&result.gaps), vec![(149, 150)]);
        assert_eq!(bounds(&result.regions), vec![(100, 149), (150, 251)]);
    }

    #[test]
    fn reverse_gap_at_exon_end() {
        // Transcription starts at 400: first exon 300..400 (100 bases, frame 0 -> 1),
        // second exon claims frame 0 so two bases are carved from its high genomic end.
        let tx = transcript(
            "T1",
            Strand::Reverse,
            &[(100, 200, Some(0)), (300, 400, Some(0))],
            (100, 400),
            coding_attributes(),
        );
        let coding = tx.coding_interval().unwrap();
        let result = reconcile_frames(&tx, &coding);
        assert_eq!(bounds(&result.gaps), vec![(198, 200)]);
        assert_eq!(bounds(&result.regions), vec![(100, 198), (300, 400)]);
    }

    #[test]
    fn correction_can_empty_an_exon() {
        // A single coding base in the second exon is consumed by a two base shift
        let tx = transcript(
            "T1",
            Strand::Forward,
            &[(100, 130, Some(0)), (200, 260, Some(2))],
            (100, 201),
            coding_attributes(),
        );
        let coding = tx.coding_interval().unwrap();
        let result = reconcile_frames(&tx, &coding);
        assert_eq!(bounds(&result.regions), vec![(100, 130)]);
        assert_eq!(bounds(&result.gaps), vec![(200, 201)]);
        assert!(result.gaps.iter().all(|g| g.len() <= 2));
    }

    #[test]
    fn never_lengthens_cds() {
        let tx = transcript(
            "T1",
            Strand::Forward,
            &[(0, 31, Some(1)), (40, 72, Some(0)), (80, 113, Some(1)), (120, 200, Some(2))],
            (0, 200),
            coding_attributes(),
        );
        let coding = tx.coding_interval().unwrap();
        let result = reconcile_frames(&tx, &coding);
        let total: u64 = result.regions.iter().map(GenomicInterval::len).sum();
        assert!(total <= tx.source_cds_length());
        assert!(result.gaps.iter().all(|g| (1..=2).contains(&g.len())));
        assert_eq!(result.initial_frame.value(), 1);
        for gap in &result.gaps {
            assert!(result.regions.iter().all(|r| !r.overlaps(gap)));
        }
    }

    #[test]
    fn exons_without_frame_follow_running_frame() {
        let tx = transcript(
            "T1",
            Strand::Forward,
            &[(0, 50, None), (100, 150, None)],
            (0, 150),
            coding_attributes(),
        );
        let coding = tx.coding_interval().unwrap();
        let result = reconcile_frames(&tx, &coding);
        assert!(result.gaps.is_empty());
        assert_eq!(result.regions.len(), 2);
    }
}
