//! Re-splits exons around interior frame-correction gaps.

use crate::interval::GenomicInterval;

/// Removes every gap that lies strictly inside the CDS span from the exons.
///
/// `cds_span` is `(first region start, last region stop)`. A gap at or beyond
/// either edge of the span stays part of its exon as untranslated sequence.
#[must_use]
pub fn split_exons_at_gaps(
    exons: &[GenomicInterval],
    gaps: &[GenomicInterval],
    cds_span: Option<(u64, u64)>,
) -> Vec<GenomicInterval> {
    let interior: Vec<&GenomicInterval> = match cds_span {
        Some((span_start, span_stop)) => gaps
            .iter()
            .filter(|gap| !gap.is_empty() && gap.stop > span_start && gap.start < span_stop)
            .collect(),
        None => Vec::new(),
    };

    let mut result = Vec::with_capacity(exons.len() + interior.len());
    for exon in exons {
        let mut pieces = vec![exon.clone()];
        for gap in &interior {
            pieces = pieces
                .into_iter()
                .flat_map(|piece| cut(piece, gap))
                .collect();
        }
        result.extend(pieces);
    }
    result
}

/// The parts of `piece` left after removing `gap`.
fn cut(piece: GenomicInterval, gap: &GenomicInterval) -> Vec<GenomicInterval> {
    if !piece.overlaps(gap) {
        return vec![piece];
    }
    let mut parts = Vec::with_capacity(2);
    if gap.start > piece.start {
        parts.push(piece.with_bounds(piece.start, gap.start));
    }
    if gap.stop < piece.stop {
        parts.push(piece.with_bounds(gap.stop, piece.stop));
    }
    parts
}
