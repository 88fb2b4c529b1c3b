//! Pseudogene calls derived from CDS reconciliation and naming.

use crate::biotype::{BiotypeClassifier, is_exempt_rrna_name};

/// Growth, in bases, past which a reconciled CDS counts as a unitary pseudogene.
pub const UNITARY_GROWTH_LIMIT: i64 = 30;

/// Fraction of the source CDS length at or below which a reconciled CDS counts
/// as a unitary pseudogene.
pub const UNITARY_LENGTH_RATIO: f64 = 0.8;

/// True when the reconciled CDS has changed enough to call the transcript a
/// unitary pseudogene.
///
/// Reconciliation never lengthens a CDS, so the growth clause is inert and the
/// ratio test is the one that decides.
#[must_use]
pub fn is_unitary_pseudogene(reconciled_length: u64, source_length: u64) -> bool {
    if reconciled_length == 0 {
        return false;
    }
    let growth = reconciled_length as i64 - source_length as i64;
    growth > UNITARY_GROWTH_LIMIT
        || reconciled_length as f64 <= UNITARY_LENGTH_RATIO * source_length as f64
}

/// True for an rRNA transcript whose gene is not one of the genuine rRNA loci.
#[must_use]
pub fn is_rrna_pseudogene(
    classifier: &BiotypeClassifier,
    biotype: &str,
    common_name: Option<&str>,
) -> bool {
    classifier.is_rrna(biotype) && !common_name.is_some_and(is_exempt_rrna_name)
}
