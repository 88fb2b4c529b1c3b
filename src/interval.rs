//! Half-open genomic intervals.

use std::cmp::Ordering;
use std::fmt;

use crate::strand::Strand;

/// An immutable `[start, stop)` interval on one strand of a chromosome.
///
/// Coordinates are 0-based and half-open. Equality and ordering consider
/// only `(start, stop)`.
#[derive(Debug, Clone)]
pub struct GenomicInterval {
    pub chromosome: String,
    pub start: u64,
    pub stop: u64,
    pub strand: Strand,
}

impl GenomicInterval {
    /// Creates an interval, swapping the bounds if given in reverse order.
    #[must_use]
    pub fn new(chromosome: impl Into<String>, start: u64, stop: u64, strand: Strand) -> Self {
        let (start, stop) = if start <= stop {
            (start, stop)
        } else {
            (stop, start)
        };
        Self {
            chromosome: chromosome.into(),
            start,
            stop,
            strand,
        }
    }

    #[must_use]
    pub fn len(&self) -> u64 {
        self.stop - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.stop
    }

    /// A copy of this interval with new bounds on the same chromosome and strand.
    #[must_use]
    pub fn with_bounds(&self, start: u64, stop: u64) -> Self {
        Self::new(self.chromosome.clone(), start, stop, self.strand)
    }

    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.chromosome == other.chromosome && self.start < other.stop && other.start < self.stop
    }

    /// The overlapping part of two intervals, or `None` if they do not overlap.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.overlaps(other) {
            return None;
        }
        Some(self.with_bounds(self.start.max(other.start), self.stop.min(other.stop)))
    }
}

impl PartialEq for GenomicInterval {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.stop == other.stop
    }
}

impl Eq for GenomicInterval {}

impl PartialOrd for GenomicInterval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GenomicInterval {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.start, self.stop).cmp(&(other.start, other.stop))
    }
}

impl fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}({})", self.chromosome, self.start, self.stop, self.strand)
    }
}
