//! NCBI five-column feature table rows.
//!
//! A table is a sequence header followed by feature rows (coordinates and a
//! feature key, then coordinate-only continuation rows) and qualifier rows.
//! Coordinates are written 1-based and inclusive; minus strand features list
//! the high coordinate first. `<` and `>` mark partial ends.

pub mod writer;

use std::fmt;

use crate::interval::GenomicInterval;

pub use writer::FeatureWriter;

/// Feature key whose adjacent regions are never merged.
pub const CDS_KEY: &str = "CDS";

/// Printed coordinates of one feature region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub first: u64,
    pub second: u64,
    pub first_partial: bool,
    pub second_partial: bool,
}

impl Location {
    /// Converts a half-open 0-based interval, swapping the columns on the minus strand.
    #[must_use]
    pub fn from_interval(interval: &GenomicInterval) -> Self {
        let (first, second) = if interval.strand.is_reverse() {
            (interval.stop, interval.start + 1)
        } else {
            (interval.start + 1, interval.stop)
        };
        Self {
            first,
            second,
            first_partial: false,
            second_partial: false,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first_marker = if self.first_partial { "<" } else { "" };
        let second_marker = if self.second_partial { ">" } else { "" };
        write!(
            f,
            "{first_marker}{}\t{second_marker}{}",
            self.first, self.second
        )
    }
}

/// One line of a feature table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Sequence(String),
    Feature {
        location: Location,
        key: Option<String>,
    },
    Qualifier {
        key: String,
        value: Option<String>,
    },
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequence(name) => write!(f, ">Features {name}"),
            Self::Feature {
                location,
                key: Some(key),
            } => write!(f, "{location}\t{key}"),
            Self::Feature { location, key: None } => write!(f, "{location}"),
            Self::Qualifier { key, value: Some(value) } => write!(f, "\t\t\t{key}\t{value}"),
            Self::Qualifier { key, value: None } => write!(f, "\t\t\t{key}"),
        }
    }
}

/// An ordered run of rows, built without touching any output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureBlock {
    rows: Vec<Row>,
}

impl FeatureBlock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_sequence(&mut self, name: &str) {
        self.rows.push(Row::Sequence(name.to_string()));
    }

    /// Appends a feature spanning `regions`.
    ///
    /// Touching regions are merged except for CDS features. `start_incomplete`
    /// and `end_incomplete` refer to the low and high genomic ends.
    pub fn write_feature(
        &mut self,
        regions: &[GenomicInterval],
        key: &str,
        start_incomplete: bool,
        end_incomplete: bool,
    ) {
        let Some(strand) = regions.first().map(|r| r.strand) else {
            return;
        };

        let mut regions = if key == CDS_KEY {
            let mut sorted = regions.to_vec();
            sorted.sort();
            sorted
        } else {
            merge_touching(regions)
        };

        let (first_incomplete, last_incomplete) = if strand.is_reverse() {
            regions.sort_by(|a, b| b.stop.cmp(&a.stop));
            (end_incomplete, start_incomplete)
        } else {
            (start_incomplete, end_incomplete)
        };

        let last = regions.len() - 1;
        for (i, region) in regions.iter().enumerate() {
            let mut location = Location::from_interval(region);
            location.first_partial = i == 0 && first_incomplete;
            location.second_partial = i == last && last_incomplete;
            self.rows.push(Row::Feature {
                location,
                key: (i == 0).then(|| key.to_string()),
            });
        }
    }

    pub fn write_qualifier(&mut self, key: &str, value: Option<&str>) {
        self.rows.push(Row::Qualifier {
            key: key.to_string(),
            value: value.map(str::to_string),
        });
    }

    pub fn write_note(&mut self, text: &str) {
        self.write_qualifier("note", Some(text));
    }

    /// Moves all rows of `other` to the end of this block.
    pub fn append(&mut self, other: &mut FeatureBlock) {
        self.rows.append(&mut other.rows);
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn take_rows(&mut self) -> Vec<Row> {
        std::mem::take(&mut self.rows)
    }
}

/// Sorts by start and joins regions where one stops exactly where the next starts.
fn merge_touching(regions: &[GenomicInterval]) -> Vec<GenomicInterval> {
    let mut sorted = regions.to_vec();
    sorted.sort();
    let mut merged: Vec<GenomicInterval> = Vec::with_capacity(sorted.len());
    for region in sorted {
        match merged.last_mut() {
            Some(prev) if prev.stop == region.start => {
                *prev = prev.with_bounds(prev.start, region.stop);
            }
            _ => merged.push(region),
        }
    }
    merged
}

/// All rows for one gene: the gene feature and then each transcript's features.
///
/// The gene block is only known once every transcript has been converted, but
/// it is written first.
#[derive(Debug, Clone, Default)]
pub struct GeneFeatures {
    pub gene: FeatureBlock,
    pub transcripts: Vec<FeatureBlock>,
}

impl GeneFeatures {
    /// Rows in output order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.gene
            .rows()
            .iter()
            .chain(self.transcripts.iter().flat_map(|t| t.rows().iter()))
    }
}
