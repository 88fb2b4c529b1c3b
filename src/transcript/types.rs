//! Transcript records and their per-transcript attributes.

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::Error;
use crate::frame::Frame;
use crate::interval::GenomicInterval;
use crate::strand::Strand;

/// Attribute keys every transcript row must carry.
pub const REQUIRED_KEYS: [&str; 13] = [
    "transcript_biotype",
    "gene_biotype",
    "source_gene",
    "source_gene_common_name",
    "source_transcript",
    "valid_start",
    "valid_stop",
    "cds_start_completeness",
    "cds_end_completeness",
    "adjusted_coding_start",
    "adjusted_coding_stop",
    "alignment_id",
    "transcript_modes",
];

/// Completeness hint for one genomic end of a CDS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Completeness {
    Complete,
    Incomplete,
    #[default]
    Unknown,
    NotApplicable,
}

impl FromStr for Completeness {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cmpl" | "complete" => Ok(Self::Complete),
            "incmpl" | "incomplete" => Ok(Self::Incomplete),
            "unk" | "unknown" | "" => Ok(Self::Unknown),
            "none" => Ok(Self::NotApplicable),
            _ => Err(Error::Parse(format!("invalid completeness value: '{s}'"))),
        }
    }
}

/// Typed view of a transcript's attribute row.
#[derive(Debug, Clone, Default)]
pub struct TranscriptAttributes {
    pub transcript_biotype: String,
    pub gene_biotype: String,
    pub source_gene: Option<String>,
    pub source_gene_common_name: Option<String>,
    pub source_transcript: Option<String>,
    pub valid_start: bool,
    pub valid_stop: bool,
    pub cds_start_completeness: Completeness,
    pub cds_end_completeness: Completeness,
    pub adjusted_coding_start: Option<u64>,
    pub adjusted_coding_stop: Option<u64>,
    pub alignment_id: String,
    pub transcript_modes: Option<String>,
}

impl TranscriptAttributes {
    /// Builds typed attributes from a raw key/value row.
    pub fn from_row(transcript_id: &str, row: &HashMap<String, String>) -> Result<Self, Error> {
        let get = |key: &str| -> Result<&str, Error> {
            row.get(key).map(|v| v.trim()).ok_or_else(|| {
                Error::Parse(format!(
                    "attribute '{key}' missing for transcript '{transcript_id}'"
                ))
            })
        };
        let context = |e: Error| Error::Parse(format!("{e} (transcript '{transcript_id}')"));

        Ok(Self {
            transcript_biotype: get("transcript_biotype")?.to_string(),
            gene_biotype: get("gene_biotype")?.to_string(),
            source_gene: optional(get("source_gene")?),
            source_gene_common_name: optional(get("source_gene_common_name")?),
            source_transcript: optional(get("source_transcript")?),
            valid_start: parse_bool(get("valid_start")?).map_err(context)?,
            valid_stop: parse_bool(get("valid_stop")?).map_err(context)?,
            cds_start_completeness: get("cds_start_completeness")?.parse().map_err(context)?,
            cds_end_completeness: get("cds_end_completeness")?.parse().map_err(context)?,
            adjusted_coding_start: parse_position(get("adjusted_coding_start")?)
                .map_err(context)?,
            adjusted_coding_stop: parse_position(get("adjusted_coding_stop")?)
                .map_err(context)?,
            alignment_id: get("alignment_id")?.to_string(),
            transcript_modes: optional(get("transcript_modes")?),
        })
    }
}

/// Normalizes placeholder values ("", "None", "NA", "nan") to `None`.
fn optional(value: &str) -> Option<String> {
    match value {
        "" | "None" | "NA" | "nan" => None,
        v => Some(v.to_string()),
    }
}

fn parse_bool(value: &str) -> Result<bool, Error> {
    match value {
        "True" | "true" | "1" => Ok(true),
        "False" | "false" | "0" => Ok(false),
        _ => Err(Error::Parse(format!("invalid boolean: '{value}'"))),
    }
}

fn parse_position(value: &str) -> Result<Option<u64>, Error> {
    optional(value)
        .map(|v| {
            v.parse::<u64>()
                .map_err(|e| Error::Parse(format!("invalid coordinate '{v}': {e}")))
        })
        .transpose()
}

/// A projected transcript: geometry plus attributes.
#[derive(Debug, Clone)]
pub struct TranscriptRecord {
    pub id: String,
    pub gene_id: String,
    pub interval: GenomicInterval,
    /// Exons in ascending genomic order.
    pub exons: Vec<GenomicInterval>,
    /// Frame of each exon's first coding base in transcription direction.
    /// `None` for exons without a coding frame.
    pub exon_frames: Vec<Option<Frame>>,
    pub thick_start: u64,
    pub thick_stop: u64,
    pub attributes: TranscriptAttributes,
}

impl TranscriptRecord {
    #[must_use]
    pub fn strand(&self) -> Strand {
        self.interval.strand
    }

    #[must_use]
    pub fn chromosome(&self) -> &str {
        &self.interval.chromosome
    }

    /// Checks exon geometry: one frame per exon, sorted, disjoint, inside the transcript.
    pub fn validate(&self) -> Result<(), Error> {
        if self.exons.is_empty() {
            return Err(Error::Validation(format!("transcript '{}' has no exons", self.id)));
        }
        if self.exons.len() != self.exon_frames.len() {
            return Err(Error::Validation(format!(
                "transcript '{}' has {} exons but {} exon frames",
                self.id,
                self.exons.len(),
                self.exon_frames.len()
            )));
        }
        for pair in self.exons.windows(2) {
            if pair[1].start < pair[0].stop {
                return Err(Error::Validation(format!(
                    "transcript '{}' has unsorted or overlapping exons at {}",
                    self.id, pair[1].start
                )));
            }
        }
        let (first, last) = (&self.exons[0], &self.exons[self.exons.len() - 1]);
        if first.start < self.interval.start || last.stop > self.interval.stop {
            return Err(Error::Validation(format!(
                "transcript '{}' has exons outside {}",
                self.id, self.interval
            )));
        }
        if self.thick_start > self.thick_stop {
            return Err(Error::Validation(format!(
                "transcript '{}' has coding start {} after coding stop {}",
                self.id, self.thick_start, self.thick_stop
            )));
        }
        Ok(())
    }

    /// Coding bounds as supplied with the geometry, if non-empty.
    #[must_use]
    pub fn source_coding_interval(&self) -> Option<GenomicInterval> {
        (self.thick_start < self.thick_stop)
            .then(|| self.interval.with_bounds(self.thick_start, self.thick_stop))
    }

    /// Coding bounds after any upstream adjustment, if non-empty.
    #[must_use]
    pub fn coding_interval(&self) -> Option<GenomicInterval> {
        let start = self.attributes.adjusted_coding_start.unwrap_or(self.thick_start);
        let stop = self.attributes.adjusted_coding_stop.unwrap_or(self.thick_stop);
        (start < stop).then(|| self.interval.with_bounds(start, stop))
    }

    /// True when the coding bound at the 3' end was moved by the upstream adjustment.
    #[must_use]
    pub fn three_prime_bound_adjusted(&self) -> bool {
        match self.strand() {
            Strand::Forward => self
                .attributes
                .adjusted_coding_stop
                .is_some_and(|stop| stop != self.thick_stop),
            Strand::Reverse => self
                .attributes
                .adjusted_coding_start
                .is_some_and(|start| start != self.thick_start),
        }
    }

    /// Coding length implied by the unadjusted bounds, before any frame correction.
    #[must_use]
    pub fn source_cds_length(&self) -> u64 {
        let Some(coding) = self.source_coding_interval() else {
            return 0;
        };
        self.exons
            .iter()
            .filter_map(|exon| exon.intersection(&coding))
            .map(|part| part.len())
            .sum()
    }

    /// Exons with their frames, 5' to 3' in transcription direction.
    pub fn exons_in_transcription_order(
        &self,
    ) -> Box<dyn Iterator<Item = (&GenomicInterval, Option<Frame>)> + '_> {
        let pairs = self.exons.iter().zip(self.exon_frames.iter().copied());
        if self.strand().is_reverse() {
            Box::new(pairs.rev())
        } else {
            Box::new(pairs)
        }
    }

    /// Lengths of the gaps between consecutive exons, in genomic order.
    #[must_use]
    pub fn intron_lengths(&self) -> Vec<u64> {
        self.exons
            .windows(2)
            .map(|pair| pair[1].start - pair[0].stop)
            .collect()
    }
}
