//! Extended genePred (`genePredExt`) reader.
//!
//! Each row is one transcript: name, chrom, strand, txStart, txEnd, cdsStart,
//! cdsEnd, exonCount, exonStarts, exonEnds, score, name2, cdsStartStat,
//! cdsEndStat, exonFrames. Coordinates are 0-based half-open.

use std::io::{BufRead, BufReader, Read};

use flate2::read::GzDecoder;

use crate::error::Error;
use crate::frame::Frame;
use crate::interval::GenomicInterval;
use crate::strand::Strand;
use crate::transcript::{Completeness, TranscriptAttributes, TranscriptRecord};

const NUM_COLUMNS: usize = 15;

/// One parsed genePredExt row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenePredRow {
    pub name: String,
    pub chromosome: String,
    pub strand: Strand,
    pub tx_start: u64,
    pub tx_end: u64,
    pub cds_start: u64,
    pub cds_end: u64,
    pub exon_starts: Vec<u64>,
    pub exon_ends: Vec<u64>,
    pub gene_name: String,
    pub cds_start_stat: Completeness,
    pub cds_end_stat: Completeness,
    pub exon_frames: Vec<Option<Frame>>,
}

impl GenePredRow {
    /// Attaches attributes, producing a transcript record.
    ///
    /// Completeness hints the attribute table leaves unknown are taken from
    /// the row's `cdsStartStat` and `cdsEndStat`.
    #[must_use]
    pub fn into_transcript(self, mut attributes: TranscriptAttributes) -> TranscriptRecord {
        if attributes.cds_start_completeness == Completeness::Unknown {
            attributes.cds_start_completeness = self.cds_start_stat;
        }
        if attributes.cds_end_completeness == Completeness::Unknown {
            attributes.cds_end_completeness = self.cds_end_stat;
        }

        let interval =
            GenomicInterval::new(self.chromosome.as_str(), self.tx_start, self.tx_end, self.strand);
        let exons = self
            .exon_starts
            .iter()
            .zip(&self.exon_ends)
            .map(|(&start, &end)| interval.with_bounds(start, end))
            .collect();

        TranscriptRecord {
            id: self.name,
            gene_id: self.gene_name,
            interval,
            exons,
            exon_frames: self.exon_frames,
            thick_start: self.cds_start,
            thick_stop: self.cds_end,
            attributes,
        }
    }
}

/// Parse gzip-compressed genePredExt.
pub fn parse_genepred_gz<R: Read>(reader: R) -> Result<Vec<GenePredRow>, Error> {
    let decoder = GzDecoder::new(reader);
    let buf_reader = BufReader::new(decoder);
    parse_genepred(buf_reader)
}

/// Parse genePredExt from a buffered reader. Blank lines and `#` comments are skipped.
pub fn parse_genepred<R: BufRead>(reader: R) -> Result<Vec<GenePredRow>, Error> {
    let mut rows = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = parse_line(&line).map_err(|e| Error::Parse(format!("{e} (line {line_num})")))?;
        rows.push(row);
    }

    Ok(rows)
}

fn parse_line(line: &str) -> Result<GenePredRow, Error> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < NUM_COLUMNS {
        return Err(Error::Parse(format!(
            "expected {NUM_COLUMNS} genePredExt columns, found {}",
            fields.len()
        )));
    }

    let name = fields[0].to_string();
    let exon_count: usize = parse_number(fields[7], "exonCount")?;
    let exon_starts = parse_list(fields[8], "exonStarts")?;
    let exon_ends = parse_list(fields[9], "exonEnds")?;
    let exon_frames = parse_list::<i64>(fields[14], "exonFrames")?
        .into_iter()
        .map(|f| if f < 0 { Ok(None) } else { Frame::try_from(f).map(Some) })
        .collect::<Result<Vec<_>, _>>()?;

    if exon_starts.len() != exon_count
        || exon_ends.len() != exon_count
        || exon_frames.len() != exon_count
    {
        return Err(Error::Parse(format!(
            "transcript '{name}' declares {exon_count} exons but lists {} starts, {} ends and {} frames",
            exon_starts.len(),
            exon_ends.len(),
            exon_frames.len()
        )));
    }

    Ok(GenePredRow {
        name,
        chromosome: fields[1].to_string(),
        strand: fields[2].parse()?,
        tx_start: parse_number(fields[3], "txStart")?,
        tx_end: parse_number(fields[4], "txEnd")?,
        cds_start: parse_number(fields[5], "cdsStart")?,
        cds_end: parse_number(fields[6], "cdsEnd")?,
        exon_starts,
        exon_ends,
        gene_name: fields[11].to_string(),
        cds_start_stat: fields[12].parse()?,
        cds_end_stat: fields[13].parse()?,
        exon_frames,
    })
}

fn parse_number<T: std::str::FromStr>(value: &str, column: &str) -> Result<T, Error>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| Error::Parse(format!("invalid {column} '{value}': {e}")))
}

/// Parses a comma-separated list, tolerating the trailing comma genePred writes.
fn parse_list<T: std::str::FromStr>(value: &str, column: &str) -> Result<Vec<T>, Error>
where
    T::Err: std::fmt::Display,
{
    value
        .split(',')
        .filter(|v| !v.is_empty())
        .map(|v| parse_number(v, column))
        .collect()
}
