//! Gene records: transcripts grouped under one gene id.

use std::collections::HashMap;

use crate::error::Error;
use crate::interval::GenomicInterval;
use crate::strand::Strand;

use super::types::TranscriptRecord;

/// Collects the transcripts of one gene before its derived fields are computed.
#[derive(Debug)]
pub struct GeneBuilder {
    id: String,
    transcripts: HashMap<String, TranscriptRecord>,
}

impl GeneBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            transcripts: HashMap::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Adds a transcript. A transcript id seen before in this gene is fatal.
    pub fn add_transcript(&mut self, transcript: TranscriptRecord) -> Result<(), Error> {
        if self.transcripts.contains_key(&transcript.id) {
            return Err(Error::DuplicateTranscript {
                gene_id: self.id.clone(),
                transcript_id: transcript.id,
            });
        }
        self.transcripts.insert(transcript.id.clone(), transcript);
        Ok(())
    }

    /// Consumes the builder, sorting transcripts by (start, name) and computing
    /// the gene's chromosome, strand and span.
    pub fn finalize(self) -> Result<GeneRecord, Error> {
        let mut transcripts: Vec<TranscriptRecord> = self.transcripts.into_values().collect();
        transcripts.sort_by(|a, b| {
            a.interval
                .start
                .cmp(&b.interval.start)
                .then_with(|| a.id.cmp(&b.id))
        });

        let Some(first) = transcripts.first() else {
            return Err(Error::Validation(format!("gene '{}' has no transcripts", self.id)));
        };
        let chromosome = first.chromosome().to_string();
        let strand = first.strand();

        if let Some(tx) = transcripts
            .iter()
            .find(|t| t.chromosome() != chromosome || t.strand() != strand)
        {
            return Err(Error::Validation(format!(
                "gene '{}' mixes {chromosome}({strand}) with transcript '{}' on {}({})",
                self.id,
                tx.id,
                tx.chromosome(),
                tx.strand()
            )));
        }

        let start = transcripts.iter().map(|t| t.interval.start).min().unwrap_or(0);
        let stop = transcripts.iter().map(|t| t.interval.stop).max().unwrap_or(0);
        let region = GenomicInterval::new(chromosome, start, stop, strand);

        Ok(GeneRecord {
            id: self.id,
            transcripts,
            region,
        })
    }
}

/// A finalized gene. Read-only once built.
#[derive(Debug, Clone)]
pub struct GeneRecord {
    id: String,
    transcripts: Vec<TranscriptRecord>,
    region: GenomicInterval,
}

impl GeneRecord {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Transcripts sorted by (start, name).
    #[must_use]
    pub fn transcripts(&self) -> &[TranscriptRecord] {
        &self.transcripts
    }

    #[must_use]
    pub fn chromosome(&self) -> &str {
        &self.region.chromosome
    }

    #[must_use]
    pub fn strand(&self) -> Strand {
        self.region.strand
    }

    /// Span from the smallest transcript start to the largest transcript stop.
    #[must_use]
    pub fn region(&self) -> &GenomicInterval {
        &self.region
    }
}
