//! Conversion of finalized gene records into feature table rows.
//!
//! Each transcript becomes a transcript feature (mRNA, ncRNA, rRNA, ...) and,
//! when it still codes after frame reconciliation, a CDS feature. The gene
//! feature is built from the transcripts that were kept and is written ahead
//! of them.

use std::collections::BTreeMap;
use std::io::Write;

use log::{debug, warn};

use crate::biotype::{BiotypeClassifier, FeatureKind, UNKNOWN_PSEUDOGENE};
use crate::cds::CdsSpec;
use crate::cds::exon_split::split_exons_at_gaps;
use crate::cds::pseudogene::{is_rrna_pseudogene, is_unitary_pseudogene};
use crate::config::ConversionConfig;
use crate::error::Error;
use crate::feature_table::{CDS_KEY, FeatureBlock, FeatureWriter, GeneFeatures};
use crate::interval::GenomicInterval;
use crate::transcript::{GeneRecord, TranscriptRecord};

/// Product used for coding features of genes without a common name.
pub const HYPOTHETICAL_PROTEIN: &str = "hypothetical protein";

/// Introns at most this long are flagged as likely alignment artifacts.
pub const MAX_SUSPICIOUS_INTRON: u64 = 50;

const LOW_QUALITY_EXCEPTION: &str = "low-quality sequence region";

/// Counts accumulated over a conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub chromosomes: usize,
    pub genes_written: usize,
    pub genes_skipped: usize,
    pub transcripts_written: usize,
    pub coding_transcripts: usize,
    pub transcripts_dropped: usize,
    pub gaps_inserted: usize,
    pub unitary_pseudogenes: usize,
    pub rrna_pseudogenes: usize,
}

/// A transcript's rows plus what the gene feature needs to know about it.
#[derive(Debug)]
struct ConvertedTranscript {
    block: FeatureBlock,
    interval: GenomicInterval,
    coding: bool,
    unitary: bool,
    rrna_pseudo: bool,
    start_incomplete: bool,
    end_incomplete: bool,
}

/// Strips the species prefix from an identifier (`Mm_T0001` → `T0001`).
fn strip_species(id: &str) -> &str {
    id.split_once('_').map_or(id, |(_, rest)| rest)
}

/// Converted genes of one sequence, in output order.
#[derive(Debug, Clone, Default)]
pub struct SequenceFeatures {
    pub name: String,
    pub genes: Vec<GeneFeatures>,
}

/// Writes each sequence header followed by its genes, flushing per sequence.
pub fn write_sequences<W: Write>(
    sequences: Vec<SequenceFeatures>,
    writer: &mut FeatureWriter<W>,
) -> Result<(), Error> {
    for sequence in sequences {
        writer.start_sequence(&sequence.name);
        for gene in sequence.genes {
            writer.write_gene(gene);
        }
        writer.flush()?;
    }
    Ok(())
}

/// Converts gene records using a validated classifier and a run configuration.
pub struct GeneTranscriptConverter<'a> {
    classifier: &'a BiotypeClassifier,
    config: &'a ConversionConfig,
}

impl<'a> GeneTranscriptConverter<'a> {
    #[must_use]
    pub fn new(classifier: &'a BiotypeClassifier, config: &'a ConversionConfig) -> Self {
        Self { classifier, config }
    }

    fn locus_tag(&self, gene_id: &str) -> String {
        format!("{}_{}", self.config.locus_tag_prefix, strip_species(gene_id))
    }

    fn transcript_id(&self, transcript_id: &str) -> String {
        format!("gnl|{}|{}", self.config.locus_tag_prefix, strip_species(transcript_id))
    }

    fn protein_id(&self, transcript_id: &str, ordinal: usize) -> String {
        format!(
            "gnl|{}|{}_{ordinal}_prot",
            self.config.locus_tag_prefix,
            strip_species(transcript_id)
        )
    }

    /// Converts every chromosome in lexicographic order, genes by (start, strand).
    ///
    /// Nothing is written here, so a fatal error leaves no output behind.
    pub fn convert_all(
        &self,
        chromosomes: &BTreeMap<String, Vec<GeneRecord>>,
    ) -> Result<(Vec<SequenceFeatures>, ConversionStats), Error> {
        let mut stats = ConversionStats::default();
        let mut sequences = Vec::with_capacity(chromosomes.len());

        for (chromosome, genes) in chromosomes {
            let mut ordered: Vec<&GeneRecord> = genes.iter().collect();
            ordered.sort_by(|a, b| {
                (a.region().start, a.strand(), a.id()).cmp(&(b.region().start, b.strand(), b.id()))
            });

            let mut converted = Vec::with_capacity(ordered.len());
            for gene in ordered {
                if let Some(features) = self.convert_gene(gene, &mut stats)? {
                    converted.push(features);
                }
            }
            sequences.push(SequenceFeatures {
                name: chromosome.clone(),
                genes: converted,
            });
            stats.chromosomes += 1;
        }

        Ok((sequences, stats))
    }

    /// Converts all chromosomes, then writes them. On error the writer is untouched.
    pub fn convert_chromosomes<W: Write>(
        &self,
        chromosomes: &BTreeMap<String, Vec<GeneRecord>>,
        writer: &mut FeatureWriter<W>,
    ) -> Result<ConversionStats, Error> {
        let (sequences, stats) = self.convert_all(chromosomes)?;
        write_sequences(sequences, writer)?;
        Ok(stats)
    }

    /// Converts one gene. Returns `None` when none of its transcripts are kept.
    pub fn convert_gene(
        &self,
        gene: &GeneRecord,
        stats: &mut ConversionStats,
    ) -> Result<Option<GeneFeatures>, Error> {
        let mut converted = Vec::with_capacity(gene.transcripts().len());
        for (i, transcript) in gene.transcripts().iter().enumerate() {
            if let Some(tx) = self.convert_transcript(transcript, i + 1, stats)? {
                converted.push(tx);
            }
        }

        let Some(first) = gene.transcripts().first() else {
            return Ok(None);
        };
        if converted.is_empty() {
            debug!("gene {} has no transcripts left to write", gene.id());
            stats.genes_skipped += 1;
            return Ok(None);
        }

        let gene_biotype = &first.attributes.gene_biotype;
        self.classifier.feature_kind(gene_biotype)?;

        let start = converted.iter().map(|t| t.interval.start).min().unwrap_or(0);
        let stop = converted.iter().map(|t| t.interval.stop).max().unwrap_or(0);
        let region = gene.region().with_bounds(start, stop);
        let start_incomplete = converted
            .iter()
            .any(|t| t.start_incomplete && t.interval.start == start);
        let end_incomplete = converted
            .iter()
            .any(|t| t.end_incomplete && t.interval.stop == stop);

        let coding = converted.iter().filter(|t| t.coding).count();
        let unitary = converted.iter().filter(|t| t.unitary).count();
        let any_rrna_pseudo = converted.iter().any(|t| t.rrna_pseudo);

        let pseudogene = if self.classifier.is_pseudogene(gene_biotype) {
            Some(
                self.classifier
                    .pseudogene_class(gene_biotype)
                    .unwrap_or(UNKNOWN_PSEUDOGENE),
            )
        } else if coding > 0 && unitary == coding {
            Some("unitary")
        } else if any_rrna_pseudo {
            Some(UNKNOWN_PSEUDOGENE)
        } else {
            None
        };

        let locus_tag = self.locus_tag(gene.id());
        let mut block = FeatureBlock::new();
        block.write_feature(&[region], "gene", start_incomplete, end_incomplete);
        if let Some(name) = &first.attributes.source_gene_common_name {
            block.write_qualifier("gene", Some(name));
        }
        block.write_qualifier("locus_tag", Some(&locus_tag));
        if let Some(class) = pseudogene {
            block.write_qualifier("pseudogene", Some(class));
        }
        if let Some(source_gene) = &first.attributes.source_gene {
            block.write_note(&format!("source gene: {source_gene} ({gene_biotype})"));
        }

        stats.genes_written += 1;
        stats.transcripts_written += converted.len();
        Ok(Some(GeneFeatures {
            gene: block,
            transcripts: converted.into_iter().map(|t| t.block).collect(),
        }))
    }

    /// Converts one transcript; `ordinal` is its 1-based position in the gene.
    fn convert_transcript(
        &self,
        transcript: &TranscriptRecord,
        ordinal: usize,
        stats: &mut ConversionStats,
    ) -> Result<Option<ConvertedTranscript>, Error> {
        transcript.validate()?;
        let attrs = &transcript.attributes;
        let biotype = attrs.transcript_biotype.as_str();
        let kind = self.classifier.feature_kind(biotype)?;
        let pseudo_biotype = self.classifier.is_pseudogene(biotype);

        let cds = if kind == FeatureKind::MRna && !pseudo_biotype {
            let cds = CdsSpec::from_transcript(transcript);
            if cds.is_none() {
                warn!("{} transcript {} has no coding interval", biotype, transcript.id);
            }
            cds
        } else {
            None
        };

        let mut unitary = false;
        if let Some(cds) = &cds {
            let length = cds.cds_length();
            if length < self.config.min_cds_size {
                debug!(
                    "dropping {}: CDS of {length} bp is below {} bp",
                    transcript.id, self.config.min_cds_size
                );
                stats.transcripts_dropped += 1;
                return Ok(None);
            }
            unitary = is_unitary_pseudogene(length, transcript.source_cds_length());
        }
        let coding = cds.is_some();
        let rrna_pseudo =
            is_rrna_pseudogene(self.classifier, biotype, attrs.source_gene_common_name.as_deref());
        let forced_ncrna = unitary || rrna_pseudo;
        let key = if forced_ncrna { FeatureKind::NcRna } else { kind };
        let writes_cds = coding && !unitary;

        let exons = match &cds {
            Some(cds) if !cds.gaps.is_empty() => {
                split_exons_at_gaps(&transcript.exons, &cds.gaps, cds.span())
            }
            _ => transcript.exons.clone(),
        };
        let (start_incomplete, end_incomplete) = match &cds {
            Some(cds) if writes_cds => (cds.start_incomplete, cds.end_incomplete),
            _ => (false, false),
        };

        let locus_tag = self.locus_tag(&transcript.gene_id);
        let common_name = attrs.source_gene_common_name.as_deref();
        let transcript_id = self.transcript_id(&transcript.id);
        let protein_id = self.protein_id(&transcript.id, ordinal);

        let mut block = FeatureBlock::new();
        block.write_feature(&exons, key.key(), start_incomplete, end_incomplete);
        if key == FeatureKind::NcRna {
            let class = if forced_ncrna {
                "other"
            } else {
                self.classifier.ncrna_class(biotype).unwrap_or("other")
            };
            block.write_qualifier("ncRNA_class", Some(class));
        }
        if let Some(name) = common_name {
            block.write_qualifier("gene", Some(name));
        }
        block.write_qualifier("locus_tag", Some(&locus_tag));
        if writes_cds {
            block.write_qualifier("product", Some(common_name.unwrap_or(HYPOTHETICAL_PROTEIN)));
            block.write_qualifier("protein_id", Some(&protein_id));
            block.write_qualifier("transcript_id", Some(&transcript_id));
        } else if let Some(name) = common_name {
            block.write_qualifier("product", Some(name));
        }
        if transcript
            .intron_lengths()
            .iter()
            .any(|&len| (1..=MAX_SUSPICIOUS_INTRON).contains(&len))
        {
            block.write_qualifier("exception", Some(LOW_QUALITY_EXCEPTION));
        }
        if unitary {
            stats.unitary_pseudogenes += 1;
            block.write_qualifier("pseudogene", Some("unitary"));
        } else if rrna_pseudo {
            stats.rrna_pseudogenes += 1;
            block.write_qualifier("pseudogene", Some(UNKNOWN_PSEUDOGENE));
        } else if pseudo_biotype {
            let class = self
                .classifier
                .pseudogene_class(biotype)
                .unwrap_or(UNKNOWN_PSEUDOGENE);
            block.write_qualifier("pseudogene", Some(class));
        }
        block.write_note(&format!("transcript ID: {}", transcript.id));
        block.write_note(&format!("alignment ID: {}", attrs.alignment_id));
        match &attrs.source_transcript {
            Some(source) => {
                block.write_note(&format!("source transcript: {source} ({biotype})"));
            }
            None => {
                let modes = attrs.transcript_modes.as_deref().unwrap_or("unknown");
                block.write_note(&format!("predicted de novo ({modes})"));
            }
        }

        if let Some(cds) = cds.as_ref().filter(|_| writes_cds) {
            block.write_feature(&cds.regions, CDS_KEY, cds.start_incomplete, cds.end_incomplete);
            block.write_qualifier("codon_start", Some("1"));
            if let Some(name) = common_name {
                block.write_qualifier("gene", Some(name));
            }
            block.write_qualifier("locus_tag", Some(&locus_tag));
            block.write_qualifier("product", Some(common_name.unwrap_or(HYPOTHETICAL_PROTEIN)));
            block.write_qualifier("protein_id", Some(&protein_id));
            block.write_qualifier("transcript_id", Some(&transcript_id));
            for gap in &cds.gaps {
                block.write_note(&format!(
                    "{} bp gap at position {} maintains frame",
                    gap.len(),
                    gap.start + 1
                ));
            }
            stats.gaps_inserted += cds.gaps.len();
        }
        if writes_cds {
            stats.coding_transcripts += 1;
        }

        Ok(Some(ConvertedTranscript {
            block,
            interval: transcript.interval.clone(),
            coding,
            unitary,
            rrna_pseudo,
            start_incomplete,
            end_incomplete,
        }))
    }
}
