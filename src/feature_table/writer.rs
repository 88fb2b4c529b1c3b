//! Buffered feature table writer with a stack of saved row queues.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Error;
use crate::interval::GenomicInterval;

use super::{FeatureBlock, GeneFeatures};

/// Accumulates rows in a pending queue and writes them on [`flush`](Self::flush).
///
/// The converter writes through [`write_gene`](Self::write_gene), which takes a
/// fully built gene and needs no saved queues. `push` and `pop` keep the
/// streaming protocol for callers that emit transcripts before their gene.
///
/// [`push`](Self::push) sets the pending queue aside and [`pop`](Self::pop)
/// restores it, so rows computed later can be written ahead of rows already
/// queued:
///
/// ```rust
/// use annotbl::feature_table::FeatureWriter;
///
/// let mut writer = FeatureWriter::new(Vec::new());
/// writer.write_qualifier("transcript", None);
/// writer.push();
/// writer.write_qualifier("gene", None);
/// writer.flush().unwrap();
/// writer.pop().unwrap();
/// writer.flush().unwrap();
///
/// let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(output, "\t\t\tgene\n\t\t\ttranscript\n");
/// ```
pub struct FeatureWriter<W: Write> {
    inner: BufWriter<W>,
    pending: FeatureBlock,
    saved: Vec<FeatureBlock>,
}

impl FeatureWriter<File> {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Ok(Self::new(File::create(path.as_ref())?))
    }
}

impl<W: Write> FeatureWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: BufWriter::new(writer),
            pending: FeatureBlock::new(),
            saved: Vec::new(),
        }
    }

    pub fn start_sequence(&mut self, name: &str) {
        self.pending.start_sequence(name);
    }

    pub fn write_feature(
        &mut self,
        regions: &[GenomicInterval],
        key: &str,
        start_incomplete: bool,
        end_incomplete: bool,
    ) {
        self.pending
            .write_feature(regions, key, start_incomplete, end_incomplete);
    }

    pub fn write_qualifier(&mut self, key: &str, value: Option<&str>) {
        self.pending.write_qualifier(key, value);
    }

    pub fn write_note(&mut self, text: &str) {
        self.pending.write_note(text);
    }

    /// Queues a prebuilt block after the pending rows.
    pub fn append(&mut self, mut block: FeatureBlock) {
        self.pending.append(&mut block);
    }

    /// Queues a gene's rows: the gene block, then its transcripts in order.
    pub fn write_gene(&mut self, features: GeneFeatures) {
        let GeneFeatures { gene, transcripts } = features;
        self.append(gene);
        for block in transcripts {
            self.append(block);
        }
    }

    /// Saves the pending queue and starts an empty one.
    pub fn push(&mut self) {
        self.saved.push(std::mem::take(&mut self.pending));
    }

    /// Restores the most recently saved queue. The pending queue must be empty.
    pub fn pop(&mut self) -> Result<(), Error> {
        if !self.pending.is_empty() {
            return Err(Error::Validation(format!(
                "cannot restore saved rows over {} unflushed rows",
                self.pending.rows().len()
            )));
        }
        self.pending = self
            .saved
            .pop()
            .ok_or_else(|| Error::Validation("no saved rows to restore".to_string()))?;
        Ok(())
    }

    /// Writes every pending row in order and empties the queue.
    pub fn flush(&mut self) -> Result<(), Error> {
        for row in self.pending.take_rows() {
            writeln!(self.inner, "{row}")?;
        }
        Ok(())
    }

    /// Flushes pending rows and returns the underlying writer.
    pub fn into_inner(mut self) -> Result<W, Error> {
        if !self.saved.is_empty() {
            return Err(Error::Validation(format!(
                "{} saved row queues were never restored",
                self.saved.len()
            )));
        }
        self.flush()?;
        self.inner
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}
