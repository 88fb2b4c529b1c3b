//! Loads projected annotations: the genePredExt geometry joined with the
//! per-transcript attribute table, grouped into genes per chromosome.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use log::debug;

use crate::error::Error;
use crate::genepred::{GenePredRow, parse_genepred, parse_genepred_gz};
use crate::transcript::types::REQUIRED_KEYS;
use crate::transcript::{GeneBuilder, GeneRecord, TranscriptAttributes};

/// Column holding the transcript id in the attribute table.
pub const TRANSCRIPT_ID_COLUMN: &str = "transcript_id";

/// Finalized genes keyed by chromosome, in lexicographic chromosome order.
pub type GenesByChromosome = BTreeMap<String, Vec<GeneRecord>>;

fn is_gzipped(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Opens a file for buffered reading, decompressing it when the name ends in `.gz`.
pub fn open_reader(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    let file = File::open(path)?;
    let reader: Box<dyn Read> = if is_gzipped(path) {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(Box::new(BufReader::new(reader)))
}

/// Parse the tab-separated attribute table.
///
/// The header names the columns; it must include `transcript_id` and every
/// required attribute key. Extra columns are ignored.
pub fn parse_attributes<R: BufRead>(
    reader: R,
) -> Result<HashMap<String, TranscriptAttributes>, Error> {
    let mut lines = reader.lines();
    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(Error::Parse("attribute table is empty".to_string())),
    };
    let columns: Vec<String> = header.split('\t').map(|c| c.trim().to_string()).collect();

    let Some(id_column) = columns.iter().position(|c| c == TRANSCRIPT_ID_COLUMN) else {
        return Err(Error::Parse(format!(
            "attribute table has no '{TRANSCRIPT_ID_COLUMN}' column"
        )));
    };
    let missing: Vec<&str> = REQUIRED_KEYS
        .iter()
        .copied()
        .filter(|key| !columns.iter().any(|c| c == key))
        .collect();
    if !missing.is_empty() {
        return Err(Error::Parse(format!(
            "attribute table is missing columns: {}",
            missing.join(", ")
        )));
    }

    let mut attributes = HashMap::new();
    for (line_num, line) in lines.enumerate() {
        let line_num = line_num + 2;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != columns.len() {
            return Err(Error::Parse(format!(
                "expected {} attribute columns, found {} (line {line_num})",
                columns.len(),
                fields.len()
            )));
        }

        let transcript_id = fields[id_column].trim().to_string();
        let row: HashMap<String, String> = columns
            .iter()
            .zip(&fields)
            .map(|(column, value)| (column.clone(), (*value).to_string()))
            .collect();
        let parsed = TranscriptAttributes::from_row(&transcript_id, &row)
            .map_err(|e| Error::Parse(format!("{e} (line {line_num})")))?;

        if attributes.insert(transcript_id.clone(), parsed).is_some() {
            return Err(Error::Parse(format!(
                "duplicate attribute row for transcript '{transcript_id}' (line {line_num})"
            )));
        }
    }

    Ok(attributes)
}

/// Joins geometry rows with their attributes and groups them into genes.
///
/// Every row must have an attribute entry. Genes are finalized and bucketed by
/// chromosome.
pub fn build_genes(
    rows: Vec<GenePredRow>,
    attributes: &HashMap<String, TranscriptAttributes>,
) -> Result<GenesByChromosome, Error> {
    let mut builders: BTreeMap<String, GeneBuilder> = BTreeMap::new();
    let mut joined = HashSet::new();

    for row in rows {
        let attrs = attributes
            .get(&row.name)
            .cloned()
            .ok_or_else(|| Error::MissingAttributes(row.name.clone()))?;
        joined.insert(row.name.clone());
        let transcript = row.into_transcript(attrs);
        transcript.validate()?;
        builders
            .entry(transcript.gene_id.clone())
            .or_insert_with(|| GeneBuilder::new(transcript.gene_id.clone()))
            .add_transcript(transcript)?;
    }

    let unused = attributes.len() - joined.len();
    if unused > 0 {
        debug!("{unused} attribute rows have no transcript geometry");
    }

    let mut genes = GenesByChromosome::new();
    for builder in builders.into_values() {
        let gene = builder.finalize()?;
        genes.entry(gene.chromosome().to_string()).or_default().push(gene);
    }
    Ok(genes)
}

/// Reads both inputs from disk and builds the per-chromosome gene map.
/// Reads genePredExt rows from a plain or `.gz` file.
pub fn read_genepred(path: &Path) -> Result<Vec<GenePredRow>, Error> {
    let file = File::open(path)?;
    if is_gzipped(path) {
        parse_genepred_gz(file)
    } else {
        parse_genepred(BufReader::new(file))
    }
}

pub fn load_annotations(genepred: &Path, attributes: &Path) -> Result<GenesByChromosome, Error> {
    let rows = read_genepred(genepred)?;
    let attributes = parse_attributes(open_reader(attributes)?)?;
    build_genes(rows, &attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use tempfile::NamedTempFile;

    const GENEPRED: &str = "\
Mm_T1\tchr2\t+\t100\t400\t120\t350\t2\t100,300,\t200,400,\t0\tMm_G1\tcmpl\tcmpl\t0,2,
Mm_T2\tchr2\t+\t150\t400\t150\t350\t2\t150,300,\t200,400,\t0\tMm_G1\tcmpl\tcmpl\t0,1,
Mm_T3\tchr1\t-\t500\t900\t500\t500\t1\t500,\t900,\t0\tMm_G2\tnone\tnone\t-1,
";

    fn attribute_table(ids: &[&str]) -> String {
        let mut table = format!("{TRANSCRIPT_ID_COLUMN}\t{}\n", REQUIRED_KEYS.join("\t"));
        for id in ids {
            table.push_str(&format!(
                "{id}\tprotein_coding\tprotein_coding\tENSG1\tABC1\tENST1\tTrue\tTrue\tcmpl\tcmpl\t\t\t{id}-1\ttransMap\n"
            ));
        }
        table
    }

    #[test]
    fn parse_attribute_rows() {
        let attrs = parse_attributes(Cursor::new(attribute_table(&["T1", "T2"]))).unwrap();
        assert_eq!(attrs.len(), 2);
        let t1 = &attrs["T1"];
        assert_eq!(t1.source_gene_common_name.as_deref(), Some("ABC1"));
        assert_eq!(t1.alignment_id, "T1-1");
        assert_eq!(t1.adjusted_coding_start, None);
    }

    #[test]
    fn missing_required_column() {
        let table = "transcript_id\ttranscript_biotype\nT1\tlncRNA\n";
        let err = parse_attributes(Cursor::new(table)).unwrap_err();
        assert!(err.to_string().contains("missing columns"));
        assert!(err.to_string().contains("valid_start"));
    }

    #[test]
    fn duplicate_attribute_row() {
        let err = parse_attributes(Cursor::new(attribute_table(&["T1", "T1"]))).unwrap_err();
        assert!(err.to_string().contains("duplicate attribute row"));
    }

    #[test]
    fn genes_grouped_by_chromosome() {
        let rows = parse_genepred(Cursor::new(GENEPRED)).unwrap();
        let attrs =
            parse_attributes(Cursor::new(attribute_table(&["Mm_T1", "Mm_T2", "Mm_T3"]))).unwrap();
        let genes = build_genes(rows, &attrs).unwrap();

        let chromosomes: Vec<&String> = genes.keys().collect();
        assert_eq!(chromosomes, vec!["chr1", "chr2"]);
        let g1 = &genes["chr2"][0];
        assert_eq!(g1.id(), "Mm_G1");
        assert_eq!(g1.transcripts().len(), 2);
        assert_eq!((g1.region().start, g1.region().stop), (100, 400));
    }

    #[test]
    fn missing_attributes_is_fatal() {
        let rows = parse_genepred(Cursor::new(GENEPRED)).unwrap();
        let attrs = parse_attributes(Cursor::new(attribute_table(&["Mm_T1", "Mm_T2"]))).unwrap();
        let err = build_genes(rows, &attrs).unwrap_err();
        assert!(matches!(err, Error::MissingAttributes(ref id) if id == "Mm_T3"));
    }

    #[test]
    fn duplicate_transcript_is_fatal() {
        let line = GENEPRED.lines().next().unwrap();
        let doubled = format!("{line}\n{line}\n");
        let rows = parse_genepred(Cursor::new(doubled)).unwrap();
        let attrs = parse_attributes(Cursor::new(attribute_table(&["Mm_T1"]))).unwrap();
        let err = build_genes(rows, &attrs).unwrap_err();
        assert!(matches!(err, Error::DuplicateTranscript { ref transcript_id, .. } if transcript_id == "Mm_T1"));
    }

    #[test]
    fn load_from_files() {
        let mut genepred = tempfile::Builder::new().suffix(".gp.gz").tempfile().unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(GENEPRED.as_bytes()).unwrap();
        genepred.write_all(&encoder.finish().unwrap()).unwrap();

        let mut attributes = NamedTempFile::new().unwrap();
        attributes
            .write_all(attribute_table(&["Mm_T1", "Mm_T2", "Mm_T3"]).as_bytes())
            .unwrap();

        let genes = load_annotations(genepred.path(), attributes.path()).unwrap();
        assert_eq!(genes.values().map(Vec::len).sum::<usize>(), 2);
    }

    #[test]
    fn read_genepred_plain_and_gzipped() {
        let mut plain = NamedTempFile::new().unwrap();
        plain.write_all(GENEPRED.as_bytes()).unwrap();

        let mut gzipped = tempfile::Builder::new().suffix(".gz").tempfile().unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(GENEPRED.as_bytes()).unwrap();
        gzipped.write_all(&encoder.finish().unwrap()).unwrap();

        let plain_rows = read_genepred(plain.path()).unwrap();
        let gzipped_rows = read_genepred(gzipped.path()).unwrap();
        assert_eq!(plain_rows.len(), 3);
        assert_eq!(plain_rows, gzipped_rows);
    }
}
