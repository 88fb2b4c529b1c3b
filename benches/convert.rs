use std::collections::BTreeMap;
use std::io::Cursor;

use criterion::{Criterion, criterion_group, criterion_main};

use annotbl::biotype::BiotypeClassifier;
use annotbl::config::ConversionConfig;
use annotbl::convert::GeneTranscriptConverter;
use annotbl::feature_table::FeatureWriter;
use annotbl::genepred::parse_genepred;
use annotbl::loader::{TRANSCRIPT_ID_COLUMN, build_genes, parse_attributes};
use annotbl::transcript::types::REQUIRED_KEYS;

const NUM_GENES: usize = 2_000;

/// Synthetic chromosome: three-exon coding genes, every fourth one with a
/// frame shift in its last exon.
fn synthetic_inputs() -> (String, String) {
    let mut genepred = String::new();
    let mut attributes = format!("{TRANSCRIPT_ID_COLUMN}\t{}\n", REQUIRED_KEYS.join("\t"));

    for i in 0..NUM_GENES {
        let base = i as u64 * 10_000;
        let exon_starts = [base, base + 1_000, base + 2_000];
        let exon_ends = [base + 300, base + 1_300, base + 2_300];
        let last_frame = if i % 4 == 0 { 1 } else { 0 };
        let join = |values: &[u64]| {
            values.iter().map(|v| format!("{v},")).collect::<String>()
        };
        genepred.push_str(&format!(
            "Mm_T{i}\tchr1\t+\t{base}\t{}\t{base}\t{}\t3\t{}\t{}\t0\tMm_G{i}\tcmpl\tcmpl\t0,0,{last_frame},\n",
            base + 2_300,
            base + 2_300,
            join(&exon_starts),
            join(&exon_ends),
        ));
        attributes.push_str(&format!(
            "Mm_T{i}\tprotein_coding\tprotein_coding\tENSG{i}\tGENE{i}\tENST{i}\tTrue\tTrue\tcmpl\tcmpl\t\t\tENST{i}-1\ttransMap\n"
        ));
    }

    (genepred, attributes)
}

fn bench_convert(c: &mut Criterion) {
    let (genepred, attributes) = synthetic_inputs();
    let rows = parse_genepred(Cursor::new(genepred)).unwrap();
    let attributes = parse_attributes(Cursor::new(attributes)).unwrap();
    let genes: BTreeMap<_, _> = build_genes(rows, &attributes).unwrap();

    let classifier = BiotypeClassifier::new().unwrap();
    let config = ConversionConfig::new("MUS");
    let converter = GeneTranscriptConverter::new(&classifier, &config);

    c.bench_function("convert (2000 genes)", |b| {
        b.iter(|| {
            let mut writer = FeatureWriter::new(Vec::new());
            let stats = converter.convert_chromosomes(&genes, &mut writer).unwrap();
            assert_eq!(stats.genes_written, NUM_GENES);
            writer.into_inner().unwrap()
        });
    });
}

criterion_group!(benches, bench_convert);
criterion_main!(benches);
