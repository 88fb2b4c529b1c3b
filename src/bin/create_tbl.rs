use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use annotbl::biotype::BiotypeClassifier;
use annotbl::cli;
use annotbl::config::ConversionConfig;
use annotbl::convert::{ConversionStats, GeneTranscriptConverter, write_sequences};
use annotbl::feature_table::FeatureWriter;
use annotbl::loader;
use annotbl::perf::ResourceUsage;

#[derive(Parser)]
#[command(
    name = "create_tbl",
    about = "Convert projected gene annotations into an NCBI feature table"
)]
struct Cli {
    /// Projected transcripts in genePredExt format (optionally gzipped)
    #[arg(short = 'g', long = "genepred")]
    genepred: PathBuf,

    /// Tab-separated per-transcript attribute table (optionally gzipped)
    #[arg(short = 'a', long = "attributes")]
    attributes: PathBuf,

    /// Output feature table
    #[arg(short = 'o', long = "out")]
    out: PathBuf,

    /// Path to a JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Locus tag prefix (overrides the configuration file)
    #[arg(short = 'p', long = "locus-tag-prefix")]
    locus_tag_prefix: Option<String>,

    /// Minimum reconciled CDS length in bases (overrides the configuration file)
    #[arg(short = 'm', long = "min-cds-size")]
    min_cds_size: Option<u64>,
}

fn resolve_config(cli_args: &Cli) -> Result<ConversionConfig> {
    let mut config = match &cli_args.config {
        Some(path) => ConversionConfig::from_file(path)?,
        None => {
            let prefix = cli_args
                .locus_tag_prefix
                .clone()
                .context("either --config or --locus-tag-prefix is required")?;
            ConversionConfig::new(prefix)
        }
    };
    if let Some(prefix) = &cli_args.locus_tag_prefix {
        config.locus_tag_prefix.clone_from(prefix);
    }
    if let Some(min_cds_size) = cli_args.min_cds_size {
        config.min_cds_size = min_cds_size;
    }
    config.validate()?;
    Ok(config)
}

fn report_stats(stats: &ConversionStats) {
    cli::field("Chromosomes", stats.chromosomes);
    cli::field("Genes written", stats.genes_written);
    cli::field("Transcripts written", stats.transcripts_written);
    cli::field("Coding transcripts", stats.coding_transcripts);
    cli::field("Frame gaps", stats.gaps_inserted);
    cli::field("Unitary pseudogenes", stats.unitary_pseudogenes);
    cli::field("rRNA pseudogenes", stats.rrna_pseudogenes);
    if stats.transcripts_dropped > 0 {
        cli::caution(&format!(
            "{} transcripts below the minimum CDS size ({} genes left empty)",
            stats.transcripts_dropped, stats.genes_skipped
        ));
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let start = Instant::now();
    let cli_args = Cli::parse();

    cli::header("create_tbl");

    cli::stage(1, "Configuration");

    let config = resolve_config(&cli_args)?;
    let classifier = BiotypeClassifier::new().context("biotype tables failed their self-check")?;

    if let Some(path) = &cli_args.config {
        cli::field("Config", path.display());
    }
    cli::field("Locus tag prefix", &config.locus_tag_prefix);
    cli::field("Minimum CDS size", format!("{} bp", config.min_cds_size));
    cli::field("Output", cli_args.out.display());

    cli::stage(2, "Loading");

    cli::field("genePred", cli_args.genepred.display());
    cli::field("Attributes", cli_args.attributes.display());

    let genes = loader::load_annotations(&cli_args.genepred, &cli_args.attributes)
        .context("failed to load annotations")?;
    let num_genes: usize = genes.values().map(Vec::len).sum();
    cli::done(&format!("{num_genes} genes on {} sequences", genes.len()));

    cli::stage(3, "Conversion");

    // The output file is only created once every gene has converted.
    let converter = GeneTranscriptConverter::new(&classifier, &config);
    let (sequences, stats) = converter.convert_all(&genes)?;

    let mut writer = FeatureWriter::from_file(&cli_args.out)
        .with_context(|| format!("failed to create {}", cli_args.out.display()))?;
    write_sequences(sequences, &mut writer)
        .with_context(|| format!("failed to write {}", cli_args.out.display()))?;
    writer
        .into_inner()
        .with_context(|| format!("failed to finish {}", cli_args.out.display()))?;

    report_stats(&stats);
    cli::done(&format!("Wrote {}", cli_args.out.display()));

    info!("create_tbl finished: {}", ResourceUsage::since(start));
    cli::print_summary(start);
    Ok(())
}
