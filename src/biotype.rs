//! Biotype classification: maps source biotypes onto feature table keys,
//! `ncRNA_class` values and `pseudogene` qualifier values.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::Error;

/// Feature table key used for a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    MRna,
    NcRna,
    RRna,
    TRna,
    CRegion,
    DSegment,
    JSegment,
    VSegment,
}

impl FeatureKind {
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::MRna => "mRNA",
            Self::NcRna => "ncRNA",
            Self::RRna => "rRNA",
            Self::TRna => "tRNA",
            Self::CRegion => "C_region",
            Self::DSegment => "D_segment",
            Self::JSegment => "J_segment",
            Self::VSegment => "V_segment",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Biotype → feature key.
const FEATURE_KINDS: &[(&str, FeatureKind)] = &[
    // Coding
    ("protein_coding", FeatureKind::MRna),
    ("nonsense_mediated_decay", FeatureKind::MRna),
    ("non_stop_decay", FeatureKind::MRna),
    ("polymorphic_pseudogene", FeatureKind::MRna),
    ("protein_coding_LoF", FeatureKind::MRna),
    // Immunoglobulin / T-cell receptor segments
    ("IG_C_gene", FeatureKind::CRegion),
    ("IG_D_gene", FeatureKind::DSegment),
    ("IG_J_gene", FeatureKind::JSegment),
    ("IG_V_gene", FeatureKind::VSegment),
    ("TR_C_gene", FeatureKind::CRegion),
    ("TR_D_gene", FeatureKind::DSegment),
    ("TR_J_gene", FeatureKind::JSegment),
    ("TR_V_gene", FeatureKind::VSegment),
    // Structural RNAs
    ("rRNA", FeatureKind::RRna),
    ("Mt_rRNA", FeatureKind::RRna),
    ("tRNA", FeatureKind::TRna),
    ("Mt_tRNA", FeatureKind::TRna),
    // Non-coding
    ("lncRNA", FeatureKind::NcRna),
    ("lincRNA", FeatureKind::NcRna),
    ("antisense", FeatureKind::NcRna),
    ("antisense_RNA", FeatureKind::NcRna),
    ("sense_intronic", FeatureKind::NcRna),
    ("sense_overlapping", FeatureKind::NcRna),
    ("3prime_overlapping_ncRNA", FeatureKind::NcRna),
    ("bidirectional_promoter_lncRNA", FeatureKind::NcRna),
    ("macro_lncRNA", FeatureKind::NcRna),
    ("processed_transcript", FeatureKind::NcRna),
    ("retained_intron", FeatureKind::NcRna),
    ("non_coding", FeatureKind::NcRna),
    ("known_ncrna", FeatureKind::NcRna),
    ("TEC", FeatureKind::NcRna),
    ("miRNA", FeatureKind::NcRna),
    ("misc_RNA", FeatureKind::NcRna),
    ("piRNA", FeatureKind::NcRna),
    ("ribozyme", FeatureKind::NcRna),
    ("scaRNA", FeatureKind::NcRna),
    ("scRNA", FeatureKind::NcRna),
    ("snoRNA", FeatureKind::NcRna),
    ("snRNA", FeatureKind::NcRna),
    ("sRNA", FeatureKind::NcRna),
    ("vaultRNA", FeatureKind::NcRna),
    ("vault_RNA", FeatureKind::NcRna),
    ("Y_RNA", FeatureKind::NcRna),
    // Pseudogenes are written as non-coding features
    ("pseudogene", FeatureKind::NcRna),
    ("processed_pseudogene", FeatureKind::NcRna),
    ("unprocessed_pseudogene", FeatureKind::NcRna),
    ("transcribed_processed_pseudogene", FeatureKind::NcRna),
    ("transcribed_unprocessed_pseudogene", FeatureKind::NcRna),
    ("transcribed_unitary_pseudogene", FeatureKind::NcRna),
    ("translated_processed_pseudogene", FeatureKind::NcRna),
    ("translated_unprocessed_pseudogene", FeatureKind::NcRna),
    ("unitary_pseudogene", FeatureKind::NcRna),
    ("IG_pseudogene", FeatureKind::NcRna),
    ("IG_C_pseudogene", FeatureKind::NcRna),
    ("IG_J_pseudogene", FeatureKind::NcRna),
    ("IG_V_pseudogene", FeatureKind::NcRna),
    ("TR_J_pseudogene", FeatureKind::NcRna),
    ("TR_V_pseudogene", FeatureKind::NcRna),
    ("rRNA_pseudogene", FeatureKind::NcRna),
];

/// Biotype → `ncRNA_class`. Exactly the biotypes mapped to `ncRNA`.
const NCRNA_CLASSES: &[(&str, &str)] = &[
    ("lncRNA", "lncRNA"),
    ("lincRNA", "lncRNA"),
    ("antisense", "antisense_RNA"),
    ("antisense_RNA", "antisense_RNA"),
    ("sense_intronic", "lncRNA"),
    ("sense_overlapping", "lncRNA"),
    ("3prime_overlapping_ncRNA", "lncRNA"),
    ("bidirectional_promoter_lncRNA", "lncRNA"),
    ("macro_lncRNA", "lncRNA"),
    ("processed_transcript", "other"),
    ("retained_intron", "other"),
    ("non_coding", "other"),
    ("known_ncrna", "other"),
    ("TEC", "other"),
    ("miRNA", "miRNA"),
    ("misc_RNA", "other"),
    ("piRNA", "piRNA"),
    ("ribozyme", "ribozyme"),
    ("scaRNA", "scaRNA"),
    ("scRNA", "scRNA"),
    ("snoRNA", "snoRNA"),
    ("snRNA", "snRNA"),
    ("sRNA", "other"),
    ("vaultRNA", "vault_RNA"),
    ("vault_RNA", "vault_RNA"),
    ("Y_RNA", "Y_RNA"),
    ("pseudogene", "other"),
    ("processed_pseudogene", "other"),
    ("unprocessed_pseudogene", "other"),
    ("transcribed_processed_pseudogene", "other"),
    ("transcribed_unprocessed_pseudogene", "other"),
    ("transcribed_unitary_pseudogene", "other"),
    ("translated_processed_pseudogene", "other"),
    ("translated_unprocessed_pseudogene", "other"),
    ("unitary_pseudogene", "other"),
    ("IG_pseudogene", "other"),
    ("IG_C_pseudogene", "other"),
    ("IG_J_pseudogene", "other"),
    ("IG_V_pseudogene", "other"),
    ("TR_J_pseudogene", "other"),
    ("TR_V_pseudogene", "other"),
    ("rRNA_pseudogene", "other"),
];

/// Biotype → `pseudogene` qualifier value, for the pseudogenes whose origin is known.
const PSEUDOGENE_CLASSES: &[(&str, &str)] = &[
    ("processed_pseudogene", "processed"),
    ("transcribed_processed_pseudogene", "processed"),
    ("translated_processed_pseudogene", "processed"),
    ("unprocessed_pseudogene", "unprocessed"),
    ("transcribed_unprocessed_pseudogene", "unprocessed"),
    ("translated_unprocessed_pseudogene", "unprocessed"),
    ("unitary_pseudogene", "unitary"),
    ("transcribed_unitary_pseudogene", "unitary"),
];

const PSEUDOGENE_BIOTYPES: &[&str] = &[
    "pseudogene",
    "processed_pseudogene",
    "unprocessed_pseudogene",
    "transcribed_processed_pseudogene",
    "transcribed_unprocessed_pseudogene",
    "transcribed_unitary_pseudogene",
    "translated_processed_pseudogene",
    "translated_unprocessed_pseudogene",
    "unitary_pseudogene",
    "IG_pseudogene",
    "IG_C_pseudogene",
    "IG_J_pseudogene",
    "IG_V_pseudogene",
    "TR_J_pseudogene",
    "TR_V_pseudogene",
    "rRNA_pseudogene",
];

/// Genuine rRNA loci. Projected rRNAs with any other name are treated as pseudogenes.
const EXEMPT_RRNA_NAMES: &[&str] = &[
    "RNA5S",
    "RNA5-8S",
    "RNA5-8SN",
    "RNA18S",
    "RNA18SN",
    "RNA28S",
    "RNA28SN",
    "RNA45S",
    "RNA45SN",
    "MT-RNR1",
    "MT-RNR2",
    "5S_rRNA",
    "5_8S_rRNA",
];

/// The qualifier value used when a pseudogene's origin is unknown.
pub const UNKNOWN_PSEUDOGENE: &str = "unknown";

/// Immutable lookup tables, checked for mutual consistency when built.
#[derive(Debug, Clone)]
pub struct BiotypeClassifier {
    feature_kinds: HashMap<&'static str, FeatureKind>,
    ncrna_classes: HashMap<&'static str, &'static str>,
    pseudogene_classes: HashMap<&'static str, &'static str>,
    pseudogene_biotypes: HashSet<&'static str>,
}

impl BiotypeClassifier {
    /// Builds the classifier from the built-in tables and runs the self-check.
    pub fn new() -> Result<Self, Error> {
        Self::from_tables(
            FEATURE_KINDS,
            NCRNA_CLASSES,
            PSEUDOGENE_CLASSES,
            PSEUDOGENE_BIOTYPES,
        )
    }

    fn from_tables(
        feature_kinds: &[(&'static str, FeatureKind)],
        ncrna_classes: &[(&'static str, &'static str)],
        pseudogene_classes: &[(&'static str, &'static str)],
        pseudogene_biotypes: &[&'static str],
    ) -> Result<Self, Error> {
        let classifier = Self {
            feature_kinds: feature_kinds.iter().copied().collect(),
            ncrna_classes: ncrna_classes.iter().copied().collect(),
            pseudogene_classes: pseudogene_classes.iter().copied().collect(),
            pseudogene_biotypes: pseudogene_biotypes.iter().copied().collect(),
        };
        classifier.validate()?;
        Ok(classifier)
    }

    /// Every `ncRNA` biotype must have a class and every class entry must be an
    /// `ncRNA` biotype. Pseudogene classes and pseudogene biotypes must be known.
    pub fn validate(&self) -> Result<(), Error> {
        let mut problems = Vec::new();

        for (biotype, kind) in &self.feature_kinds {
            if *kind == FeatureKind::NcRna && !self.ncrna_classes.contains_key(biotype) {
                problems.push(format!("ncRNA biotype '{biotype}' has no ncRNA_class"));
            }
        }
        for biotype in self.ncrna_classes.keys() {
            if self.feature_kinds.get(biotype) != Some(&FeatureKind::NcRna) {
                problems.push(format!(
                    "ncRNA_class entry '{biotype}' is not an ncRNA biotype"
                ));
            }
        }
        for biotype in self.pseudogene_classes.keys() {
            if !self.pseudogene_biotypes.contains(biotype) {
                problems.push(format!(
                    "pseudogene class entry '{biotype}' is not a pseudogene biotype"
                ));
            }
        }
        for biotype in &self.pseudogene_biotypes {
            if !self.feature_kinds.contains_key(biotype) {
                problems.push(format!("pseudogene biotype '{biotype}' has no feature kind"));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            problems.sort();
            Err(Error::InconsistentTables(problems.join("; ")))
        }
    }

    /// Feature key for a biotype. Unknown biotypes are fatal.
    pub fn feature_kind(&self, biotype: &str) -> Result<FeatureKind, Error> {
        self.feature_kinds
            .get(biotype)
            .copied()
            .ok_or_else(|| Error::UnknownBiotype(biotype.to_string()))
    }

    #[must_use]
    pub fn ncrna_class(&self, biotype: &str) -> Option<&'static str> {
        self.ncrna_classes.get(biotype).copied()
    }

    #[must_use]
    pub fn pseudogene_class(&self, biotype: &str) -> Option<&'static str> {
        self.pseudogene_classes.get(biotype).copied()
    }

    #[must_use]
    pub fn is_pseudogene(&self, biotype: &str) -> bool {
        self.pseudogene_biotypes.contains(biotype)
    }

    /// True for biotypes written as `rRNA` features.
    #[must_use]
    pub fn is_rrna(&self, biotype: &str) -> bool {
        self.feature_kinds.get(biotype) == Some(&FeatureKind::RRna)
    }
}

/// True when a gene name belongs to a genuine rRNA locus.
#[must_use]
pub fn is_exempt_rrna_name(name: &str) -> bool {
    EXEMPT_RRNA_NAMES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_tables_are_consistent() {
        assert!(BiotypeClassifier::new().is_ok());
    }

    #[test]
    fn feature_kinds() {
        let c = BiotypeClassifier::new().unwrap();
        assert_eq!(c.feature_kind("protein_coding").unwrap(), FeatureKind::MRna);
        assert_eq!(c.feature_kind("lncRNA").unwrap(), FeatureKind::NcRna);
        assert_eq!(c.feature_kind("Mt_rRNA").unwrap(), FeatureKind::RRna);
        assert_eq!(c.feature_kind("Mt_tRNA").unwrap(), FeatureKind::TRna);
        assert_eq!(c.feature_kind("IG_V_gene").unwrap(), FeatureKind::VSegment);
        assert_eq!(FeatureKind::CRegion.to_string(), "C_region");
    }

    #[test]
    fn unknown_biotype_is_fatal() {
        let c = BiotypeClassifier::new().unwrap();
        let err = c.feature_kind("made_up_RNA").unwrap_err();
        assert!(matches!(err, Error::UnknownBiotype(ref b) if b == "made_up_RNA"));
    }

    #[test]
    fn ncrna_classes() {
        let c = BiotypeClassifier::new().unwrap();
        assert_eq!(c.ncrna_class("lincRNA"), Some("lncRNA"));
        assert_eq!(c.ncrna_class("snoRNA"), Some("snoRNA"));
        assert_eq!(c.ncrna_class("protein_coding"), None);
    }

    #[test]
    fn pseudogenes() {
        let c = BiotypeClassifier::new().unwrap();
        assert!(c.is_pseudogene("processed_pseudogene"));
        assert!(c.is_pseudogene("IG_V_pseudogene"));
        assert!(!c.is_pseudogene("polymorphic_pseudogene"));
        assert_eq!(c.pseudogene_class("unitary_pseudogene"), Some("unitary"));
        assert_eq!(c.pseudogene_class("IG_V_pseudogene"), None);
    }

    #[test]
    fn rrna() {
        let c = BiotypeClassifier::new().unwrap();
        assert!(c.is_rrna("rRNA"));
        assert!(c.is_rrna("Mt_rRNA"));
        assert!(!c.is_rrna("rRNA_pseudogene"));
        assert!(is_exempt_rrna_name("RNA5-8S"));
        assert!(!is_exempt_rrna_name("RNA5SP141"));
    }

    #[test]
    fn self_check_rejects_ncrna_without_class() {
        let err = BiotypeClassifier::from_tables(
            &[("lncRNA", FeatureKind::NcRna), ("snRNA", FeatureKind::NcRna)],
            &[("lncRNA", "lncRNA")],
            &[],
            &[],
        )
        .unwrap_err();
        assert!(err.to_string().contains("'snRNA' has no ncRNA_class"));
    }

    #[test]
    fn self_check_rejects_class_for_non_ncrna() {
        let err = BiotypeClassifier::from_tables(
            &[("protein_coding", FeatureKind::MRna)],
            &[("protein_coding", "other")],
            &[],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InconsistentTables(_)));
    }
}
