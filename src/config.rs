use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Transcripts whose reconciled CDS is shorter than this are not written.
pub const DEFAULT_MIN_CDS_SIZE: u64 = 90;

fn default_min_cds_size() -> u64 {
    DEFAULT_MIN_CDS_SIZE
}

/// Run-wide conversion settings, passed explicitly to every conversion call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConversionConfig {
    pub locus_tag_prefix: String,
    #[serde(default = "default_min_cds_size")]
    pub min_cds_size: u64,
}

impl ConversionConfig {
    #[must_use]
    pub fn new(locus_tag_prefix: impl Into<String>) -> Self {
        Self {
            locus_tag_prefix: locus_tag_prefix.into(),
            min_cds_size: DEFAULT_MIN_CDS_SIZE,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_locus_tag_prefix(&self.locus_tag_prefix)?;
        if self.min_cds_size == 0 {
            bail!("minimum CDS size must be positive");
        }
        Ok(())
    }
}

fn validate_locus_tag_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        bail!("locus tag prefix must not be empty");
    }
    if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        bail!("invalid locus tag prefix '{prefix}': expected letters, digits or '_'");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(json.as_bytes()).unwrap();
        f
    }

    #[test]
    fn valid_config_all_fields() {
        let f = write_config(r#"{ "locusTagPrefix": "MUS", "minCdsSize": 120 }"#);
        let config = ConversionConfig::from_file(f.path()).unwrap();
        assert_eq!(config.locus_tag_prefix, "MUS");
        assert_eq!(config.min_cds_size, 120);
    }

    #[test]
    fn min_cds_size_defaults() {
        let f = write_config(r#"{ "locusTagPrefix": "MUS" }"#);
        let config = ConversionConfig::from_file(f.path()).unwrap();
        assert_eq!(config.min_cds_size, DEFAULT_MIN_CDS_SIZE);
        assert_eq!(config, ConversionConfig::new("MUS"));
    }

    #[test]
    fn invalid_prefix() {
        let f = write_config(r#"{ "locusTagPrefix": "MUS-1" }"#);
        let err = ConversionConfig::from_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("invalid locus tag prefix"));
    }

    #[test]
    fn unknown_field() {
        let f = write_config(r#"{ "locusTagPrefix": "MUS", "verbose": true }"#);
        let err = ConversionConfig::from_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse config file"));
    }

    #[test]
    fn zero_min_cds_size() {
        let mut config = ConversionConfig::new("MUS");
        config.min_cds_size = 0;
        assert!(config.validate().is_err());
    }
}
