use std::path::Path;

use chado_db::vocab;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Evidence publication attached to construct → `...unspecified` insertion links.
pub const UNSPECIFIED_INSERTION_PUB: &str = "FBrf0105495";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Fixed names the genotype engine resolves against the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenotypeConfig {
    /// Database whose dbxrefs hold genotype curies.
    pub flybase_db: String,
    /// Publication current symbols are attributed to.
    pub unattributed_pub: String,
    /// Organism abbreviation given to the literal `+` placeholder.
    pub unknown_organism: String,
    /// Evidence reference that marks a construct's `...unspecified` insertion.
    pub unspecified_insertion_pub: String,
    /// `taxgroup` organismprop value that parental genes must carry.
    pub taxgroup: String,
    /// Letters before the zero-padded number, e.g. `FBgo`.
    pub curie_prefix: String,
    /// Name of the id sequence curies are minted from.
    pub curie_sequence: String,
}

impl Default for GenotypeConfig {
    fn default() -> Self {
        Self {
            flybase_db: vocab::FLYBASE_DB.to_string(),
            unattributed_pub: vocab::UNATTRIBUTED_PUB.to_string(),
            unknown_organism: vocab::UNKNOWN_ORGANISM.to_string(),
            unspecified_insertion_pub: UNSPECIFIED_INSERTION_PUB.to_string(),
            taxgroup: vocab::DROSOPHILID.to_string(),
            curie_prefix: "FBgo".to_string(),
            curie_sequence: "genotype_curie_seq".to_string(),
        }
    }
}

impl GenotypeConfig {
    /// Parse a JSON object; absent keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GenotypeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix_ok = (2..=4).contains(&self.curie_prefix.len())
            && self.curie_prefix.chars().all(|c| c.is_ascii_alphabetic());
        if !prefix_ok {
            return Err(ConfigError::Invalid(format!(
                "curie_prefix must be 2-4 letters, got {:?}",
                self.curie_prefix
            )));
        }
        if self.curie_sequence.is_empty() {
            return Err(ConfigError::Invalid("curie_sequence must not be empty".to_string()));
        }
        Ok(())
    }
}
