use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

lazy_static! {
    /// Public feature identifiers the genotype engine is allowed to report.
    static ref FEATURE_ID_RE: Regex =
        Regex::new(r"^FB(al|ab|ba|gn|ti|tp|te|sf)[0-9]{7}$").unwrap();
    static ref CURIE_RE: Regex = Regex::new(r"^([A-Za-z]{2,4})([0-9]{7})$").unwrap();
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurieError {
    #[error("Malformed curie: {0}")]
    Malformed(String),
    #[error("Curie {curie} does not carry the expected prefix {expected}")]
    WrongPrefix { curie: String, expected: String },
}

/// Entity class encoded in the prefix of a FlyBase uniquename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureIdKind {
    Allele,
    Aberration,
    Balancer,
    Gene,
    Insertion,
    Construct,
    TransposableElement,
    SeqFeature,
    Genotype,
    #[serde(other)]
    Other,
}

impl FeatureIdKind {
    pub fn from_uniquename(uniquename: &str) -> Self {
        match uniquename.get(..4) {
            Some("FBal") => FeatureIdKind::Allele,
            Some("FBab") => FeatureIdKind::Aberration,
            Some("FBba") => FeatureIdKind::Balancer,
            Some("FBgn") => FeatureIdKind::Gene,
            Some("FBti") => FeatureIdKind::Insertion,
            Some("FBtp") => FeatureIdKind::Construct,
            Some("FBte") => FeatureIdKind::TransposableElement,
            Some("FBsf") => FeatureIdKind::SeqFeature,
            Some("FBgo") => FeatureIdKind::Genotype,
            _ => FeatureIdKind::Other,
        }
    }

    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            FeatureIdKind::Allele => Some("FBal"),
            FeatureIdKind::Aberration => Some("FBab"),
            FeatureIdKind::Balancer => Some("FBba"),
            FeatureIdKind::Gene => Some("FBgn"),
            FeatureIdKind::Insertion => Some("FBti"),
            FeatureIdKind::Construct => Some("FBtp"),
            FeatureIdKind::TransposableElement => Some("FBte"),
            FeatureIdKind::SeqFeature => Some("FBsf"),
            FeatureIdKind::Genotype => Some("FBgo"),
            FeatureIdKind::Other => None,
        }
    }

    /// SQL `LIKE` pattern matching uniquenames of this kind.
    pub fn like_pattern(&self) -> Option<String> {
        self.prefix().map(|p| format!("{}%", p))
    }
}

/// True if `uniquename` is a well-formed public feature id (FBal, FBti, ...).
pub fn is_feature_id(uniquename: &str) -> bool {
    FEATURE_ID_RE.is_match(uniquename)
}

/// True if `description` is exactly one insertion id (a one-component group).
pub fn is_single_insertion_id(description: &str) -> bool {
    is_feature_id(description)
        && FeatureIdKind::from_uniquename(description) == FeatureIdKind::Insertion
}

/// Format a sequence value as a 7-digit zero-padded curie, e.g. `FBgo0000042`.
pub fn format_curie(prefix: &str, number: i64) -> String {
    format!("{}{:07}", prefix, number)
}

/// Split a curie into its prefix and numeric part, checking the prefix.
pub fn parse_curie(curie: &str, expected_prefix: &str) -> Result<i64, CurieError> {
    let caps = CURIE_RE
        .captures(curie)
        .ok_or_else(|| CurieError::Malformed(curie.to_string()))?;
    if &caps[1] != expected_prefix {
        return Err(CurieError::WrongPrefix {
            curie: curie.to_string(),
            expected: expected_prefix.to_string(),
        });
    }
    caps[2]
        .parse::<i64>()
        .map_err(|_| CurieError::Malformed(curie.to_string()))
}
