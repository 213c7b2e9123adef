use serde::{Deserialize, Serialize};

use crate::ids::FeatureIdKind;

/// A row of the `feature` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub feature_id: i64,
    pub uniquename: String,
    pub name: String,
    pub organism_id: i64,
    pub type_id: i64,
    pub is_obsolete: bool,
    pub is_analysis: bool,
}

impl FeatureRecord {
    pub fn kind(&self) -> FeatureIdKind {
        FeatureIdKind::from_uniquename(&self.uniquename)
    }
}

/// Descriptive info for a feature: its current symbol, category and organism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub feature_id: i64,
    pub uniquename: String,
    pub name: String,
    /// Current symbol in internal markup form (e.g. `wg[1]`, `Hsp70&agr;`).
    pub symbol: String,
    /// Name of the feature's type cvterm (`allele`, `insertion`, `bogus symbol`, ...).
    pub type_name: String,
    pub organism_abbreviation: String,
}

impl FeatureSummary {
    pub fn kind(&self) -> FeatureIdKind {
        FeatureIdKind::from_uniquename(&self.uniquename)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganismRecord {
    pub organism_id: i64,
    pub abbreviation: String,
    pub genus: String,
    pub species: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvtermRecord {
    pub cvterm_id: i64,
    pub cv_name: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbRecord {
    pub db_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubRecord {
    pub pub_id: i64,
    pub uniquename: String,
}

/// A persisted genotype row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenotypeRecord {
    pub genotype_id: i64,
    pub uniquename: String,
    pub description: Option<String>,
    pub is_obsolete: bool,
}

/// One feature bound to a persisted genotype, tagged with its group and rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenotypeComponent {
    pub cgroup: i64,
    pub rank: i64,
    pub feature_id: i64,
    pub uniquename: String,
    pub name: String,
}
