//! Fixed names of the controlled-vocabulary rows the curation code relies on.

pub const CV_SO: &str = "SO";
pub const CV_RELATIONSHIP_TYPE: &str = "relationship type";
pub const CV_SYNONYM_TYPE: &str = "synonym type";
pub const CV_PROPERTY_TYPE: &str = "property type";
pub const CV_MISC: &str = "FlyBase miscellaneous CV";

pub const GENE: &str = "gene";
pub const ALLELE: &str = "allele";
pub const INSERTION: &str = "transposable_element_insertion_site";
pub const CONSTRUCT: &str = "transgenic_transposable_element";
pub const CHROMOSOME_STRUCTURE_VARIATION: &str = "chromosome_structure_variation";
pub const BOGUS_SYMBOL: &str = "bogus symbol";

pub const ALLELEOF: &str = "alleleof";
pub const ASSOCIATED_WITH: &str = "associated_with";
pub const PRODUCEDBY: &str = "producedby";

pub const SYMBOL: &str = "symbol";
pub const TAXGROUP: &str = "taxgroup";
/// Marks the associated insertion an allele should be reported as in genotypes.
pub const GENOTYPE_REPRESENTATIVE: &str = "genotype_representative";

pub const IN_VITRO_CONSTRUCT: &str = "in vitro construct";
pub const MISEXPRESSION_ELEMENT: &str = "misexpression element";

pub const DROSOPHILID: &str = "drosophilid";
pub const FLYBASE_DB: &str = "FlyBase";
pub const UNATTRIBUTED_PUB: &str = "unattributed";
pub const UNKNOWN_ORGANISM: &str = "Unknown";

pub const SO_TERMS: &[&str] = &[
    GENE,
    ALLELE,
    INSERTION,
    CONSTRUCT,
    CHROMOSOME_STRUCTURE_VARIATION,
    BOGUS_SYMBOL,
];
pub const RELATIONSHIP_TERMS: &[&str] = &[ALLELEOF, ASSOCIATED_WITH, PRODUCEDBY];
pub const SYNONYM_TERMS: &[&str] = &[SYMBOL];
pub const PROPERTY_TERMS: &[&str] = &[TAXGROUP, GENOTYPE_REPRESENTATIVE];
pub const MISC_TERMS: &[&str] = &[IN_VITRO_CONSTRUCT, MISEXPRESSION_ELEMENT];
