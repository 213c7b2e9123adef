use chado_core::{FeatureIdKind, FeatureRecord, FeatureSummary};
use chado_db::vocab;
use rusqlite::Connection;
use serde::Serialize;

use crate::cache::ChadoCache;
use crate::config::GenotypeConfig;

/// Shared state for resolving the groups of one genotype.
pub struct ResolveContext<'a> {
    pub conn: &'a Connection,
    pub config: &'a GenotypeConfig,
    /// Publication used to choose between several candidate constructs.
    pub pub_id: i64,
    pub cache: &'a mut ChadoCache,
}

impl<'a> ResolveContext<'a> {
    pub fn new(
        conn: &'a Connection,
        config: &'a GenotypeConfig,
        pub_id: i64,
        cache: &'a mut ChadoCache,
    ) -> Self {
        Self {
            conn,
            config,
            pub_id,
            cache,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentalGene {
    pub feature_id: i64,
    pub uniquename: String,
    pub name: String,
}

/// One input symbol of a complementation group and what it resolved to.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentFeature {
    pub input_symbol: String,
    pub plain_symbol: String,
    /// Feature chosen to represent the symbol, before descriptive info is fetched.
    pub feature: Option<FeatureRecord>,
    pub summary: Option<FeatureSummary>,
    pub at_locus: bool,
    pub single_cgroup: bool,
    pub input_feature_replaced: bool,
    pub misexpression_element: bool,
    /// A bogus-symbol placeholder was created for this symbol.
    pub is_new: bool,
    pub parental_gene: Option<ParentalGene>,
}

impl ComponentFeature {
    pub fn new(input_symbol: impl Into<String>) -> Self {
        Self {
            input_symbol: input_symbol.into(),
            plain_symbol: String::new(),
            feature: None,
            summary: None,
            at_locus: true,
            single_cgroup: true,
            input_feature_replaced: false,
            misexpression_element: false,
            is_new: false,
            parental_gene: None,
        }
    }

    pub fn feature_id(&self) -> Option<i64> {
        self.summary
            .as_ref()
            .map(|s| s.feature_id)
            .or_else(|| self.feature.as_ref().map(|f| f.feature_id))
    }

    pub fn uniquename(&self) -> Option<&str> {
        self.summary
            .as_ref()
            .map(|s| s.uniquename.as_str())
            .or_else(|| self.feature.as_ref().map(|f| f.uniquename.as_str()))
    }

    /// Current symbol, falling back to the input text before resolution.
    pub fn symbol(&self) -> &str {
        self.summary
            .as_ref()
            .map_or(self.input_symbol.as_str(), |s| s.symbol.as_str())
    }

    pub fn type_name(&self) -> Option<&str> {
        self.summary.as_ref().map(|s| s.type_name.as_str())
    }

    pub fn kind(&self) -> FeatureIdKind {
        self.uniquename()
            .map_or(FeatureIdKind::Other, FeatureIdKind::from_uniquename)
    }

    pub fn is_bogus_symbol(&self) -> bool {
        self.type_name() == Some(vocab::BOGUS_SYMBOL)
    }
}

/// `+`, `x[+]` and `x[-]` may stand for a placeholder when no real feature matches.
pub fn is_bogus_symbol_input(symbol: &str) -> bool {
    symbol == "+" || symbol.ends_with("[+]") || symbol.ends_with("[-]")
}

/// Gene a placeholder stands for: `wg[+]` → `wg`. Other text comes back unchanged.
pub fn implied_gene_name(symbol: &str) -> &str {
    symbol
        .strip_suffix("[+]")
        .or_else(|| symbol.strip_suffix("[-]"))
        .unwrap_or(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bogus_symbol_input() {
        assert!(is_bogus_symbol_input("+"));
        assert!(is_bogus_symbol_input("wg[+]"));
        assert!(is_bogus_symbol_input("wg[-]"));
        assert!(!is_bogus_symbol_input("wg[1]"));
        assert!(!is_bogus_symbol_input("++"));
    }

    #[test]
    fn test_implied_gene_name() {
        assert_eq!(implied_gene_name("wg[+]"), "wg");
        assert_eq!(implied_gene_name("Hsp70Aa[-]"), "Hsp70Aa");
        assert_eq!(implied_gene_name("+"), "+");
    }

    #[test]
    fn test_unresolved_component_defaults() {
        let c = ComponentFeature::new("wg[1]");
        assert!(c.at_locus);
        assert!(c.single_cgroup);
        assert_eq!(c.feature_id(), None);
        assert_eq!(c.symbol(), "wg[1]");
        assert_eq!(c.kind(), FeatureIdKind::Other);
        assert!(!c.is_bogus_symbol());
    }
}
