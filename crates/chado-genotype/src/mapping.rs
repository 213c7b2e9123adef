//! Which record reports a matched feature in a genotype.
//!
//! Curated data can hold the same entity at several granularities (allele,
//! construct, insertion). The rules are tried in order. The first to answer
//! decides.

use chado_core::{FeatureIdKind, FeatureRecord};
use chado_db::queries::{
    allele_construct_insertion_chains, designated_insertions_of_allele, feature_has_pub,
    unspecified_insertions_of_construct,
};
use chado_db::{Lookup, Result};

use crate::component::ResolveContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mapping {
    Report {
        feature: FeatureRecord,
        at_locus: bool,
    },
    Reject(String),
}

pub type MappingRule = fn(&ResolveContext<'_>, &FeatureRecord) -> Result<Option<Mapping>>;

pub const MAPPING_RULES: &[(&str, MappingRule)] = &[
    ("construct_to_unspecified_insertion", construct_to_unspecified_insertion),
    ("non_allele_as_is", non_allele_as_is),
    ("allele_to_designated_insertion", allele_to_designated_insertion),
    ("allele_via_construct_chain", allele_via_construct_chain),
];

/// Apply [`MAPPING_RULES`], returning the deciding rule's name with its mapping.
pub fn map_to_public_feature(
    ctx: &ResolveContext<'_>,
    matched: &FeatureRecord,
) -> Result<(&'static str, Mapping)> {
    for (name, rule) in MAPPING_RULES {
        if let Some(mapping) = rule(ctx, matched)? {
            return Ok((name, mapping));
        }
    }
    Ok((
        "unmapped",
        Mapping::Report {
            feature: matched.clone(),
            at_locus: true,
        },
    ))
}

/// A construct is reported as its single `...unspecified` insertion.
pub fn construct_to_unspecified_insertion(
    ctx: &ResolveContext<'_>,
    matched: &FeatureRecord,
) -> Result<Option<Mapping>> {
    if matched.kind() != FeatureIdKind::Construct {
        return Ok(None);
    }
    let insertions = unspecified_insertions_of_construct(
        ctx.conn,
        matched.feature_id,
        &ctx.config.unspecified_insertion_pub,
    )?;
    Ok(Lookup::from_rows(insertions)
        .found()
        .map(|feature| Mapping::Report {
            feature,
            at_locus: false,
        }))
}

pub fn non_allele_as_is(
    _ctx: &ResolveContext<'_>,
    matched: &FeatureRecord,
) -> Result<Option<Mapping>> {
    if matched.kind() == FeatureIdKind::Allele {
        return Ok(None);
    }
    Ok(Some(Mapping::Report {
        feature: matched.clone(),
        at_locus: true,
    }))
}

/// An allele flagged with one representative insertion is reported as that insertion.
pub fn allele_to_designated_insertion(
    ctx: &ResolveContext<'_>,
    matched: &FeatureRecord,
) -> Result<Option<Mapping>> {
    let insertions = designated_insertions_of_allele(ctx.conn, matched.feature_id)?;
    Ok(Lookup::from_rows(insertions)
        .found()
        .map(|feature| Mapping::Report {
            feature,
            at_locus: true,
        }))
}

/// allele → construct → `...unspecified` insertion. Several chains are narrowed
/// to those whose construct is linked to the curated publication.
pub fn allele_via_construct_chain(
    ctx: &ResolveContext<'_>,
    matched: &FeatureRecord,
) -> Result<Option<Mapping>> {
    let chains = allele_construct_insertion_chains(ctx.conn, matched.feature_id)?;
    let mapping = match Lookup::from_rows(chains) {
        Lookup::NotFound => Mapping::Report {
            feature: matched.clone(),
            at_locus: true,
        },
        Lookup::Found(chain) => Mapping::Report {
            feature: chain.insertion,
            at_locus: false,
        },
        Lookup::Ambiguous(chains) => {
            let constructs = chains
                .iter()
                .map(|c| c.construct.uniquename.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let mut linked = Vec::new();
            for chain in chains {
                if feature_has_pub(ctx.conn, chain.construct.feature_id, ctx.pub_id)? {
                    linked.push(chain);
                }
            }
            match Lookup::from_rows(linked) {
                Lookup::Found(chain) => Mapping::Report {
                    feature: chain.insertion,
                    at_locus: false,
                },
                _ => Mapping::Reject(format!(
                    "ambiguous mapping to many constructs ({}) that the reference does not resolve",
                    constructs
                )),
            }
        }
    };
    Ok(Some(mapping))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ChadoCache;
    use crate::config::GenotypeConfig;
    use crate::testutil::Fixture;
    use chado_db::vocab;

    fn record(fx: &Fixture, feature_id: i64) -> FeatureRecord {
        chado_db::lookup::feature_lookup(&fx.conn, &fx.uniquename(feature_id), Default::default())
            .unwrap()
    }

    fn apply(fx: &Fixture, feature_id: i64) -> (&'static str, Mapping) {
        let config = GenotypeConfig::default();
        let mut cache = ChadoCache::new();
        let ctx = ResolveContext::new(&fx.conn, &config, fx.pub_id, &mut cache);
        map_to_public_feature(&ctx, &record(fx, feature_id)).unwrap()
    }

    #[test]
    fn test_rules_are_ordered() {
        let names: Vec<_> = MAPPING_RULES.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "construct_to_unspecified_insertion",
                "non_allele_as_is",
                "allele_to_designated_insertion",
                "allele_via_construct_chain",
            ]
        );
    }

    #[test]
    fn test_construct_reported_as_unspecified_insertion() {
        let fx = Fixture::new();
        let tp = fx.feature("FBtp0000001", "P{UAS-wg}", vocab::CONSTRUCT);
        let ti = fx.feature("FBti0000001", "P{UAS-wg}unspecified", vocab::INSERTION);
        fx.relate_with_pub(ti, tp, vocab::PRODUCEDBY, crate::config::UNSPECIFIED_INSERTION_PUB);

        let (rule, mapping) = apply(&fx, tp);
        assert_eq!(rule, "construct_to_unspecified_insertion");
        assert_eq!(
            mapping,
            Mapping::Report {
                feature: record(&fx, ti),
                at_locus: false
            }
        );
    }

    #[test]
    fn test_construct_without_insertion_is_reported_as_is() {
        let fx = Fixture::new();
        let tp = fx.feature("FBtp0000001", "P{UAS-wg}", vocab::CONSTRUCT);
        let (rule, mapping) = apply(&fx, tp);
        assert_eq!(rule, "non_allele_as_is");
        assert!(matches!(mapping, Mapping::Report { at_locus: true, .. }));
    }

    #[test]
    fn test_designated_insertion_wins_over_chain() {
        let fx = Fixture::new();
        let al = fx.feature("FBal0000001", "wg[MI]", vocab::ALLELE);
        let ti = fx.feature("FBti0000001", "Mi{MIC}wg[MI]", vocab::INSERTION);
        let rel = fx.relate(al, ti, vocab::ASSOCIATED_WITH);
        fx.mark_representative(rel);

        let (rule, mapping) = apply(&fx, al);
        assert_eq!(rule, "allele_to_designated_insertion");
        assert_eq!(
            mapping,
            Mapping::Report {
                feature: record(&fx, ti),
                at_locus: true
            }
        );
    }

    #[test]
    fn test_allele_chain_outcomes() {
        let fx = Fixture::new();
        let al = fx.feature("FBal0000001", "wg[UAS]", vocab::ALLELE);

        // No chain: the allele itself.
        let (_, mapping) = apply(&fx, al);
        assert_eq!(
            mapping,
            Mapping::Report {
                feature: record(&fx, al),
                at_locus: true
            }
        );

        let tp1 = fx.feature("FBtp0000001", "P{UAS-wg.A}", vocab::CONSTRUCT);
        let ti1 = fx.feature("FBti0000001", "P{UAS-wg.A}unspecified", vocab::INSERTION);
        fx.relate(al, tp1, vocab::ASSOCIATED_WITH);
        fx.relate(ti1, tp1, vocab::PRODUCEDBY);
        let (rule, mapping) = apply(&fx, al);
        assert_eq!(rule, "allele_via_construct_chain");
        assert_eq!(
            mapping,
            Mapping::Report {
                feature: record(&fx, ti1),
                at_locus: false
            }
        );

        let tp2 = fx.feature("FBtp0000002", "P{UAS-wg.B}", vocab::CONSTRUCT);
        let ti2 = fx.feature("FBti0000002", "P{UAS-wg.B}unspecified", vocab::INSERTION);
        fx.relate(al, tp2, vocab::ASSOCIATED_WITH);
        fx.relate(ti2, tp2, vocab::PRODUCEDBY);
        let (_, mapping) = apply(&fx, al);
        assert!(matches!(mapping, Mapping::Reject(ref m) if m.contains("ambiguous mapping to many constructs")));

        fx.link_pub(tp2, fx.pub_id);
        let (_, mapping) = apply(&fx, al);
        assert_eq!(
            mapping,
            Mapping::Report {
                feature: record(&fx, ti2),
                at_locus: false
            }
        );
    }
}
