use std::collections::{BTreeMap, BTreeSet};

use chado_core::{is_single_insertion_id, FeatureIdKind, FeatureSummary};
use chado_db::genotype::find_current_genotype;
use chado_db::queries::genes_compatible_with_insertion;
use chado_db::upsert::{
    upsert_by_unique_key, NewFeatureGenotype, NewGenotype, NewGenotypeSynonym, NewSynonym,
};
use chado_db::{ChadoError, Lookup, Result};
use chado_markup::sub_sup_to_sgml;
use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::ChadoCache;
use crate::cgroup::ComplementationGroup;
use crate::component::ResolveContext;
use crate::config::GenotypeConfig;
use crate::mint::mint_curie;

/// A genotype parsed from curated text.
///
/// Construction resolves and checks every complementation group without
/// writing anything except bogus-symbol placeholders. Inspect `errors`, then
/// call [`GenotypeAnnotation::get_known_or_create_new`] to bind or create the
/// persisted genotype. Transactions belong to the caller.
#[derive(Debug, Serialize)]
pub struct GenotypeAnnotation {
    pub input: String,
    /// Publication used to disambiguate construct mappings.
    pub pub_id: i64,
    pub cgroups: Vec<ComplementationGroup>,
    /// Group rank → index into `cgroups`, ordered by group name.
    pub cgroup_ranks: BTreeMap<usize, usize>,
    /// Resolved features other than bogus-symbol placeholders, by feature_id.
    pub features: BTreeMap<i64, FeatureSummary>,
    pub uniquename: Option<String>,
    pub description: Option<String>,
    pub curie: Option<String>,
    pub genotype_id: Option<i64>,
    pub is_new: bool,
    pub notes: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    #[serde(skip)]
    config: GenotypeConfig,
    #[serde(skip)]
    cache: ChadoCache,
}

impl GenotypeAnnotation {
    #[tracing::instrument(skip(conn, config))]
    pub fn new(input: &str, conn: &Connection, pub_id: i64, config: &GenotypeConfig) -> Result<Self> {
        let mut annotation = Self {
            input: input.to_string(),
            pub_id,
            cgroups: Vec::new(),
            cgroup_ranks: BTreeMap::new(),
            features: BTreeMap::new(),
            uniquename: None,
            description: None,
            curie: None,
            genotype_id: None,
            is_new: false,
            notes: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
            config: config.clone(),
            cache: ChadoCache::new(),
        };
        let mut cache = std::mem::take(&mut annotation.cache);
        let mut ctx = ResolveContext::new(conn, config, pub_id, &mut cache);
        annotation.parse(&mut ctx)?;
        annotation.cache = cache;

        if annotation.errors.is_empty() {
            info!(uniquename = ?annotation.uniquename, "parsed genotype");
        } else {
            warn!(errors = annotation.errors.len(), "genotype has errors");
        }
        Ok(annotation)
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Complementation groups in canonical rank order.
    pub fn ranked_cgroups(&self) -> impl Iterator<Item = (usize, &ComplementationGroup)> {
        self.cgroup_ranks
            .iter()
            .map(move |(&rank, &index)| (rank, &self.cgroups[index]))
    }

    fn parse(&mut self, ctx: &mut ResolveContext<'_>) -> Result<()> {
        for token in self.input.split(' ').filter(|t| !t.is_empty()) {
            let mut group = ComplementationGroup::new(token);
            group.process(ctx)?;
            self.cgroups.push(group);
        }
        if self.cgroups.is_empty() {
            self.errors
                .push(format!("{:?}: no complementation groups in genotype", self.input));
            return Ok(());
        }

        for group in &self.cgroups {
            for summary in group.features() {
                self.features.insert(summary.feature_id, summary.clone());
            }
            self.notes.extend(group.notes.iter().cloned());
            self.warnings.extend(group.warnings.iter().cloned());
            self.errors.extend(group.errors.iter().cloned());
        }

        if self.errors.is_empty() {
            self.remove_less_informative_cgroups();
            self.remove_redundant_cgroups();
            self.reassign_insertions(ctx)?;
        }
        self.check_gene_uniqueness();
        if self.errors.is_empty() {
            self.compute_identity();
        }
        Ok(())
    }

    /// Drop a single-insertion group when another group already names that insertion.
    fn remove_less_informative_cgroups(&mut self) {
        let descriptions: Vec<Option<String>> =
            self.cgroups.iter().map(|g| g.description.clone()).collect();
        let mut keep = vec![true; self.cgroups.len()];
        for (i, description) in descriptions.iter().enumerate() {
            let Some(description) = description else {
                continue;
            };
            if !is_single_insertion_id(description) {
                continue;
            }
            let subsumed_by = descriptions.iter().enumerate().find(|(j, other)| {
                *j != i
                    && keep[*j]
                    && other
                        .as_deref()
                        .is_some_and(|o| o != description && o.contains(description.as_str()))
            });
            if let Some((j, _)) = subsumed_by {
                keep[i] = false;
                self.notes.push(format!(
                    "{}: dropped, {} is already described by {}",
                    self.cgroups[i].input, description, self.cgroups[j].input
                ));
            }
        }
        let mut keep = keep.into_iter();
        self.cgroups.retain(|_| keep.next().unwrap_or(true));
    }

    fn remove_redundant_cgroups(&mut self) {
        let mut seen = BTreeSet::new();
        let mut dropped = Vec::new();
        self.cgroups.retain(|g| {
            let first = seen.insert(g.description.clone());
            if !first {
                dropped.push(g.input.clone());
            }
            first
        });
        for input in dropped {
            self.notes
                .push(format!("{}: dropped, duplicates another group", input));
        }
    }

    /// Merge a lone insertion into the lone classical allele of the gene it disrupts.
    ///
    /// Only donor/receptor pairs that match each other and nothing else are merged.
    fn reassign_insertions(&mut self, ctx: &mut ResolveContext<'_>) -> Result<()> {
        let donors: Vec<usize> = (0..self.cgroups.len())
            .filter(|&i| is_insertion_donor(&self.cgroups[i]))
            .collect();
        let receptors: Vec<(usize, i64)> = (0..self.cgroups.len())
            .filter_map(|i| {
                let group = &self.cgroups[i];
                is_allele_receptor(group).then_some((i, group.gene_locus_id?))
            })
            .collect();
        if donors.is_empty() || receptors.is_empty() {
            return Ok(());
        }

        let mut candidates: Vec<(usize, usize)> = Vec::new();
        for &donor in &donors {
            let Some(insertion_id) = self.cgroups[donor].components[0].feature_id() else {
                continue;
            };
            let genes = genes_compatible_with_insertion(ctx.conn, insertion_id, &ctx.config.taxgroup)?;
            for &(receptor, gene_id) in &receptors {
                if genes.contains(&gene_id) {
                    candidates.push((donor, receptor));
                }
            }
        }
        let pairs: Vec<(usize, usize)> = candidates
            .iter()
            .copied()
            .filter(|&(d, r)| {
                candidates.iter().filter(|(d2, _)| *d2 == d).count() == 1
                    && candidates.iter().filter(|(_, r2)| *r2 == r).count() == 1
            })
            .collect();

        let mut replaced: BTreeMap<usize, Option<ComplementationGroup>> = BTreeMap::new();
        for (donor, receptor) in pairs {
            let merged_input = format!(
                "{}/{}",
                self.cgroups[donor].input, self.cgroups[receptor].input
            );
            let mut merged = ComplementationGroup::new(merged_input.as_str());
            merged.process(ctx)?;
            if merged.is_clean() {
                debug!(merged = %merged_input, "reassigned insertion to classical group");
                self.notes.push(format!(
                    "{}: merged {} into {}",
                    merged_input, self.cgroups[donor].input, self.cgroups[receptor].input
                ));
                extend_unique(&mut self.notes, &merged.notes);
                extend_unique(&mut self.warnings, &merged.warnings);
                replaced.insert(donor.min(receptor), Some(merged));
                replaced.insert(donor.max(receptor), None);
            } else {
                self.notes.push(format!(
                    "{}: not merged ({})",
                    merged_input,
                    merged.errors.join("; ")
                ));
            }
        }
        if replaced.is_empty() {
            return Ok(());
        }

        let groups = std::mem::take(&mut self.cgroups);
        for (i, group) in groups.into_iter().enumerate() {
            match replaced.remove(&i) {
                Some(Some(merged)) => self.cgroups.push(merged),
                Some(None) => {}
                None => self.cgroups.push(group),
            }
        }
        Ok(())
    }

    /// Classical alleles of one gene must share a single complementation group.
    fn check_gene_uniqueness(&mut self) {
        let mut groups_by_gene: BTreeMap<i64, (String, String, BTreeSet<usize>)> = BTreeMap::new();
        for (i, group) in self.cgroups.iter().enumerate() {
            for component in group.components.iter().filter(|c| c.at_locus) {
                if let Some(gene) = &component.parental_gene {
                    groups_by_gene
                        .entry(gene.feature_id)
                        .or_insert_with(|| (gene.name.clone(), gene.uniquename.clone(), BTreeSet::new()))
                        .2
                        .insert(i);
                }
            }
        }
        for (name, uniquename, groups) in groups_by_gene.into_values() {
            if groups.len() > 1 {
                self.errors.push(format!(
                    "Classical alleles for gene {} ({}) are listed in {} different complementation groups",
                    name,
                    uniquename,
                    groups.len()
                ));
            }
        }
    }

    fn compute_identity(&mut self) {
        let mut order: Vec<usize> = (0..self.cgroups.len()).collect();
        order.sort_by(|&a, &b| {
            let (ga, gb) = (&self.cgroups[a], &self.cgroups[b]);
            (&ga.name, &ga.description).cmp(&(&gb.name, &gb.description))
        });
        self.cgroup_ranks = order.iter().copied().enumerate().collect();

        let names: Vec<&str> = order
            .iter()
            .filter_map(|&i| self.cgroups[i].name.as_deref())
            .collect();
        let mut descriptions: Vec<&str> = self
            .cgroups
            .iter()
            .filter_map(|g| g.description.as_deref())
            .collect();
        descriptions.sort_unstable();
        let uniquename = names.join(" ");
        let description = descriptions.join("_");
        self.uniquename = Some(uniquename);
        self.description = Some(description);
    }

    /// Bind this annotation to its persisted genotype, creating one with a fresh curie if none exists.
    ///
    /// Does nothing when the annotation has errors. Drift between the stored and
    /// computed description is recorded as an error and nothing is written.
    #[tracing::instrument(skip(self, conn), fields(uniquename = ?self.uniquename))]
    pub fn get_known_or_create_new(&mut self, conn: &Connection) -> Result<()> {
        if !self.errors.is_empty() {
            warn!("not persisting a genotype with errors");
            return Ok(());
        }
        let (Some(uniquename), Some(description)) = (self.uniquename.clone(), self.description.clone())
        else {
            return Ok(());
        };

        match find_current_genotype(conn, &uniquename, &self.config.flybase_db, &self.config.curie_prefix)? {
            Lookup::Found(existing) => {
                let stored = existing.genotype.description.as_deref().unwrap_or_default();
                if stored != description {
                    self.errors.push(format!(
                        "{}: description mismatch, chado has {} but computed {}",
                        uniquename, stored, description
                    ));
                    return Ok(());
                }
                debug!(curie = %existing.curie, "genotype already known");
                self.curie = Some(existing.curie);
                self.genotype_id = Some(existing.genotype.genotype_id);
                self.is_new = false;
                return Ok(());
            }
            Lookup::Ambiguous(rows) => {
                return Err(ChadoError::Ambiguous {
                    what: "genotype".to_string(),
                    key: uniquename,
                    count: rows.len(),
                })
            }
            Lookup::NotFound => {}
        }

        let (genotype_id, created) = upsert_by_unique_key(
            conn,
            &NewGenotype {
                uniquename: uniquename.clone(),
                description,
            },
        )?;
        if !created {
            self.errors.push(format!(
                "{}: genotype exists without a current {} curie",
                uniquename, self.config.curie_prefix
            ));
            return Ok(());
        }

        let curie = mint_curie(conn, &self.config, &mut self.cache, genotype_id)?;
        self.bind_components(conn, genotype_id)?;
        self.assign_current_symbol(conn, genotype_id, &uniquename)?;

        info!(%curie, genotype_id, "created genotype");
        self.curie = Some(curie);
        self.genotype_id = Some(genotype_id);
        self.is_new = true;
        Ok(())
    }

    fn bind_components(&self, conn: &Connection, genotype_id: i64) -> Result<()> {
        for (cgroup, group) in self.ranked_cgroups() {
            for (rank, component) in group.ranked().enumerate() {
                let Some(feature_id) = component.feature_id() else {
                    continue;
                };
                upsert_by_unique_key(
                    conn,
                    &NewFeatureGenotype {
                        feature_id,
                        genotype_id,
                        cgroup: cgroup as i64,
                        rank: rank as i64,
                    },
                )?;
            }
        }
        Ok(())
    }

    fn assign_current_symbol(&mut self, conn: &Connection, genotype_id: i64, uniquename: &str) -> Result<()> {
        let symbol_type = self.cache.symbol_term(conn)?.cvterm_id;
        let unattributed = self.cache.unattributed_pub(conn, &self.config)?;
        let (synonym_id, _) = upsert_by_unique_key(
            conn,
            &NewSynonym {
                name: uniquename.to_string(),
                synonym_sgml: sub_sup_to_sgml(uniquename),
                type_id: symbol_type,
            },
        )?;
        upsert_by_unique_key(
            conn,
            &NewGenotypeSynonym {
                genotype_id,
                synonym_id,
                pub_id: unattributed.pub_id,
                is_current: true,
                is_internal: false,
            },
        )?;
        Ok(())
    }
}

fn extend_unique(into: &mut Vec<String>, from: &[String]) {
    for message in from {
        if !into.contains(message) {
            into.push(message.clone());
        }
    }
}

/// A lone insertion not yet placed at a gene.
fn is_insertion_donor(group: &ComplementationGroup) -> bool {
    group.is_clean()
        && group.at_locus
        && group.gene_locus_id.is_none()
        && matches!(group.components.as_slice(), [c] if c.kind() == FeatureIdKind::Insertion)
}

/// A lone classical allele with a known gene.
fn is_allele_receptor(group: &ComplementationGroup) -> bool {
    group.is_clean()
        && group.at_locus
        && group.gene_locus_id.is_some()
        && matches!(group.components.as_slice(), [c] if c.kind() == FeatureIdKind::Allele)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::Fixture;
    use chado_db::vocab;

    fn annotate(fx: &Fixture, input: &str) -> GenotypeAnnotation {
        GenotypeAnnotation::new(input, &fx.conn, fx.pub_id, &GenotypeConfig::default()).unwrap()
    }

    fn wg(fx: &Fixture) -> i64 {
        let wg = fx.feature("FBgn0284084", "wg", vocab::GENE);
        for (uniquename, symbol) in [("FBal0018482", "wg[1]"), ("FBal0018483", "wg[CX4]")] {
            let allele = fx.feature(uniquename, symbol, vocab::ALLELE);
            fx.relate(allele, wg, vocab::ALLELEOF);
        }
        wg
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let fx = Fixture::new();
        let annotation = annotate(&fx, "  ");
        assert_eq!(annotation.errors.len(), 1);
        assert!(annotation.uniquename.is_none());
    }

    #[test]
    fn test_identity_is_sorted() {
        let fx = Fixture::new();
        wg(&fx);
        let en = fx.feature("FBgn0000577", "en", vocab::GENE);
        let en1 = fx.feature("FBal0003666", "en[1]", vocab::ALLELE);
        fx.relate(en1, en, vocab::ALLELEOF);

        let annotation = annotate(&fx, "wg[1]/wg[CX4] en[1]");
        assert!(annotation.is_clean(), "{:?}", annotation.errors);
        assert_eq!(annotation.uniquename.as_deref(), Some("en[1] wg[1]/wg[CX4]"));
        assert_eq!(
            annotation.description.as_deref(),
            Some("FBal0003666_FBal0018482|FBal0018483")
        );
        assert_eq!(annotation.features.len(), 3);
        let ranked: Vec<_> = annotation.ranked_cgroups().map(|(r, g)| (r, g.input.as_str())).collect();
        assert_eq!(ranked, vec![(0, "en[1]"), (1, "wg[1]/wg[CX4]")]);
    }

    #[test]
    fn test_duplicate_group_is_dropped() {
        let fx = Fixture::new();
        wg(&fx);
        let annotation = annotate(&fx, "wg[1] wg[1]");
        assert!(annotation.is_clean(), "{:?}", annotation.errors);
        assert_eq!(annotation.cgroups.len(), 1);
        assert_eq!(annotation.uniquename.as_deref(), Some("wg[1]"));
    }

    #[test]
    fn test_gene_split_across_groups() {
        let fx = Fixture::new();
        wg(&fx);
        let annotation = annotate(&fx, "wg[1] wg[CX4]");
        assert_eq!(annotation.errors.len(), 1);
        assert!(annotation.errors[0].contains("different complementation groups"));
        assert!(annotation.uniquename.is_none());
    }

    #[test]
    fn test_insertion_merged_into_allele_group() {
        let fx = Fixture::new();
        let gene = wg(&fx);
        let ti = fx.feature("FBti0000040", "P{lacW}wg[l-17]", vocab::INSERTION);
        let allele = fx.feature("FBal0000040", "wg[l-17]", vocab::ALLELE);
        fx.relate(allele, gene, vocab::ALLELEOF);
        fx.relate(allele, ti, vocab::ASSOCIATED_WITH);

        let annotation = annotate(&fx, "P{lacW}wg[l-17] wg[1]");
        assert!(annotation.is_clean(), "{:?}", annotation.errors);
        assert_eq!(annotation.cgroups.len(), 1);
        assert_eq!(annotation.uniquename.as_deref(), Some("P{lacW}wg[l-17]/wg[1]"));
    }

    #[test]
    fn test_merged_group_diagnostics_are_kept() {
        let fx = Fixture::new();
        let gene = wg(&fx);
        let ti = fx.feature("FBti0000040", "P{lacW}wg[l-17]", vocab::INSERTION);
        let allele = fx.feature("FBal0000040", "wg[l-17]", vocab::ALLELE);
        fx.relate(allele, gene, vocab::ALLELEOF);
        let rel = fx.relate(allele, ti, vocab::ASSOCIATED_WITH);
        fx.mark_representative(rel);

        let annotation = annotate(&fx, "wg[l-17] wg[1]");
        assert!(annotation.is_clean(), "{:?}", annotation.errors);
        assert_eq!(annotation.cgroups.len(), 1);
        let merged = &annotation.cgroups[0];
        assert_eq!(merged.input, "wg[l-17]/wg[1]");
        assert!(!merged.notes.is_empty());
        for note in merged.notes.iter().chain(&merged.warnings) {
            let seen = annotation
                .notes
                .iter()
                .chain(&annotation.warnings)
                .filter(|n| *n == note)
                .count();
            assert_eq!(seen, 1, "{}", note);
        }
        assert!(annotation
            .notes
            .iter()
            .any(|n| n.contains("FBal0000040 reported as FBti0000040")));
    }

    #[test]
    fn test_less_informative_group_is_dropped() {
        let fx = Fixture::new();
        wg(&fx);
        fx.feature("FBti0000040", "P{lacW}l-17", vocab::INSERTION);

        let alone = annotate(&fx, "P{lacW}l-17/wg[1]");
        assert!(alone.is_clean(), "{:?}", alone.errors);

        let annotation = annotate(&fx, "P{lacW}l-17 P{lacW}l-17/wg[1]");
        assert!(annotation.is_clean(), "{:?}", annotation.errors);
        assert_eq!(annotation.cgroups.len(), 1);
        assert_eq!(annotation.cgroups[0].input, "P{lacW}l-17/wg[1]");
        assert!(annotation.notes.iter().any(|n| n
            == "P{lacW}l-17: dropped, FBti0000040 is already described by P{lacW}l-17/wg[1]"));
        assert_eq!(annotation.uniquename, alone.uniquename);
        assert_eq!(annotation.uniquename.as_deref(), Some("P{lacW}l-17/wg[1]"));
    }

    #[test]
    fn test_ambiguous_insertion_is_not_merged() {
        let fx = Fixture::new();
        let gene = wg(&fx);
        let ti = fx.feature("FBti0000040", "P{lacW}wg[l-17]", vocab::INSERTION);
        let allele = fx.feature("FBal0000040", "wg[l-17]", vocab::ALLELE);
        fx.relate(allele, gene, vocab::ALLELEOF);
        fx.relate(allele, ti, vocab::ASSOCIATED_WITH);

        // Two receptors for the same gene also trip the gene check, which is the point:
        // nothing gets merged behind the curator's back.
        let annotation = annotate(&fx, "P{lacW}wg[l-17] wg[1] wg[CX4]");
        assert_eq!(annotation.cgroups.len(), 3);
        assert!(annotation.errors[0].contains("different complementation groups"));
    }
}
