use std::collections::BTreeMap;

use chado_core::{FeatureIdKind, FeatureRecord, FeatureSummary};
use chado_db::lookup::find_features_by_name;
use chado_db::queries::{
    allele_has_misexpression_construct, feature_summary, find_active_features_by_name,
    find_bogus_symbol_feature, has_cvterm_annotation, parental_genes_of_allele,
};
use chado_db::upsert::{
    create_unique, upsert_by_unique_key, NewFeature, NewFeatureSynonym, NewSynonym,
};
use chado_db::{vocab, Lookup, Obsolete, Result};
use chado_markup::{sgml_to_plain_text, sgml_to_unicode, sub_sup_to_sgml};
use serde::Serialize;
use tracing::{debug, info};

use crate::component::{
    implied_gene_name, is_bogus_symbol_input, ComponentFeature, ParentalGene, ResolveContext,
};
use crate::mapping::{map_to_public_feature, Mapping};

/// The components written as `a/b` that occupy one locus of a genotype.
#[derive(Debug, Clone, Serialize)]
pub struct ComplementationGroup {
    /// The group as curated, e.g. `wg[1]/wg[CX4]`.
    pub input: String,
    /// One per `/`-separated symbol, in input order.
    pub components: Vec<ComponentFeature>,
    /// Indices into `components` in rank order. Empty unless the group is clean.
    pub rank_order: Vec<usize>,
    /// Ranked symbols joined by `/`.
    pub name: Option<String>,
    /// Sorted feature uniquenames joined by `|`.
    pub description: Option<String>,
    /// The one parental gene shared by the components, if any.
    pub gene_locus_id: Option<i64>,
    /// True when every component sits at its classical locus.
    pub at_locus: bool,
    pub notes: Vec<String>,
    pub warnings: Vec<String>,
    /// Curation problems. A group with any is never ranked or named.
    pub errors: Vec<String>,
}

impl ComplementationGroup {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            components: Vec::new(),
            rank_order: Vec::new(),
            name: None,
            description: None,
            gene_locus_id: None,
            at_locus: false,
            notes: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Resolve, check and name the group.
    ///
    /// Curation problems end up in `errors`. `Err` is reserved for database
    /// failures and lookups that must have exactly one answer.
    pub fn process(&mut self, ctx: &mut ResolveContext<'_>) -> Result<()> {
        debug!(cgroup = %self.input, "processing complementation group");
        self.identify_features(ctx)?;
        self.describe_features(ctx)?;
        self.validate();
        if self.errors.is_empty() {
            self.rank_and_name();
        }
        Ok(())
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Resolved components other than bogus-symbol placeholders.
    pub fn features(&self) -> impl Iterator<Item = &FeatureSummary> {
        self.components
            .iter()
            .filter(|c| !c.is_bogus_symbol())
            .filter_map(|c| c.summary.as_ref())
    }

    /// Components in rank order.
    pub fn ranked(&self) -> impl Iterator<Item = &ComponentFeature> {
        self.rank_order.iter().map(move |&i| &self.components[i])
    }

    fn identify_features(&mut self, ctx: &mut ResolveContext<'_>) -> Result<()> {
        let symbols: Vec<String> = self.input.split('/').map(str::to_string).collect();
        for symbol in symbols {
            let mut component = ComponentFeature::new(symbol.as_str());
            if symbol.is_empty() {
                self.errors
                    .push(format!("{}: empty component symbol", self.input));
                self.components.push(component);
                continue;
            }
            match sgml_to_plain_text(&symbol) {
                Ok(plain) => component.plain_symbol = plain,
                Err(e) => {
                    self.errors.push(format!("{}: {}", symbol, e));
                    self.components.push(component);
                    continue;
                }
            }

            let matches = find_active_features_by_name(ctx.conn, &component.plain_symbol)?;
            match Lookup::from_rows(matches) {
                Lookup::Found(matched) => self.map_feature(ctx, &mut component, matched)?,
                Lookup::NotFound if is_bogus_symbol_input(&symbol) => {
                    self.bogus_symbol_feature(ctx, &mut component)?
                }
                Lookup::NotFound => self
                    .errors
                    .push(format!("{}: NOT in chado (not found in database)", symbol)),
                Lookup::Ambiguous(features) => self.errors.push(format!(
                    "{}: ambiguous, many features ({})",
                    symbol,
                    uniquenames(&features)
                )),
            }
            self.components.push(component);
        }
        Ok(())
    }

    fn map_feature(
        &mut self,
        ctx: &ResolveContext<'_>,
        component: &mut ComponentFeature,
        matched: FeatureRecord,
    ) -> Result<()> {
        let (rule, mapping) = map_to_public_feature(ctx, &matched)?;
        match mapping {
            Mapping::Report { feature, at_locus } => {
                if feature.feature_id != matched.feature_id {
                    component.input_feature_replaced = true;
                    self.notes.push(format!(
                        "{}: {} reported as {}",
                        component.input_symbol, matched.uniquename, feature.uniquename
                    ));
                }
                debug!(symbol = %component.input_symbol, rule, reported = %feature.uniquename, at_locus);
                component.at_locus = at_locus;
                component.feature = Some(feature);
            }
            Mapping::Reject(reason) => {
                self.errors
                    .push(format!("{}: {}", component.input_symbol, reason));
            }
        }
        Ok(())
    }

    /// Find the placeholder feature for `+`, `x[+]` or `x[-]`, creating it if needed.
    fn bogus_symbol_feature(
        &mut self,
        ctx: &mut ResolveContext<'_>,
        component: &mut ComponentFeature,
    ) -> Result<()> {
        let plain = component.plain_symbol.clone();
        match find_bogus_symbol_feature(ctx.conn, &plain)? {
            Lookup::Found(existing) => {
                component.feature = Some(existing);
                return Ok(());
            }
            Lookup::NotFound => {}
            ambiguous => {
                ambiguous.require("bogus symbol feature", &plain)?;
            }
        }

        let organism_id = self.bogus_symbol_organism(ctx, &component.input_symbol, &plain)?;
        let type_id = ctx
            .cache
            .lookups()
            .cvterm(ctx.conn, vocab::CV_SO, vocab::BOGUS_SYMBOL)?
            .cvterm_id;
        let row = NewFeature {
            organism_id,
            name: plain.clone(),
            uniquename: plain.clone(),
            type_id,
        };
        let feature_id = create_unique(ctx.conn, &row)?;

        let symbol_type = ctx.cache.symbol_term(ctx.conn)?.cvterm_id;
        let (synonym_id, _) = upsert_by_unique_key(
            ctx.conn,
            &NewSynonym {
                name: sgml_to_unicode(&component.input_symbol)?,
                synonym_sgml: sub_sup_to_sgml(&component.input_symbol),
                type_id: symbol_type,
            },
        )?;
        let unattributed = ctx.cache.unattributed_pub(ctx.conn, ctx.config)?;
        upsert_by_unique_key(
            ctx.conn,
            &NewFeatureSynonym {
                feature_id,
                synonym_id,
                pub_id: unattributed.pub_id,
                is_current: true,
                is_internal: false,
            },
        )?;

        info!(symbol = %component.input_symbol, feature_id, "created bogus symbol feature");
        self.notes.push(format!(
            "{}: created new bogus symbol feature",
            component.input_symbol
        ));
        component.is_new = true;
        component.feature = Some(FeatureRecord {
            feature_id,
            uniquename: plain.clone(),
            name: plain,
            organism_id,
            type_id,
            is_obsolete: false,
            is_analysis: false,
        });
        Ok(())
    }

    fn bogus_symbol_organism(
        &mut self,
        ctx: &mut ResolveContext<'_>,
        symbol: &str,
        plain: &str,
    ) -> Result<i64> {
        if symbol != "+" {
            let gene_name = implied_gene_name(plain);
            let genes =
                find_features_by_name(ctx.conn, gene_name, Some(FeatureIdKind::Gene), Obsolete::Current)?;
            if let Lookup::Found(gene) = genes {
                return Ok(gene.organism_id);
            }
            self.warnings.push(format!(
                "{}: no single current gene named {}, using organism {}",
                symbol, gene_name, ctx.config.unknown_organism
            ));
        }
        Ok(ctx
            .cache
            .lookups()
            .organism(ctx.conn, &ctx.config.unknown_organism)?
            .organism_id)
    }

    /// Fetch symbol, type and organism for each chosen feature, then set the component flags.
    fn describe_features(&mut self, ctx: &mut ResolveContext<'_>) -> Result<()> {
        for component in &mut self.components {
            let Some(feature) = &component.feature else {
                continue;
            };
            let summary = feature_summary(ctx.conn, feature.feature_id)?
                .require("feature summary", &feature.uniquename)?;
            component.summary = Some(summary);
            if component.is_bogus_symbol() {
                continue;
            }

            let feature_id = feature.feature_id;
            let is_allele = component.kind() == FeatureIdKind::Allele;
            if component.at_locus {
                let genes = parental_genes_of_allele(ctx.conn, feature_id, &ctx.config.taxgroup)?;
                match Lookup::from_rows(genes) {
                    Lookup::Found(gene) => {
                        component.parental_gene = Some(ParentalGene {
                            feature_id: gene.feature_id,
                            uniquename: gene.uniquename,
                            name: gene.name,
                        })
                    }
                    Lookup::NotFound if is_allele => self.warnings.push(format!(
                        "{}: no parental gene found",
                        component.input_symbol
                    )),
                    Lookup::NotFound => {}
                    Lookup::Ambiguous(genes) => self.warnings.push(format!(
                        "{}: many parental genes ({})",
                        component.input_symbol,
                        uniquenames(&genes)
                    )),
                }
            }

            if is_allele
                && has_cvterm_annotation(ctx.conn, feature_id, vocab::CV_MISC, vocab::IN_VITRO_CONSTRUCT)?
            {
                component.at_locus = false;
            }
            if is_allele && allele_has_misexpression_construct(ctx.conn, feature_id)? {
                component.misexpression_element = true;
            }
            if component.type_name() == Some(vocab::CHROMOSOME_STRUCTURE_VARIATION)
                || !component.at_locus
            {
                component.single_cgroup = false;
            }
        }
        Ok(())
    }

    fn validate(&mut self) {
        if self.components.len() > 2 {
            self.errors.push(format!(
                "{}: a complementation group holds at most two components, found {}",
                self.input,
                self.components.len()
            ));
        }
        if self.errors.is_empty() && self.components.iter().any(|c| c.feature_id().is_none()) {
            self.errors
                .push(format!("{}: not every component resolved to a feature", self.input));
        }

        let genes: BTreeMap<i64, &ParentalGene> = self
            .components
            .iter()
            .filter_map(|c| c.parental_gene.as_ref())
            .map(|g| (g.feature_id, g))
            .collect();
        match genes.len() {
            0 => {}
            1 => self.gene_locus_id = genes.keys().next().copied(),
            _ => {
                let names: Vec<&str> = genes.values().map(|g| g.name.as_str()).collect();
                self.errors.push(format!(
                    "{}: alleles of many different genes share a locus ({})",
                    self.input,
                    names.join(", ")
                ));
            }
        }

        let resolved: Vec<&ComponentFeature> =
            self.components.iter().filter(|c| c.summary.is_some()).collect();
        let at_locus = resolved.iter().filter(|c| c.at_locus).count();
        if at_locus > 0 && at_locus < resolved.len() {
            self.errors.push(format!(
                "{}: mixes components at a classical locus with components that are not",
                self.input
            ));
        } else if !resolved.is_empty() && at_locus == resolved.len() {
            self.at_locus = true;
        }

        let bogus: Vec<&ComponentFeature> =
            resolved.iter().copied().filter(|c| c.is_bogus_symbol()).collect();
        if bogus.len() > 1 {
            self.errors
                .push(format!("{}: more than one bogus symbol", self.input));
        } else if let ([only], [a, b]) = (bogus.as_slice(), self.components.as_slice()) {
            let other = if std::ptr::eq(*only, a) { b } else { a };
            if let Some(error) = bogus_pairing_error(only, other) {
                self.errors.push(error);
            }
        }
    }

    fn rank_and_name(&mut self) {
        self.rank_order = match self.components.as_slice() {
            [_] => vec![0],
            [a, b] if a.feature_id() == b.feature_id() => vec![0, 1],
            [a, _] if a.is_bogus_symbol() => vec![1, 0],
            [_, b] if b.is_bogus_symbol() => vec![0, 1],
            [a, b] if b.symbol() < a.symbol() => vec![1, 0],
            [_, _] => vec![0, 1],
            _ => return,
        };
        let symbols: Vec<&str> = self.ranked().map(ComponentFeature::symbol).collect();
        self.name = Some(symbols.join("/"));

        let mut ids: Vec<&str> = self
            .components
            .iter()
            .filter_map(ComponentFeature::uniquename)
            .collect();
        ids.sort_unstable();
        self.description = Some(ids.join("|"));
    }
}

/// A `gene[+]`/`gene[-]` placeholder must name the gene of the allele it is paired with.
fn bogus_pairing_error(bogus: &ComponentFeature, other: &ComponentFeature) -> Option<String> {
    if bogus.input_symbol == "+" {
        return None;
    }
    if other.kind() != FeatureIdKind::Allele && other.parental_gene.is_none() {
        return None;
    }
    let implied = implied_gene_name(&bogus.plain_symbol);
    match &other.parental_gene {
        Some(gene) if gene.name == implied => None,
        Some(gene) => Some(format!(
            "{}: gene {} does not match paired allele {} (gene {})",
            bogus.input_symbol,
            implied,
            other.symbol(),
            gene.name
        )),
        None => Some(format!(
            "{}: gene {} does not match paired allele {} (no parental gene)",
            bogus.input_symbol,
            implied,
            other.symbol()
        )),
    }
}

fn uniquenames(features: &[FeatureRecord]) -> String {
    features
        .iter()
        .map(|f| f.uniquename.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
