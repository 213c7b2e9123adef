//! Flat, JSON-friendly views of annotations and stored genotypes.

use chado_core::GenotypeComponent;
use chado_db::genotype::CurrentGenotype;
use chado_genotype::{ComplementationGroup, ComponentFeature, GenotypeAnnotation};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AnnotationDto {
    pub input: String,
    pub uniquename: Option<String>,
    pub description: Option<String>,
    pub curie: Option<String>,
    pub genotype_id: Option<i64>,
    pub is_new: bool,
    pub committed: bool,
    pub cgroups: Vec<CgroupDto>,
    pub notes: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CgroupDto {
    pub rank: Option<usize>,
    pub input: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub components: Vec<ComponentDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentDto {
    pub input_symbol: String,
    pub symbol: String,
    pub uniquename: Option<String>,
    pub type_name: Option<String>,
    pub at_locus: bool,
    pub is_new: bool,
    pub parental_gene: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredGenotypeDto {
    pub genotype_id: i64,
    pub uniquename: String,
    pub description: Option<String>,
    pub curie: String,
    pub symbols: Vec<String>,
    pub dbxrefs: Vec<String>,
    pub components: Vec<GenotypeComponent>,
}

pub fn annotation_to_dto(annotation: &GenotypeAnnotation, committed: bool) -> AnnotationDto {
    let rank_of = |index: usize| {
        annotation
            .cgroup_ranks
            .iter()
            .find(|(_, &i)| i == index)
            .map(|(&rank, _)| rank)
    };
    AnnotationDto {
        input: annotation.input.clone(),
        uniquename: annotation.uniquename.clone(),
        description: annotation.description.clone(),
        curie: annotation.curie.clone(),
        genotype_id: annotation.genotype_id,
        is_new: annotation.is_new,
        committed,
        cgroups: annotation
            .cgroups
            .iter()
            .enumerate()
            .map(|(i, g)| cgroup_to_dto(g, rank_of(i)))
            .collect(),
        notes: annotation.notes.clone(),
        warnings: annotation.warnings.clone(),
        errors: annotation.errors.clone(),
    }
}

fn cgroup_to_dto(group: &ComplementationGroup, rank: Option<usize>) -> CgroupDto {
    let components: Vec<&ComponentFeature> = if group.rank_order.is_empty() {
        group.components.iter().collect()
    } else {
        group.ranked().collect()
    };
    CgroupDto {
        rank,
        input: group.input.clone(),
        name: group.name.clone(),
        description: group.description.clone(),
        components: components.into_iter().map(component_to_dto).collect(),
    }
}

fn component_to_dto(component: &ComponentFeature) -> ComponentDto {
    ComponentDto {
        input_symbol: component.input_symbol.clone(),
        symbol: component.symbol().to_string(),
        uniquename: component.uniquename().map(str::to_string),
        type_name: component.type_name().map(str::to_string),
        at_locus: component.at_locus,
        is_new: component.is_new,
        parental_gene: component
            .parental_gene
            .as_ref()
            .map(|g| format!("{} ({})", g.name, g.uniquename)),
    }
}

pub fn stored_genotype_to_dto(
    found: CurrentGenotype,
    symbols: Vec<String>,
    dbxrefs: Vec<String>,
    components: Vec<GenotypeComponent>,
) -> StoredGenotypeDto {
    StoredGenotypeDto {
        genotype_id: found.genotype.genotype_id,
        uniquename: found.genotype.uniquename,
        description: found.genotype.description,
        curie: found.curie,
        symbols,
        dbxrefs,
        components,
    }
}
