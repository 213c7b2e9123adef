//! Genotype annotation for FlyBase curation.
//!
//! A genotype is written as complementation groups separated by spaces, each
//! group holding one or two component symbols separated by `/`:
//!
//! ```text
//! Df(2L)x/wg[+] P{UAS-wg.A}
//! ```
//!
//! [`GenotypeAnnotation::new`] resolves every symbol against Chado, checks the
//! groups and computes the canonical uniquename and description. Problems found
//! in the curated text are collected in `errors`, `warnings` and `notes`.
//! [`GenotypeAnnotation::get_known_or_create_new`] then binds the annotation to
//! an existing genotype or creates one with a freshly minted curie.

pub mod cache;
pub mod cgroup;
pub mod component;
pub mod config;
pub mod genotype;
pub mod mapping;
pub mod mint;

#[cfg(test)]
mod testutil;

pub use cache::ChadoCache;
pub use cgroup::ComplementationGroup;
pub use component::{ComponentFeature, ParentalGene, ResolveContext};
pub use config::{ConfigError, GenotypeConfig};
pub use genotype::GenotypeAnnotation;
pub use mapping::{map_to_public_feature, Mapping, MAPPING_RULES};
pub use mint::mint_curie;
