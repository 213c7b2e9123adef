//! Relationship traversals used to resolve genotype components.
//!
//! Direction conventions follow Chado: an allele is the subject of
//! `alleleof` (object: gene) and of `associated_with` (object: insertion or
//! construct); an insertion is the subject of `producedby` (object: construct).

use chado_core::{is_feature_id, FeatureRecord, FeatureSummary};
use rusqlite::{params, Connection};

use crate::lookup::{feature_columns, query_all, row_to_feature, row_to_feature_at, FEATURE_WIDTH};
use crate::{vocab, Lookup, Result};

/// Current, non-analysis features named `name` whose uniquename is a public feature id.
pub fn find_active_features_by_name(conn: &Connection, name: &str) -> Result<Vec<FeatureRecord>> {
    let sql = format!(
        "SELECT {} FROM feature f
         WHERE f.name = ?1 AND f.is_obsolete = 0 AND f.is_analysis = 0
         ORDER BY f.uniquename",
        feature_columns("f")
    );
    let rows = query_all(conn, &sql, params![name], row_to_feature)?;
    Ok(rows
        .into_iter()
        .filter(|f| is_feature_id(&f.uniquename))
        .collect())
}

/// The internal placeholder feature for a bogus symbol; its uniquename equals its name.
pub fn find_bogus_symbol_feature(conn: &Connection, name: &str) -> Result<Lookup<FeatureRecord>> {
    let sql = format!(
        "SELECT {} FROM feature f
         JOIN cvterm t ON t.cvterm_id = f.type_id AND t.name = ?2
         WHERE f.name = ?1 AND f.uniquename = ?1 AND f.is_obsolete = 0",
        feature_columns("f")
    );
    let rows = query_all(conn, &sql, params![name, vocab::BOGUS_SYMBOL], row_to_feature)?;
    Ok(Lookup::from_rows(rows))
}

/// Insertions named `...unspecified` produced by `construct_id`, as attributed to `evidence_pub`.
pub fn unspecified_insertions_of_construct(
    conn: &Connection,
    construct_id: i64,
    evidence_pub: &str,
) -> Result<Vec<FeatureRecord>> {
    let sql = format!(
        "SELECT DISTINCT {} FROM feature f
         JOIN feature_relationship fr ON fr.subject_id = f.feature_id AND fr.object_id = ?1
         JOIN cvterm t ON t.cvterm_id = fr.type_id AND t.name = ?2
         JOIN feature_relationship_pub frp
             ON frp.feature_relationship_id = fr.feature_relationship_id
         JOIN pub p ON p.pub_id = frp.pub_id AND p.uniquename = ?3
         WHERE f.uniquename LIKE 'FBti%' AND f.name LIKE '%unspecified' AND f.is_obsolete = 0",
        feature_columns("f")
    );
    Ok(query_all(
        conn,
        &sql,
        params![construct_id, vocab::PRODUCEDBY, evidence_pub],
        row_to_feature,
    )?)
}

/// Insertions an allele is explicitly flagged to be reported as.
pub fn designated_insertions_of_allele(
    conn: &Connection,
    allele_id: i64,
) -> Result<Vec<FeatureRecord>> {
    let sql = format!(
        "SELECT DISTINCT {} FROM feature f
         JOIN feature_relationship fr ON fr.object_id = f.feature_id AND fr.subject_id = ?1
         JOIN cvterm t ON t.cvterm_id = fr.type_id AND t.name = ?2
         JOIN feature_relationshipprop frp
             ON frp.feature_relationship_id = fr.feature_relationship_id
         JOIN cvterm pt ON pt.cvterm_id = frp.type_id AND pt.name = ?3
         WHERE f.uniquename LIKE 'FBti%' AND f.is_obsolete = 0",
        feature_columns("f")
    );
    Ok(query_all(
        conn,
        &sql,
        params![allele_id, vocab::ASSOCIATED_WITH, vocab::GENOTYPE_REPRESENTATIVE],
        row_to_feature,
    )?)
}

/// A construct the allele is associated with, and an `...unspecified` insertion produced by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructInsertion {
    pub construct: FeatureRecord,
    pub insertion: FeatureRecord,
}

pub fn allele_construct_insertion_chains(
    conn: &Connection,
    allele_id: i64,
) -> Result<Vec<ConstructInsertion>> {
    let sql = format!(
        "SELECT DISTINCT {}, {} FROM feature_relationship fr1
         JOIN cvterm t1 ON t1.cvterm_id = fr1.type_id AND t1.name = ?2
         JOIN feature c ON c.feature_id = fr1.object_id
             AND c.uniquename LIKE 'FBtp%' AND c.is_obsolete = 0
         JOIN feature_relationship fr2 ON fr2.object_id = c.feature_id
         JOIN cvterm t2 ON t2.cvterm_id = fr2.type_id AND t2.name = ?3
         JOIN feature i ON i.feature_id = fr2.subject_id
             AND i.uniquename LIKE 'FBti%' AND i.is_obsolete = 0 AND i.name LIKE '%unspecified'
         WHERE fr1.subject_id = ?1
         ORDER BY c.uniquename, i.uniquename",
        feature_columns("c"),
        feature_columns("i")
    );
    Ok(query_all(
        conn,
        &sql,
        params![allele_id, vocab::ASSOCIATED_WITH, vocab::PRODUCEDBY],
        |r| {
            Ok(ConstructInsertion {
                construct: row_to_feature_at(r, 0)?,
                insertion: row_to_feature_at(r, FEATURE_WIDTH)?,
            })
        },
    )?)
}

/// Whether the feature is attached to the publication.
pub fn feature_has_pub(conn: &Connection, feature_id: i64, pub_id: i64) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM feature_pub WHERE feature_id = ?1 AND pub_id = ?2",
        params![feature_id, pub_id],
        |r| r.get(0),
    )?;
    Ok(count > 0)
}

/// Current symbol, type and organism of a feature.
pub fn feature_summary(conn: &Connection, feature_id: i64) -> Result<Lookup<FeatureSummary>> {
    let rows = query_all(
        conn,
        "SELECT DISTINCT f.feature_id, f.uniquename, f.name, s.name, t.name, o.abbreviation
         FROM feature f
         JOIN cvterm t ON t.cvterm_id = f.type_id
         JOIN organism o ON o.organism_id = f.organism_id
         JOIN feature_synonym fs ON fs.feature_id = f.feature_id AND fs.is_current = 1
         JOIN synonym s ON s.synonym_id = fs.synonym_id
         JOIN cvterm st ON st.cvterm_id = s.type_id AND st.name = ?2
         WHERE f.feature_id = ?1",
        params![feature_id, vocab::SYMBOL],
        |r| {
            Ok(FeatureSummary {
                feature_id: r.get(0)?,
                uniquename: r.get(1)?,
                name: r.get(2)?,
                symbol: r.get(3)?,
                type_name: r.get(4)?,
                organism_abbreviation: r.get(5)?,
            })
        },
    )?;
    Ok(Lookup::from_rows(rows))
}

/// Current genes of the given taxonomic group that the allele is an allele of.
pub fn parental_genes_of_allele(
    conn: &Connection,
    allele_id: i64,
    taxgroup: &str,
) -> Result<Vec<FeatureRecord>> {
    let sql = format!(
        "SELECT DISTINCT {} FROM feature_relationship fr
         JOIN cvterm t ON t.cvterm_id = fr.type_id AND t.name = ?2
         JOIN feature g ON g.feature_id = fr.object_id
             AND g.uniquename LIKE 'FBgn%' AND g.is_obsolete = 0
         JOIN organismprop op ON op.organism_id = g.organism_id AND op.value = ?3
         JOIN cvterm opt ON opt.cvterm_id = op.type_id AND opt.name = ?4
         WHERE fr.subject_id = ?1
         ORDER BY g.uniquename",
        feature_columns("g")
    );
    Ok(query_all(
        conn,
        &sql,
        params![allele_id, vocab::ALLELEOF, taxgroup, vocab::TAXGROUP],
        row_to_feature,
    )?)
}

/// Whether the feature is annotated with the cvterm `cv:term`.
pub fn has_cvterm_annotation(
    conn: &Connection,
    feature_id: i64,
    cv: &str,
    term: &str,
) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM feature_cvterm fc
         JOIN cvterm t ON t.cvterm_id = fc.cvterm_id AND t.name = ?3
         JOIN cv ON cv.cv_id = t.cv_id AND cv.name = ?2
         WHERE fc.feature_id = ?1",
        params![feature_id, cv, term],
        |r| r.get(0),
    )?;
    Ok(count > 0)
}

/// Whether allele → insertion → construct reaches a construct annotated as a misexpression element.
pub fn allele_has_misexpression_construct(conn: &Connection, allele_id: i64) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM feature_relationship fr1
         JOIN cvterm t1 ON t1.cvterm_id = fr1.type_id AND t1.name = ?2
         JOIN feature i ON i.feature_id = fr1.object_id AND i.uniquename LIKE 'FBti%'
         JOIN feature_relationship fr2 ON fr2.subject_id = i.feature_id
         JOIN cvterm t2 ON t2.cvterm_id = fr2.type_id AND t2.name = ?3
         JOIN feature c ON c.feature_id = fr2.object_id AND c.uniquename LIKE 'FBtp%'
         JOIN feature_cvterm fc ON fc.feature_id = c.feature_id
         JOIN cvterm ct ON ct.cvterm_id = fc.cvterm_id AND ct.name = ?4
         WHERE fr1.subject_id = ?1",
        params![
            allele_id,
            vocab::ASSOCIATED_WITH,
            vocab::PRODUCEDBY,
            vocab::MISEXPRESSION_ELEMENT
        ],
        |r| r.get(0),
    )?;
    Ok(count > 0)
}

/// Genes whose alleles are associated with the insertion, restricted to the taxonomic group.
pub fn genes_compatible_with_insertion(
    conn: &Connection,
    insertion_id: i64,
    taxgroup: &str,
) -> Result<Vec<i64>> {
    Ok(query_all(
        conn,
        "SELECT DISTINCT g.feature_id FROM feature_relationship fr1
         JOIN cvterm t1 ON t1.cvterm_id = fr1.type_id AND t1.name = ?2
         JOIN feature a ON a.feature_id = fr1.subject_id
             AND a.uniquename LIKE 'FBal%' AND a.is_obsolete = 0
         JOIN feature_relationship fr2 ON fr2.subject_id = a.feature_id
         JOIN cvterm t2 ON t2.cvterm_id = fr2.type_id AND t2.name = ?3
         JOIN feature g ON g.feature_id = fr2.object_id AND g.uniquename LIKE 'FBgn%'
             AND g.is_obsolete = 0 AND g.is_analysis = 0
         JOIN organismprop op ON op.organism_id = g.organism_id AND op.value = ?4
         JOIN cvterm opt ON opt.cvterm_id = op.type_id AND opt.name = ?5
         WHERE fr1.object_id = ?1
         ORDER BY g.feature_id",
        params![
            insertion_id,
            vocab::ASSOCIATED_WITH,
            vocab::ALLELEOF,
            taxgroup,
            vocab::TAXGROUP
        ],
        |r| r.get(0),
    )?)
}
