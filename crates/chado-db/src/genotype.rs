use chado_core::{GenotypeComponent, GenotypeRecord};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::lookup::query_all;
use crate::{vocab, Lookup, Result};

/// A persisted genotype together with its current curie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentGenotype {
    pub genotype: GenotypeRecord,
    pub curie: String,
}

const CURRENT_GENOTYPE_SQL: &str = "SELECT g.genotype_id, g.uniquename, g.description, g.is_obsolete,
            dx.accession
     FROM genotype g
     JOIN genotype_dbxref gd ON gd.genotype_id = g.genotype_id AND gd.is_current = 1
     JOIN dbxref dx ON dx.dbxref_id = gd.dbxref_id
     JOIN db ON db.db_id = dx.db_id";

fn row_to_current_genotype(r: &Row) -> rusqlite::Result<CurrentGenotype> {
    Ok(CurrentGenotype {
        genotype: GenotypeRecord {
            genotype_id: r.get(0)?,
            uniquename: r.get(1)?,
            description: r.get(2)?,
            is_obsolete: r.get::<_, i32>(3)? != 0,
        },
        curie: r.get(4)?,
    })
}

/// Non-obsolete genotype named `uniquename` holding a current `db_name` curie with `prefix`.
pub fn find_current_genotype(
    conn: &Connection,
    uniquename: &str,
    db_name: &str,
    prefix: &str,
) -> Result<Lookup<CurrentGenotype>> {
    let sql = format!(
        "{} WHERE g.uniquename = ?1 AND g.is_obsolete = 0 AND db.name = ?2
             AND dx.accession LIKE ?3",
        CURRENT_GENOTYPE_SQL
    );
    let rows = query_all(
        conn,
        &sql,
        params![uniquename, db_name, format!("{}%", prefix)],
        row_to_current_genotype,
    )?;
    Ok(Lookup::from_rows(rows))
}

/// Genotype whose current `db_name` dbxref is `curie`.
pub fn find_genotype_by_curie(
    conn: &Connection,
    curie: &str,
    db_name: &str,
) -> Result<Lookup<CurrentGenotype>> {
    let sql = format!("{} WHERE dx.accession = ?1 AND db.name = ?2", CURRENT_GENOTYPE_SQL);
    let rows = query_all(conn, &sql, params![curie, db_name], row_to_current_genotype)?;
    Ok(Lookup::from_rows(rows))
}

/// Component features of a genotype ordered by group, then rank.
pub fn genotype_components(conn: &Connection, genotype_id: i64) -> Result<Vec<GenotypeComponent>> {
    Ok(query_all(
        conn,
        "SELECT fg.cgroup, fg.rank, f.feature_id, f.uniquename, f.name
         FROM feature_genotype fg JOIN feature f ON f.feature_id = fg.feature_id
         WHERE fg.genotype_id = ?1
         ORDER BY fg.cgroup, fg.rank",
        params![genotype_id],
        |r| {
            Ok(GenotypeComponent {
                cgroup: r.get(0)?,
                rank: r.get(1)?,
                feature_id: r.get(2)?,
                uniquename: r.get(3)?,
                name: r.get(4)?,
            })
        },
    )?)
}

/// Names of the genotype's current symbol synonyms.
pub fn genotype_current_symbols(conn: &Connection, genotype_id: i64) -> Result<Vec<String>> {
    Ok(query_all(
        conn,
        "SELECT s.name FROM genotype_synonym gs
         JOIN synonym s ON s.synonym_id = gs.synonym_id
         JOIN cvterm t ON t.cvterm_id = s.type_id AND t.name = ?2
         WHERE gs.genotype_id = ?1 AND gs.is_current = 1
         ORDER BY s.name",
        params![genotype_id, vocab::SYMBOL],
        |r| r.get(0),
    )?)
}

/// Accessions of the genotype's current dbxrefs in `db_name`.
pub fn genotype_current_dbxrefs(
    conn: &Connection,
    genotype_id: i64,
    db_name: &str,
) -> Result<Vec<String>> {
    Ok(query_all(
        conn,
        "SELECT dx.accession FROM genotype_dbxref gd
         JOIN dbxref dx ON dx.dbxref_id = gd.dbxref_id
         JOIN db ON db.db_id = dx.db_id AND db.name = ?2
         WHERE gd.genotype_id = ?1 AND gd.is_current = 1
         ORDER BY dx.accession",
        params![genotype_id, db_name],
        |r| r.get(0),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::get_db;
    use crate::test_support::*;
    use crate::upsert::{upsert_by_unique_key, NewDbxref, NewGenotype, NewGenotypeDbxref};

    fn persist(conn: &Connection, uniquename: &str, curie: &str, is_current: bool) -> i64 {
        let db = get_db(conn, vocab::FLYBASE_DB).unwrap();
        let (genotype_id, _) = upsert_by_unique_key(
            conn,
            &NewGenotype {
                uniquename: uniquename.to_string(),
                description: "FBal0018482|FBal0018482".to_string(),
            },
        )
        .unwrap();
        let (dbxref_id, _) = upsert_by_unique_key(
            conn,
            &NewDbxref {
                db_id: db.db_id,
                accession: curie.to_string(),
            },
        )
        .unwrap();
        upsert_by_unique_key(
            conn,
            &NewGenotypeDbxref {
                genotype_id,
                dbxref_id,
                is_current,
            },
        )
        .unwrap();
        genotype_id
    }

    #[test]
    fn test_find_current_genotype() {
        let conn = test_db();
        let id = persist(&conn, "wg[1]/wg[1]", "FBgo0000001", true);
        let found = find_current_genotype(&conn, "wg[1]/wg[1]", vocab::FLYBASE_DB, "FBgo")
            .unwrap()
            .found()
            .unwrap();
        assert_eq!(found.genotype.genotype_id, id);
        assert_eq!(found.curie, "FBgo0000001");

        let by_curie = find_genotype_by_curie(&conn, "FBgo0000001", vocab::FLYBASE_DB).unwrap();
        assert!(by_curie.is_found());
        assert_eq!(
            genotype_current_dbxrefs(&conn, id, vocab::FLYBASE_DB).unwrap(),
            vec!["FBgo0000001".to_string()]
        );
    }

    #[test]
    fn test_non_current_curie_is_ignored() {
        let conn = test_db();
        persist(&conn, "wg[1]/wg[1]", "FBgo0000001", false);
        let found = find_current_genotype(&conn, "wg[1]/wg[1]", vocab::FLYBASE_DB, "FBgo").unwrap();
        assert_eq!(found, Lookup::NotFound);
    }
}
