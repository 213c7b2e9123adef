//! Typed get-or-create helpers.
//!
//! Each insertable entity gets its own row struct. Rows identified by a
//! natural unique key implement [`UniqueRow`] and go through
//! [`upsert_by_unique_key`]; rows that append at the next free `rank`
//! implement [`RankedRow`] and go through [`insert_ranked`].

use rusqlite::{params, Connection, OptionalExtension, Params};
use tracing::debug;

use crate::{ChadoError, Result};

pub trait UniqueRow {
    const TABLE: &'static str;

    /// Primary key of the row sharing this row's unique key, if any.
    fn find(&self, conn: &Connection) -> Result<Option<i64>>;

    fn insert(&self, conn: &Connection) -> Result<i64>;

    /// Human-readable unique key, used in logs and errors.
    fn key(&self) -> String;
}

pub trait RankedRow {
    const TABLE: &'static str;

    /// Highest rank already used by rows sharing this row's natural key.
    fn max_rank(&self, conn: &Connection) -> Result<Option<i64>>;

    fn insert_at(&self, conn: &Connection, rank: i64) -> Result<i64>;
}

/// Find the row by its unique key or insert it. Returns `(id, created)`.
pub fn upsert_by_unique_key<R: UniqueRow>(conn: &Connection, row: &R) -> Result<(i64, bool)> {
    if let Some(id) = row.find(conn)? {
        debug!(table = R::TABLE, key = %row.key(), id, "found existing row");
        return Ok((id, false));
    }
    let id = row.insert(conn)?;
    debug!(table = R::TABLE, key = %row.key(), id, "created row");
    Ok((id, true))
}

/// Insert a row that must not exist yet.
pub fn create_unique<R: UniqueRow>(conn: &Connection, row: &R) -> Result<i64> {
    match upsert_by_unique_key(conn, row)? {
        (id, true) => Ok(id),
        (_, false) => Err(ChadoError::UnexpectedExisting {
            what: R::TABLE.to_string(),
            key: row.key(),
        }),
    }
}

/// Insert at the next free rank. Returns `(id, rank)`.
pub fn insert_ranked<R: RankedRow>(conn: &Connection, row: &R) -> Result<(i64, i64)> {
    let rank = row.max_rank(conn)?.map_or(0, |r| r + 1);
    let id = row.insert_at(conn, rank)?;
    debug!(table = R::TABLE, id, rank, "inserted ranked row");
    Ok((id, rank))
}

fn find_id<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Option<i64>> {
    Ok(conn.query_row(sql, params, |r| r.get(0)).optional()?)
}

fn max_rank<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Option<i64>> {
    Ok(conn.query_row(sql, params, |r| r.get::<_, Option<i64>>(0))?)
}

#[derive(Debug, Clone)]
pub struct NewDbxref {
    pub db_id: i64,
    pub accession: String,
}

impl UniqueRow for NewDbxref {
    const TABLE: &'static str = "dbxref";

    fn find(&self, conn: &Connection) -> Result<Option<i64>> {
        find_id(
            conn,
            "SELECT dbxref_id FROM dbxref WHERE db_id = ?1 AND accession = ?2 AND version = ''",
            params![self.db_id, self.accession],
        )
    }

    fn insert(&self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO dbxref (db_id, accession) VALUES (?1, ?2)",
            params![self.db_id, self.accession],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn key(&self) -> String {
        format!("{}:{}", self.db_id, self.accession)
    }
}

#[derive(Debug, Clone)]
pub struct NewSynonym {
    pub name: String,
    pub synonym_sgml: String,
    pub type_id: i64,
}

impl UniqueRow for NewSynonym {
    const TABLE: &'static str = "synonym";

    fn find(&self, conn: &Connection) -> Result<Option<i64>> {
        find_id(
            conn,
            "SELECT synonym_id FROM synonym WHERE name = ?1 AND type_id = ?2",
            params![self.name, self.type_id],
        )
    }

    fn insert(&self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO synonym (name, synonym_sgml, type_id) VALUES (?1, ?2, ?3)",
            params![self.name, self.synonym_sgml, self.type_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn key(&self) -> String {
        self.name.clone()
    }
}

#[derive(Debug, Clone)]
pub struct NewFeature {
    pub organism_id: i64,
    pub name: String,
    pub uniquename: String,
    pub type_id: i64,
}

impl UniqueRow for NewFeature {
    const TABLE: &'static str = "feature";

    fn find(&self, conn: &Connection) -> Result<Option<i64>> {
        find_id(
            conn,
            "SELECT feature_id FROM feature
             WHERE organism_id = ?1 AND uniquename = ?2 AND type_id = ?3",
            params![self.organism_id, self.uniquename, self.type_id],
        )
    }

    fn insert(&self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO feature (organism_id, name, uniquename, type_id) VALUES (?1, ?2, ?3, ?4)",
            params![self.organism_id, self.name, self.uniquename, self.type_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn key(&self) -> String {
        self.uniquename.clone()
    }
}

#[derive(Debug, Clone)]
pub struct NewFeatureSynonym {
    pub feature_id: i64,
    pub synonym_id: i64,
    pub pub_id: i64,
    pub is_current: bool,
    pub is_internal: bool,
}

impl UniqueRow for NewFeatureSynonym {
    const TABLE: &'static str = "feature_synonym";

    fn find(&self, conn: &Connection) -> Result<Option<i64>> {
        find_id(
            conn,
            "SELECT feature_synonym_id FROM feature_synonym
             WHERE synonym_id = ?1 AND feature_id = ?2 AND pub_id = ?3",
            params![self.synonym_id, self.feature_id, self.pub_id],
        )
    }

    fn insert(&self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO feature_synonym (synonym_id, feature_id, pub_id, is_current, is_internal)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                self.synonym_id,
                self.feature_id,
                self.pub_id,
                self.is_current,
                self.is_internal,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn key(&self) -> String {
        format!("{}:{}:{}", self.feature_id, self.synonym_id, self.pub_id)
    }
}

#[derive(Debug, Clone)]
pub struct NewFeatureprop {
    pub feature_id: i64,
    pub type_id: i64,
    pub value: Option<String>,
}

impl RankedRow for NewFeatureprop {
    const TABLE: &'static str = "featureprop";

    fn max_rank(&self, conn: &Connection) -> Result<Option<i64>> {
        max_rank(
            conn,
            "SELECT max(rank) FROM featureprop WHERE feature_id = ?1 AND type_id = ?2",
            params![self.feature_id, self.type_id],
        )
    }

    fn insert_at(&self, conn: &Connection, rank: i64) -> Result<i64> {
        conn.execute(
            "INSERT INTO featureprop (feature_id, type_id, value, rank) VALUES (?1, ?2, ?3, ?4)",
            params![self.feature_id, self.type_id, self.value, rank],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

/// Set the value of the featureprop at `(feature, type, rank)`, creating it if absent.
/// Returns `(id, created)`.
pub fn get_update_or_create_featureprop(
    conn: &Connection,
    prop: &NewFeatureprop,
    rank: i64,
) -> Result<(i64, bool)> {
    let existing = find_id(
        conn,
        "SELECT featureprop_id FROM featureprop WHERE feature_id = ?1 AND type_id = ?2 AND rank = ?3",
        params![prop.feature_id, prop.type_id, rank],
    )?;
    match existing {
        Some(id) => {
            conn.execute(
                "UPDATE featureprop SET value = ?1 WHERE featureprop_id = ?2",
                params![prop.value, id],
            )?;
            Ok((id, false))
        }
        None => Ok((prop.insert_at(conn, rank)?, true)),
    }
}

#[derive(Debug, Clone)]
pub struct NewGenotype {
    pub uniquename: String,
    pub description: String,
}

impl UniqueRow for NewGenotype {
    const TABLE: &'static str = "genotype";

    fn find(&self, conn: &Connection) -> Result<Option<i64>> {
        find_id(
            conn,
            "SELECT genotype_id FROM genotype WHERE uniquename = ?1",
            params![self.uniquename],
        )
    }

    fn insert(&self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO genotype (name, uniquename, description) VALUES (?1, ?1, ?2)",
            params![self.uniquename, self.description],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn key(&self) -> String {
        self.uniquename.clone()
    }
}

#[derive(Debug, Clone)]
pub struct NewGenotypeDbxref {
    pub genotype_id: i64,
    pub dbxref_id: i64,
    pub is_current: bool,
}

impl UniqueRow for NewGenotypeDbxref {
    const TABLE: &'static str = "genotype_dbxref";

    fn find(&self, conn: &Connection) -> Result<Option<i64>> {
        find_id(
            conn,
            "SELECT genotype_dbxref_id FROM genotype_dbxref WHERE genotype_id = ?1 AND dbxref_id = ?2",
            params![self.genotype_id, self.dbxref_id],
        )
    }

    fn insert(&self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO genotype_dbxref (genotype_id, dbxref_id, is_current) VALUES (?1, ?2, ?3)",
            params![self.genotype_id, self.dbxref_id, self.is_current],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn key(&self) -> String {
        format!("{}:{}", self.genotype_id, self.dbxref_id)
    }
}

#[derive(Debug, Clone)]
pub struct NewGenotypeSynonym {
    pub genotype_id: i64,
    pub synonym_id: i64,
    pub pub_id: i64,
    pub is_current: bool,
    pub is_internal: bool,
}

impl UniqueRow for NewGenotypeSynonym {
    const TABLE: &'static str = "genotype_synonym";

    fn find(&self, conn: &Connection) -> Result<Option<i64>> {
        find_id(
            conn,
            "SELECT genotype_synonym_id FROM genotype_synonym
             WHERE synonym_id = ?1 AND genotype_id = ?2 AND pub_id = ?3",
            params![self.synonym_id, self.genotype_id, self.pub_id],
        )
    }

    fn insert(&self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO genotype_synonym (genotype_id, synonym_id, pub_id, is_current, is_internal)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                self.genotype_id,
                self.synonym_id,
                self.pub_id,
                self.is_current,
                self.is_internal,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn key(&self) -> String {
        format!("{}:{}:{}", self.genotype_id, self.synonym_id, self.pub_id)
    }
}

#[derive(Debug, Clone)]
pub struct NewFeatureGenotype {
    pub feature_id: i64,
    pub genotype_id: i64,
    pub cgroup: i64,
    pub rank: i64,
}

impl UniqueRow for NewFeatureGenotype {
    const TABLE: &'static str = "feature_genotype";

    fn find(&self, conn: &Connection) -> Result<Option<i64>> {
        find_id(
            conn,
            "SELECT feature_genotype_id FROM feature_genotype
             WHERE feature_id = ?1 AND genotype_id = ?2 AND cgroup = ?3 AND rank = ?4",
            params![self.feature_id, self.genotype_id, self.cgroup, self.rank],
        )
    }

    fn insert(&self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO feature_genotype (feature_id, genotype_id, cgroup, rank)
             VALUES (?1, ?2, ?3, ?4)",
            params![self.feature_id, self.genotype_id, self.cgroup, self.rank],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn key(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.feature_id, self.genotype_id, self.cgroup, self.rank
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::get_db;
    use crate::test_support::*;
    use crate::vocab;

    #[test]
    fn test_upsert_finds_existing() {
        let conn = test_db();
        let db = get_db(&conn, vocab::FLYBASE_DB).unwrap();
        let row = NewDbxref {
            db_id: db.db_id,
            accession: "FBgo0000001".to_string(),
        };
        let (id, created) = upsert_by_unique_key(&conn, &row).unwrap();
        assert!(created);
        let (id2, created2) = upsert_by_unique_key(&conn, &row).unwrap();
        assert_eq!(id, id2);
        assert!(!created2);
    }

    #[test]
    fn test_create_unique_rejects_existing() {
        let conn = test_db();
        let row = NewGenotype {
            uniquename: "wg[1]".to_string(),
            description: "FBal0018482".to_string(),
        };
        create_unique(&conn, &row).unwrap();
        let err = create_unique(&conn, &row).unwrap_err();
        assert!(matches!(err, ChadoError::UnexpectedExisting { .. }));
    }

    #[test]
    fn test_insert_ranked_appends() {
        let conn = test_db();
        let dmel = add_organism(&conn, "Dmel", true);
        let wg = add_feature(&conn, dmel, "FBgn0284084", "wg", vocab::GENE);
        let type_id = cvterm_id(&conn, vocab::CV_PROPERTY_TYPE, vocab::TAXGROUP);
        let prop = NewFeatureprop {
            feature_id: wg,
            type_id,
            value: Some("a".to_string()),
        };
        assert_eq!(insert_ranked(&conn, &prop).unwrap().1, 0);
        assert_eq!(insert_ranked(&conn, &prop).unwrap().1, 1);

        let updated = NewFeatureprop {
            value: Some("b".to_string()),
            ..prop
        };
        let (_, created) = get_update_or_create_featureprop(&conn, &updated, 1).unwrap();
        assert!(!created);
        let value: String = conn
            .query_row(
                "SELECT value FROM featureprop WHERE feature_id = ?1 AND rank = 1",
                params![wg],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(value, "b");
        let (_, created) = get_update_or_create_featureprop(&conn, &updated, 5).unwrap();
        assert!(created);
    }
}
