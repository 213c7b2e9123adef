use chado_core::{CvtermRecord, DbRecord, FeatureIdKind, FeatureRecord, OrganismRecord, PubRecord};
use rusqlite::{params, Connection, Params, Result as SqlResult, Row};

use crate::{vocab, ChadoError, Obsolete, Result};

/// Outcome of a query that is expected to identify a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    Ambiguous(Vec<T>),
}

impl<T> Lookup<T> {
    pub fn from_rows(mut rows: Vec<T>) -> Self {
        if rows.len() > 1 {
            Lookup::Ambiguous(rows)
        } else {
            rows.pop().map_or(Lookup::NotFound, Lookup::Found)
        }
    }

    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn map<U>(self, f: impl Fn(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(t) => Lookup::Found(f(t)),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Ambiguous(v) => Lookup::Ambiguous(v.into_iter().map(f).collect()),
        }
    }

    /// Exactly one row or a categorical error naming `what` and `key`.
    pub fn require(self, what: &str, key: &str) -> Result<T> {
        match self {
            Lookup::Found(t) => Ok(t),
            Lookup::NotFound => Err(ChadoError::NotFound {
                what: what.to_string(),
                key: key.to_string(),
            }),
            Lookup::Ambiguous(v) => Err(ChadoError::Ambiguous {
                what: what.to_string(),
                key: key.to_string(),
                count: v.len(),
            }),
        }
    }
}

/// Number of columns produced by [`feature_columns`].
pub(crate) const FEATURE_WIDTH: usize = 7;

pub(crate) fn feature_columns(alias: &str) -> String {
    ["feature_id", "uniquename", "name", "organism_id", "type_id", "is_obsolete", "is_analysis"]
        .iter()
        .map(|c| format!("{}.{}", alias, c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read a feature whose [`feature_columns`] start at column `offset`.
pub(crate) fn row_to_feature_at(row: &Row, offset: usize) -> SqlResult<FeatureRecord> {
    Ok(FeatureRecord {
        feature_id: row.get(offset)?,
        uniquename: row.get(offset + 1)?,
        name: row.get(offset + 2)?,
        organism_id: row.get(offset + 3)?,
        type_id: row.get(offset + 4)?,
        is_obsolete: row.get::<_, i32>(offset + 5)? != 0,
        is_analysis: row.get::<_, i32>(offset + 6)? != 0,
    })
}

pub(crate) fn row_to_feature(row: &Row) -> SqlResult<FeatureRecord> {
    row_to_feature_at(row, 0)
}

/// Run `sql` and collect every row through `f`.
pub(crate) fn query_all<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    f: impl FnMut(&Row<'_>) -> SqlResult<T>,
) -> SqlResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, f)?;
    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

pub fn get_cvterm(conn: &Connection, cv: &str, name: &str) -> Result<CvtermRecord> {
    let rows = query_all(
        conn,
        "SELECT t.cvterm_id, cv.name, t.name
         FROM cvterm t JOIN cv ON cv.cv_id = t.cv_id
         WHERE cv.name = ?1 AND t.name = ?2 AND t.is_obsolete = 0",
        params![cv, name],
        |r| {
            Ok(CvtermRecord {
                cvterm_id: r.get(0)?,
                cv_name: r.get(1)?,
                name: r.get(2)?,
            })
        },
    )?;
    Lookup::from_rows(rows).require("cvterm", &format!("{}:{}", cv, name))
}

pub fn get_db(conn: &Connection, name: &str) -> Result<DbRecord> {
    let rows = query_all(
        conn,
        "SELECT db_id, name FROM db WHERE name = ?1",
        params![name],
        |r| {
            Ok(DbRecord {
                db_id: r.get(0)?,
                name: r.get(1)?,
            })
        },
    )?;
    Lookup::from_rows(rows).require("db", name)
}

pub fn get_organism(conn: &Connection, abbreviation: &str) -> Result<OrganismRecord> {
    let rows = query_all(
        conn,
        "SELECT organism_id, abbreviation, genus, species FROM organism WHERE abbreviation = ?1",
        params![abbreviation],
        |r| {
            Ok(OrganismRecord {
                organism_id: r.get(0)?,
                abbreviation: r.get(1)?,
                genus: r.get(2)?,
                species: r.get(3)?,
            })
        },
    )?;
    Lookup::from_rows(rows).require("organism", abbreviation)
}

pub fn get_pub(conn: &Connection, uniquename: &str) -> Result<PubRecord> {
    let rows = query_all(
        conn,
        "SELECT pub_id, uniquename FROM pub WHERE uniquename = ?1 AND is_obsolete = 0",
        params![uniquename],
        |r| {
            Ok(PubRecord {
                pub_id: r.get(0)?,
                uniquename: r.get(1)?,
            })
        },
    )?;
    Lookup::from_rows(rows).require("pub", uniquename)
}

/// Resolve a feature by uniquename.
pub fn feature_lookup(
    conn: &Connection,
    uniquename: &str,
    obsolete: Obsolete,
) -> Result<FeatureRecord> {
    let sql = format!(
        "SELECT {} FROM feature f WHERE f.uniquename = ?1 AND {}",
        feature_columns("f"),
        obsolete.predicate("f")
    );
    let rows = query_all(conn, &sql, params![uniquename], row_to_feature)?;
    Lookup::from_rows(rows).require("feature", uniquename)
}

/// All features named `name`, optionally restricted to one id kind.
pub fn find_features_by_name(
    conn: &Connection,
    name: &str,
    kind: Option<FeatureIdKind>,
    obsolete: Obsolete,
) -> Result<Lookup<FeatureRecord>> {
    let sql = format!(
        "SELECT {} FROM feature f WHERE f.name = ?1 AND f.uniquename LIKE ?2 AND {}",
        feature_columns("f"),
        obsolete.predicate("f")
    );
    let like = kind.and_then(|k| k.like_pattern()).unwrap_or_else(|| "%".to_string());
    let rows = query_all(conn, &sql, params![name, like], row_to_feature)?;
    Ok(Lookup::from_rows(rows))
}

/// Resolve a feature by name, failing if none or many match.
pub fn feature_name_lookup(
    conn: &Connection,
    name: &str,
    kind: Option<FeatureIdKind>,
    obsolete: Obsolete,
) -> Result<FeatureRecord> {
    find_features_by_name(conn, name, kind, obsolete)?.require("feature", name)
}

/// Resolve a feature by its current symbol synonym.
pub fn feature_symbol_lookup(
    conn: &Connection,
    symbol: &str,
    kind: Option<FeatureIdKind>,
) -> Result<FeatureRecord> {
    let sql = format!(
        "SELECT DISTINCT {} FROM feature f
         JOIN feature_synonym fs ON fs.feature_id = f.feature_id AND fs.is_current = 1
         JOIN synonym s ON s.synonym_id = fs.synonym_id
         JOIN cvterm t ON t.cvterm_id = s.type_id AND t.name = ?3
         WHERE s.name = ?1 AND f.uniquename LIKE ?2 AND f.is_obsolete = 0",
        feature_columns("f")
    );
    let like = kind.and_then(|k| k.like_pattern()).unwrap_or_else(|| "%".to_string());
    let rows = query_all(
        conn,
        &sql,
        params![symbol, like, vocab::SYMBOL],
        row_to_feature,
    )?;
    Lookup::from_rows(rows).require("feature symbol", symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn test_lookup_from_rows() {
        assert_eq!(Lookup::<i32>::from_rows(vec![]), Lookup::NotFound);
        assert_eq!(Lookup::from_rows(vec![1]), Lookup::Found(1));
        assert_eq!(Lookup::from_rows(vec![1, 2]), Lookup::Ambiguous(vec![1, 2]));
    }

    #[test]
    fn test_require_is_categorical() {
        let err = Lookup::<i32>::NotFound.require("gene", "wg").unwrap_err();
        assert!(matches!(err, ChadoError::NotFound { .. }));
        let err = Lookup::from_rows(vec![1, 2, 3]).require("gene", "wg").unwrap_err();
        assert!(matches!(err, ChadoError::Ambiguous { count: 3, .. }));
    }

    #[test]
    fn test_vocabulary_lookups() {
        let conn = test_db();
        let term = get_cvterm(&conn, vocab::CV_SYNONYM_TYPE, vocab::SYMBOL).unwrap();
        assert_eq!(term.name, "symbol");
        assert!(get_cvterm(&conn, vocab::CV_SO, "no such term").is_err());
        assert_eq!(get_db(&conn, vocab::FLYBASE_DB).unwrap().name, "FlyBase");
        assert_eq!(get_pub(&conn, vocab::UNATTRIBUTED_PUB).unwrap().uniquename, "unattributed");
        assert!(get_organism(&conn, vocab::UNKNOWN_ORGANISM).is_ok());
    }

    #[test]
    fn test_feature_lookups() {
        let conn = test_db();
        let dmel = add_organism(&conn, "Dmel", true);
        add_feature(&conn, dmel, "FBgn0284084", "wg", vocab::GENE);
        add_feature(&conn, dmel, "FBal0018482", "wg[1]", vocab::ALLELE);

        let wg = feature_lookup(&conn, "FBgn0284084", Obsolete::Current).unwrap();
        assert_eq!(wg.name, "wg");
        assert_eq!(wg.kind(), FeatureIdKind::Gene);
        assert!(feature_lookup(&conn, "FBgn0284084", Obsolete::Obsolete).is_err());

        let allele =
            feature_name_lookup(&conn, "wg[1]", Some(FeatureIdKind::Allele), Obsolete::Current)
                .unwrap();
        assert_eq!(allele.uniquename, "FBal0018482");
        let none = find_features_by_name(&conn, "wg[1]", Some(FeatureIdKind::Gene), Obsolete::Either)
            .unwrap();
        assert_eq!(none, Lookup::NotFound);
    }

    #[test]
    fn test_feature_symbol_lookup() {
        let conn = test_db();
        let dmel = add_organism(&conn, "Dmel", true);
        let gene = add_feature(&conn, dmel, "FBgn0284084", "wg", vocab::GENE);
        let allele = add_feature(&conn, dmel, "FBal0018482", "wg[1]", vocab::ALLELE);
        let pub_id = get_pub(&conn, vocab::UNATTRIBUTED_PUB).unwrap().pub_id;
        let symbol_type = cvterm_id(&conn, vocab::CV_SYNONYM_TYPE, vocab::SYMBOL);
        for (feature_id, symbol, current) in [(gene, "Wnt1", true), (allele, "Wnt1[1]", false)] {
            conn.execute(
                "INSERT INTO synonym (name, synonym_sgml, type_id) VALUES (?1, ?1, ?2)",
                params![symbol, symbol_type],
            )
            .unwrap();
            conn.execute(
                "INSERT INTO feature_synonym (feature_id, synonym_id, pub_id, is_current)
                 VALUES (?1, ?2, ?3, ?4)",
                params![feature_id, conn.last_insert_rowid(), pub_id, current],
            )
            .unwrap();
        }

        let wg = feature_symbol_lookup(&conn, "Wnt1", None).unwrap();
        assert_eq!(wg.uniquename, "FBgn0284084");
        assert!(feature_symbol_lookup(&conn, "Wnt1", Some(FeatureIdKind::Allele)).is_err());
        assert!(matches!(
            feature_symbol_lookup(&conn, "Wnt1[1]", None),
            Err(ChadoError::NotFound { .. })
        ));
    }

    #[test]
    fn test_obsolete_flag_parsing() {
        assert_eq!("e".parse::<Obsolete>().unwrap(), Obsolete::Either);
        assert!(matches!(
            "x".parse::<Obsolete>(),
            Err(ChadoError::InvalidObsoleteFlag(_))
        ));
    }
}
