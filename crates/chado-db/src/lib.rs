//! SQLite-backed access to the subset of the Chado schema used by FlyBase
//! curation: schema setup, resolver primitives, typed upserts, named id
//! sequences and the relationship queries behind genotype resolution.
//!
//! Every function takes a `&Connection`. A caller-owned
//! `rusqlite::Transaction` derefs to one, so the caller alone decides when a
//! batch of writes is committed or rolled back.

pub mod cache;
pub mod genotype;
pub mod lookup;
pub mod queries;
pub mod schema;
pub mod sequence;
pub mod upsert;
pub mod vocab;

use std::str::FromStr;

use chado_markup::MarkupError;
use thiserror::Error;

pub use cache::LookupCache;
pub use lookup::Lookup;

pub type Result<T> = std::result::Result<T, ChadoError>;

#[derive(Debug, Error)]
pub enum ChadoError {
    #[error("Database error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error(transparent)]
    Markup(#[from] MarkupError),
    #[error("{what} not found: {key}")]
    NotFound { what: String, key: String },
    #[error("{what} is ambiguous: {key} matched {count} rows")]
    Ambiguous {
        what: String,
        key: String,
        count: usize,
    },
    #[error("Identifier collision: {0} already exists")]
    IdentifierCollision(String),
    #[error("Expected to create {what} {key}, but it already existed")]
    UnexpectedExisting { what: String, key: String },
    #[error("Invalid obsolete flag {0:?}: expected one of 'f', 't' or 'e'")]
    InvalidObsoleteFlag(String),
}

/// Which `is_obsolete` values a lookup accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Obsolete {
    #[default]
    Current,
    Obsolete,
    Either,
}

impl Obsolete {
    /// SQL predicate on a feature alias, e.g. `f.is_obsolete = 0`.
    pub(crate) fn predicate(&self, alias: &str) -> String {
        match self {
            Obsolete::Current => format!("{}.is_obsolete = 0", alias),
            Obsolete::Obsolete => format!("{}.is_obsolete = 1", alias),
            Obsolete::Either => "1 = 1".to_string(),
        }
    }
}

impl FromStr for Obsolete {
    type Err = ChadoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "f" => Ok(Obsolete::Current),
            "t" => Ok(Obsolete::Obsolete),
            "e" => Ok(Obsolete::Either),
            other => Err(ChadoError::InvalidObsoleteFlag(other.to_string())),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use rusqlite::{params, Connection};

    use crate::schema::{init_db, seed_vocabulary};
    use crate::vocab;

    pub fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        seed_vocabulary(&conn).unwrap();
        conn
    }

    pub fn cvterm_id(conn: &Connection, cv: &str, name: &str) -> i64 {
        conn.query_row(
            "SELECT t.cvterm_id FROM cvterm t JOIN cv ON cv.cv_id = t.cv_id
             WHERE cv.name = ?1 AND t.name = ?2",
            params![cv, name],
            |r| r.get(0),
        )
        .unwrap()
    }

    pub fn add_organism(conn: &Connection, abbreviation: &str, drosophilid: bool) -> i64 {
        let (genus, species) = abbreviation.split_at(1);
        conn.execute(
            "INSERT INTO organism (abbreviation, genus, species) VALUES (?1, ?2, ?3)",
            params![abbreviation, genus, species],
        )
        .unwrap();
        let id = conn.last_insert_rowid();
        if drosophilid {
            let taxgroup = cvterm_id(conn, vocab::CV_PROPERTY_TYPE, vocab::TAXGROUP);
            conn.execute(
                "INSERT INTO organismprop (organism_id, type_id, value) VALUES (?1, ?2, ?3)",
                params![id, taxgroup, vocab::DROSOPHILID],
            )
            .unwrap();
        }
        id
    }

    pub fn add_feature(
        conn: &Connection,
        organism_id: i64,
        uniquename: &str,
        name: &str,
        type_name: &str,
    ) -> i64 {
        let type_id = cvterm_id(conn, vocab::CV_SO, type_name);
        conn.execute(
            "INSERT INTO feature (organism_id, name, uniquename, type_id) VALUES (?1, ?2, ?3, ?4)",
            params![organism_id, name, uniquename, type_id],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    pub fn relate(conn: &Connection, subject_id: i64, object_id: i64, rel_type: &str) -> i64 {
        let type_id = cvterm_id(conn, vocab::CV_RELATIONSHIP_TYPE, rel_type);
        conn.execute(
            "INSERT INTO feature_relationship (subject_id, object_id, type_id) VALUES (?1, ?2, ?3)",
            params![subject_id, object_id, type_id],
        )
        .unwrap();
        conn.last_insert_rowid()
    }
}
