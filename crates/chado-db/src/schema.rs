use rusqlite::{params, Connection, Result as SqlResult};

use crate::vocab;

/// Create the Chado tables if they do not exist.
pub fn init_db(conn: &Connection) -> SqlResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS db (
            db_id       INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL UNIQUE
        );
        CREATE TABLE IF NOT EXISTS dbxref (
            dbxref_id   INTEGER PRIMARY KEY AUTOINCREMENT,
            db_id       INTEGER NOT NULL REFERENCES db(db_id),
            accession   TEXT NOT NULL,
            version     TEXT NOT NULL DEFAULT '',
            UNIQUE(db_id, accession, version)
        );
        CREATE TABLE IF NOT EXISTS cv (
            cv_id       INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL UNIQUE
        );
        CREATE TABLE IF NOT EXISTS cvterm (
            cvterm_id   INTEGER PRIMARY KEY AUTOINCREMENT,
            cv_id       INTEGER NOT NULL REFERENCES cv(cv_id),
            name        TEXT NOT NULL,
            is_obsolete INTEGER NOT NULL DEFAULT 0,
            UNIQUE(cv_id, name, is_obsolete)
        );
        CREATE TABLE IF NOT EXISTS organism (
            organism_id  INTEGER PRIMARY KEY AUTOINCREMENT,
            abbreviation TEXT NOT NULL UNIQUE,
            genus        TEXT NOT NULL,
            species      TEXT NOT NULL,
            UNIQUE(genus, species)
        );
        CREATE TABLE IF NOT EXISTS organismprop (
            organismprop_id INTEGER PRIMARY KEY AUTOINCREMENT,
            organism_id     INTEGER NOT NULL REFERENCES organism(organism_id),
            type_id         INTEGER NOT NULL REFERENCES cvterm(cvterm_id),
            value           TEXT,
            rank            INTEGER NOT NULL DEFAULT 0,
            UNIQUE(organism_id, type_id, rank)
        );
        CREATE TABLE IF NOT EXISTS pub (
            pub_id      INTEGER PRIMARY KEY AUTOINCREMENT,
            uniquename  TEXT NOT NULL UNIQUE,
            title       TEXT,
            is_obsolete INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS feature (
            feature_id  INTEGER PRIMARY KEY AUTOINCREMENT,
            organism_id INTEGER NOT NULL REFERENCES organism(organism_id),
            name        TEXT NOT NULL,
            uniquename  TEXT NOT NULL,
            type_id     INTEGER NOT NULL REFERENCES cvterm(cvterm_id),
            is_obsolete INTEGER NOT NULL DEFAULT 0,
            is_analysis INTEGER NOT NULL DEFAULT 0,
            UNIQUE(organism_id, uniquename, type_id)
        );
        CREATE INDEX IF NOT EXISTS idx_feature_name ON feature(name);
        CREATE INDEX IF NOT EXISTS idx_feature_uniquename ON feature(uniquename);
        CREATE TABLE IF NOT EXISTS feature_pub (
            feature_pub_id INTEGER PRIMARY KEY AUTOINCREMENT,
            feature_id     INTEGER NOT NULL REFERENCES feature(feature_id),
            pub_id         INTEGER NOT NULL REFERENCES pub(pub_id),
            UNIQUE(feature_id, pub_id)
        );
        CREATE TABLE IF NOT EXISTS featureprop (
            featureprop_id INTEGER PRIMARY KEY AUTOINCREMENT,
            feature_id     INTEGER NOT NULL REFERENCES feature(feature_id),
            type_id        INTEGER NOT NULL REFERENCES cvterm(cvterm_id),
            value          TEXT,
            rank           INTEGER NOT NULL DEFAULT 0,
            UNIQUE(feature_id, type_id, rank)
        );
        CREATE TABLE IF NOT EXISTS feature_cvterm (
            feature_cvterm_id INTEGER PRIMARY KEY AUTOINCREMENT,
            feature_id        INTEGER NOT NULL REFERENCES feature(feature_id),
            cvterm_id         INTEGER NOT NULL REFERENCES cvterm(cvterm_id),
            pub_id            INTEGER NOT NULL REFERENCES pub(pub_id),
            UNIQUE(feature_id, cvterm_id, pub_id)
        );
        CREATE TABLE IF NOT EXISTS feature_relationship (
            feature_relationship_id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject_id              INTEGER NOT NULL REFERENCES feature(feature_id),
            object_id               INTEGER NOT NULL REFERENCES feature(feature_id),
            type_id                 INTEGER NOT NULL REFERENCES cvterm(cvterm_id),
            rank                    INTEGER NOT NULL DEFAULT 0,
            UNIQUE(subject_id, object_id, type_id, rank)
        );
        CREATE INDEX IF NOT EXISTS idx_fr_subject ON feature_relationship(subject_id);
        CREATE INDEX IF NOT EXISTS idx_fr_object ON feature_relationship(object_id);
        CREATE TABLE IF NOT EXISTS feature_relationship_pub (
            feature_relationship_pub_id INTEGER PRIMARY KEY AUTOINCREMENT,
            feature_relationship_id     INTEGER NOT NULL
                REFERENCES feature_relationship(feature_relationship_id),
            pub_id                      INTEGER NOT NULL REFERENCES pub(pub_id),
            UNIQUE(feature_relationship_id, pub_id)
        );
        CREATE TABLE IF NOT EXISTS feature_relationshipprop (
            feature_relationshipprop_id INTEGER PRIMARY KEY AUTOINCREMENT,
            feature_relationship_id     INTEGER NOT NULL
                REFERENCES feature_relationship(feature_relationship_id),
            type_id                     INTEGER NOT NULL REFERENCES cvterm(cvterm_id),
            value                       TEXT,
            rank                        INTEGER NOT NULL DEFAULT 0,
            UNIQUE(feature_relationship_id, type_id, rank)
        );
        CREATE TABLE IF NOT EXISTS synonym (
            synonym_id   INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT NOT NULL,
            type_id      INTEGER NOT NULL REFERENCES cvterm(cvterm_id),
            synonym_sgml TEXT NOT NULL,
            UNIQUE(name, type_id)
        );
        CREATE TABLE IF NOT EXISTS feature_synonym (
            feature_synonym_id INTEGER PRIMARY KEY AUTOINCREMENT,
            synonym_id         INTEGER NOT NULL REFERENCES synonym(synonym_id),
            feature_id         INTEGER NOT NULL REFERENCES feature(feature_id),
            pub_id             INTEGER NOT NULL REFERENCES pub(pub_id),
            is_current         INTEGER NOT NULL DEFAULT 0,
            is_internal        INTEGER NOT NULL DEFAULT 0,
            UNIQUE(synonym_id, feature_id, pub_id)
        );
        CREATE TABLE IF NOT EXISTS genotype (
            genotype_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT,
            uniquename  TEXT NOT NULL UNIQUE,
            description TEXT,
            is_obsolete INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS genotype_dbxref (
            genotype_dbxref_id INTEGER PRIMARY KEY AUTOINCREMENT,
            genotype_id        INTEGER NOT NULL REFERENCES genotype(genotype_id),
            dbxref_id          INTEGER NOT NULL REFERENCES dbxref(dbxref_id),
            is_current         INTEGER NOT NULL DEFAULT 1,
            UNIQUE(genotype_id, dbxref_id)
        );
        CREATE TABLE IF NOT EXISTS genotype_synonym (
            genotype_synonym_id INTEGER PRIMARY KEY AUTOINCREMENT,
            genotype_id         INTEGER NOT NULL REFERENCES genotype(genotype_id),
            synonym_id          INTEGER NOT NULL REFERENCES synonym(synonym_id),
            pub_id              INTEGER NOT NULL REFERENCES pub(pub_id),
            is_current          INTEGER NOT NULL DEFAULT 0,
            is_internal         INTEGER NOT NULL DEFAULT 0,
            UNIQUE(synonym_id, genotype_id, pub_id)
        );
        CREATE TABLE IF NOT EXISTS feature_genotype (
            feature_genotype_id INTEGER PRIMARY KEY AUTOINCREMENT,
            feature_id          INTEGER NOT NULL REFERENCES feature(feature_id),
            genotype_id         INTEGER NOT NULL REFERENCES genotype(genotype_id),
            cgroup              INTEGER NOT NULL,
            rank                INTEGER NOT NULL,
            UNIQUE(feature_id, genotype_id, cgroup, rank)
        );
        CREATE TABLE IF NOT EXISTS id_sequence (
            name       TEXT PRIMARY KEY,
            last_value INTEGER NOT NULL
        );",
    )
}

fn seed_cv(conn: &Connection, cv: &str, terms: &[&str]) -> SqlResult<usize> {
    let mut count = conn.execute("INSERT OR IGNORE INTO cv (name) VALUES (?1)", params![cv])?;
    for term in terms {
        count += conn.execute(
            "INSERT OR IGNORE INTO cvterm (cv_id, name)
             SELECT cv_id, ?2 FROM cv WHERE name = ?1",
            params![cv, term],
        )?;
    }
    Ok(count)
}

/// Seed the fixed vocabulary, db, pub and organism rows (idempotent via INSERT OR IGNORE).
/// Returns the number of newly inserted rows.
pub fn seed_vocabulary(conn: &Connection) -> SqlResult<usize> {
    let mut count = 0usize;
    count += seed_cv(conn, vocab::CV_SO, vocab::SO_TERMS)?;
    count += seed_cv(conn, vocab::CV_RELATIONSHIP_TYPE, vocab::RELATIONSHIP_TERMS)?;
    count += seed_cv(conn, vocab::CV_SYNONYM_TYPE, vocab::SYNONYM_TERMS)?;
    count += seed_cv(conn, vocab::CV_PROPERTY_TYPE, vocab::PROPERTY_TERMS)?;
    count += seed_cv(conn, vocab::CV_MISC, vocab::MISC_TERMS)?;
    count += conn.execute(
        "INSERT OR IGNORE INTO db (name) VALUES (?1)",
        params![vocab::FLYBASE_DB],
    )?;
    count += conn.execute(
        "INSERT OR IGNORE INTO pub (uniquename, title) VALUES (?1, ?1)",
        params![vocab::UNATTRIBUTED_PUB],
    )?;
    count += conn.execute(
        "INSERT OR IGNORE INTO organism (abbreviation, genus, species) VALUES (?1, ?1, 'unknown')",
        params![vocab::UNKNOWN_ORGANISM],
    )?;
    Ok(count)
}
