use chado_db::schema::{init_db, seed_vocabulary};
use chado_db::vocab;
use rusqlite::{params, Connection};

use crate::config::UNSPECIFIED_INSERTION_PUB;

/// In-memory database with a drosophilid organism and a curated reference.
pub struct Fixture {
    pub conn: Connection,
    pub dmel: i64,
    pub pub_id: i64,
}

impl Fixture {
    pub fn new() -> Self {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        seed_vocabulary(&conn).unwrap();

        conn.execute(
            "INSERT INTO organism (abbreviation, genus, species) VALUES ('Dmel', 'Drosophila', 'melanogaster')",
            [],
        )
        .unwrap();
        let dmel = conn.last_insert_rowid();
        let taxgroup = term(&conn, vocab::CV_PROPERTY_TYPE, vocab::TAXGROUP);
        conn.execute(
            "INSERT INTO organismprop (organism_id, type_id, value) VALUES (?1, ?2, ?3)",
            params![dmel, taxgroup, vocab::DROSOPHILID],
        )
        .unwrap();

        conn.execute("INSERT INTO pub (uniquename) VALUES ('FBrf0000001')", [])
            .unwrap();
        let pub_id = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO pub (uniquename) VALUES (?1)",
            params![UNSPECIFIED_INSERTION_PUB],
        )
        .unwrap();

        Self { conn, dmel, pub_id }
    }

    /// Dmel feature whose name is also its current symbol.
    pub fn feature(&self, uniquename: &str, symbol: &str, so_term: &str) -> i64 {
        let type_id = term(&self.conn, vocab::CV_SO, so_term);
        self.conn
            .execute(
                "INSERT INTO feature (organism_id, name, uniquename, type_id) VALUES (?1, ?2, ?3, ?4)",
                params![self.dmel, symbol, uniquename, type_id],
            )
            .unwrap();
        let feature_id = self.conn.last_insert_rowid();

        let symbol_type = term(&self.conn, vocab::CV_SYNONYM_TYPE, vocab::SYMBOL);
        self.conn
            .execute(
                "INSERT OR IGNORE INTO synonym (name, synonym_sgml, type_id) VALUES (?1, ?1, ?2)",
                params![symbol, symbol_type],
            )
            .unwrap();
        let synonym_id: i64 = self
            .conn
            .query_row(
                "SELECT synonym_id FROM synonym WHERE name = ?1 AND type_id = ?2",
                params![symbol, symbol_type],
                |r| r.get(0),
            )
            .unwrap();
        self.conn
            .execute(
                "INSERT INTO feature_synonym (feature_id, synonym_id, pub_id, is_current)
                 VALUES (?1, ?2, ?3, 1)",
                params![feature_id, synonym_id, self.pub_id],
            )
            .unwrap();
        feature_id
    }

    pub fn uniquename(&self, feature_id: i64) -> String {
        self.conn
            .query_row(
                "SELECT uniquename FROM feature WHERE feature_id = ?1",
                [feature_id],
                |r| r.get(0),
            )
            .unwrap()
    }

    pub fn relate(&self, subject_id: i64, object_id: i64, rel_type: &str) -> i64 {
        let type_id = term(&self.conn, vocab::CV_RELATIONSHIP_TYPE, rel_type);
        self.conn
            .execute(
                "INSERT INTO feature_relationship (subject_id, object_id, type_id) VALUES (?1, ?2, ?3)",
                params![subject_id, object_id, type_id],
            )
            .unwrap();
        self.conn.last_insert_rowid()
    }

    pub fn relate_with_pub(&self, subject_id: i64, object_id: i64, rel_type: &str, pub_uniquename: &str) -> i64 {
        let rel = self.relate(subject_id, object_id, rel_type);
        self.conn
            .execute(
                "INSERT INTO feature_relationship_pub (feature_relationship_id, pub_id)
                 SELECT ?1, pub_id FROM pub WHERE uniquename = ?2",
                params![rel, pub_uniquename],
            )
            .unwrap();
        rel
    }

    /// Flag an allele → insertion link as the one to report.
    pub fn mark_representative(&self, feature_relationship_id: i64) {
        let type_id = term(&self.conn, vocab::CV_PROPERTY_TYPE, vocab::GENOTYPE_REPRESENTATIVE);
        self.conn
            .execute(
                "INSERT INTO feature_relationshipprop (feature_relationship_id, type_id) VALUES (?1, ?2)",
                params![feature_relationship_id, type_id],
            )
            .unwrap();
    }

    pub fn link_pub(&self, feature_id: i64, pub_id: i64) {
        self.conn
            .execute(
                "INSERT INTO feature_pub (feature_id, pub_id) VALUES (?1, ?2)",
                params![feature_id, pub_id],
            )
            .unwrap();
    }

    pub fn annotate(&self, feature_id: i64, cv: &str, cvterm: &str) {
        let cvterm_id = term(&self.conn, cv, cvterm);
        self.conn
            .execute(
                "INSERT INTO feature_cvterm (feature_id, cvterm_id, pub_id) VALUES (?1, ?2, ?3)",
                params![feature_id, cvterm_id, self.pub_id],
            )
            .unwrap();
    }
}

fn term(conn: &Connection, cv: &str, name: &str) -> i64 {
    conn.query_row(
        "SELECT t.cvterm_id FROM cvterm t JOIN cv ON cv.cv_id = t.cv_id
         WHERE cv.name = ?1 AND t.name = ?2",
        params![cv, name],
        |r| r.get(0),
    )
    .unwrap()
}
