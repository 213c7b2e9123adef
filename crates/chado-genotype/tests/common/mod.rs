use chado_db::lookup::get_pub;
use chado_db::schema::{init_db, seed_vocabulary};
use chado_genotype::{GenotypeAnnotation, GenotypeConfig};
use rusqlite::Connection;

const FLYBASE_SUBSET: &str = include_str!("../fixtures/flybase_subset.sql");

pub const CURATED_PUB: &str = "FBrf0000001";

pub fn fixture_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_db(&conn).unwrap();
    seed_vocabulary(&conn).unwrap();
    conn.execute_batch(FLYBASE_SUBSET).unwrap();
    conn
}

pub fn annotate(conn: &Connection, input: &str) -> GenotypeAnnotation {
    let pub_id = get_pub(conn, CURATED_PUB).unwrap().pub_id;
    GenotypeAnnotation::new(input, conn, pub_id, &GenotypeConfig::default()).unwrap()
}

pub fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |r| r.get(0)).unwrap()
}
