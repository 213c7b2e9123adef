use chado_core::format_curie;
use chado_db::sequence::next_sequence_value;
use chado_db::upsert::{create_unique, upsert_by_unique_key, NewDbxref, NewGenotypeDbxref};
use chado_db::{ChadoError, Result};
use rusqlite::Connection;
use tracing::info;

use crate::cache::ChadoCache;
use crate::config::GenotypeConfig;

/// Take the next curie from the genotype sequence and bind it to the genotype as current.
///
/// A curie that already exists as a dbxref is never reused.
pub fn mint_curie(
    conn: &Connection,
    config: &GenotypeConfig,
    cache: &mut ChadoCache,
    genotype_id: i64,
) -> Result<String> {
    let value = next_sequence_value(conn, &config.curie_sequence)?;
    let curie = format_curie(&config.curie_prefix, value);
    let db = cache.flybase_db(conn, config)?;

    let dbxref = NewDbxref {
        db_id: db.db_id,
        accession: curie.clone(),
    };
    let dbxref_id = match upsert_by_unique_key(conn, &dbxref)? {
        (id, true) => id,
        (_, false) => return Err(ChadoError::IdentifierCollision(curie)),
    };
    create_unique(
        conn,
        &NewGenotypeDbxref {
            genotype_id,
            dbxref_id,
            is_current: true,
        },
    )?;
    info!(%curie, genotype_id, "minted genotype curie");
    Ok(curie)
}
