use chado_core::{CvtermRecord, DbRecord, PubRecord};
use chado_db::{vocab, LookupCache, Result};
use rusqlite::Connection;

use crate::config::GenotypeConfig;

/// Lookups repeated throughout one annotation's processing.
///
/// Owned by a single `GenotypeAnnotation` and dropped with it.
#[derive(Debug, Default)]
pub struct ChadoCache {
    flybase_db: Option<DbRecord>,
    unattributed_pub: Option<PubRecord>,
    symbol_term: Option<CvtermRecord>,
    lookups: LookupCache,
}

impl ChadoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flybase_db(&mut self, conn: &Connection, config: &GenotypeConfig) -> Result<DbRecord> {
        if let Some(db) = &self.flybase_db {
            return Ok(db.clone());
        }
        let db = self.lookups.db(conn, &config.flybase_db)?;
        self.flybase_db = Some(db.clone());
        Ok(db)
    }

    pub fn unattributed_pub(
        &mut self,
        conn: &Connection,
        config: &GenotypeConfig,
    ) -> Result<PubRecord> {
        if let Some(p) = &self.unattributed_pub {
            return Ok(p.clone());
        }
        let p = self.lookups.publication(conn, &config.unattributed_pub)?;
        self.unattributed_pub = Some(p.clone());
        Ok(p)
    }

    pub fn symbol_term(&mut self, conn: &Connection) -> Result<CvtermRecord> {
        if let Some(term) = &self.symbol_term {
            return Ok(term.clone());
        }
        let term = self.lookups.cvterm(conn, vocab::CV_SYNONYM_TYPE, vocab::SYMBOL)?;
        self.symbol_term = Some(term.clone());
        Ok(term)
    }

    /// Less frequent vocabulary and organism lookups.
    pub fn lookups(&mut self) -> &mut LookupCache {
        &mut self.lookups
    }
}
