use std::collections::HashMap;

use chado_core::{CvtermRecord, DbRecord, FeatureRecord, OrganismRecord, PubRecord};
use rusqlite::Connection;
use tracing::debug;

use crate::lookup::{feature_lookup, get_cvterm, get_db, get_organism, get_pub};
use crate::{Obsolete, Result};

/// Memoizes vocabulary and feature lookups for the lifetime of one batch.
///
/// Only successful lookups are cached; failures are re-queried on the next
/// call. Call [`LookupCache::invalidate`] if rows may have changed mid-run.
#[derive(Debug, Default)]
pub struct LookupCache {
    cvterms: HashMap<(String, String), CvtermRecord>,
    dbs: HashMap<String, DbRecord>,
    organisms: HashMap<String, OrganismRecord>,
    pubs: HashMap<String, PubRecord>,
    features: HashMap<String, FeatureRecord>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cvterm(&mut self, conn: &Connection, cv: &str, name: &str) -> Result<CvtermRecord> {
        let key = (cv.to_string(), name.to_string());
        if let Some(hit) = self.cvterms.get(&key) {
            return Ok(hit.clone());
        }
        let term = get_cvterm(conn, cv, name)?;
        self.cvterms.insert(key, term.clone());
        Ok(term)
    }

    pub fn db(&mut self, conn: &Connection, name: &str) -> Result<DbRecord> {
        if let Some(hit) = self.dbs.get(name) {
            return Ok(hit.clone());
        }
        let db = get_db(conn, name)?;
        self.dbs.insert(name.to_string(), db.clone());
        Ok(db)
    }

    pub fn organism(&mut self, conn: &Connection, abbreviation: &str) -> Result<OrganismRecord> {
        if let Some(hit) = self.organisms.get(abbreviation) {
            return Ok(hit.clone());
        }
        let organism = get_organism(conn, abbreviation)?;
        self.organisms.insert(abbreviation.to_string(), organism.clone());
        Ok(organism)
    }

    pub fn publication(&mut self, conn: &Connection, uniquename: &str) -> Result<PubRecord> {
        if let Some(hit) = self.pubs.get(uniquename) {
            return Ok(hit.clone());
        }
        let publication = get_pub(conn, uniquename)?;
        self.pubs.insert(uniquename.to_string(), publication.clone());
        Ok(publication)
    }

    /// Current (non-obsolete) feature by uniquename.
    pub fn feature(&mut self, conn: &Connection, uniquename: &str) -> Result<FeatureRecord> {
        if let Some(hit) = self.features.get(uniquename) {
            return Ok(hit.clone());
        }
        let feature = feature_lookup(conn, uniquename, Obsolete::Current)?;
        self.features.insert(uniquename.to_string(), feature.clone());
        Ok(feature)
    }

    pub fn len(&self) -> usize {
        self.cvterms.len() + self.dbs.len() + self.organisms.len() + self.pubs.len() + self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn invalidate(&mut self) {
        debug!(entries = self.len(), "invalidating lookup cache");
        self.cvterms.clear();
        self.dbs.clear();
        self.organisms.clear();
        self.pubs.clear();
        self.features.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use crate::vocab;

    #[test]
    fn test_cache_hits_survive_row_deletion() {
        let conn = test_db();
        let mut cache = LookupCache::new();
        let db = cache.db(&conn, vocab::FLYBASE_DB).unwrap();

        conn.execute("DELETE FROM db", []).unwrap();
        assert_eq!(cache.db(&conn, vocab::FLYBASE_DB).unwrap(), db);

        cache.invalidate();
        assert!(cache.is_empty());
        assert!(cache.db(&conn, vocab::FLYBASE_DB).is_err());
    }

    #[test]
    fn test_failures_are_not_cached() {
        let conn = test_db();
        let mut cache = LookupCache::new();
        assert!(cache.organism(&conn, "Dmel").is_err());
        add_organism(&conn, "Dmel", true);
        assert_eq!(cache.organism(&conn, "Dmel").unwrap().abbreviation, "Dmel");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_feature_and_term_lookups() {
        let conn = test_db();
        let dmel = add_organism(&conn, "Dmel", true);
        add_feature(&conn, dmel, "FBgn0284084", "wg", vocab::GENE);
        let mut cache = LookupCache::new();
        assert_eq!(cache.feature(&conn, "FBgn0284084").unwrap().name, "wg");
        assert_eq!(
            cache.cvterm(&conn, vocab::CV_SO, vocab::GENE).unwrap().name,
            vocab::GENE
        );
        assert!(cache.publication(&conn, vocab::UNATTRIBUTED_PUB).is_ok());
        assert_eq!(cache.len(), 3);
    }
}
