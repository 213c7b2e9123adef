//! Shared vocabulary for the FlyBase Chado curation helpers: typed external
//! identifiers and the record shapes read from and written to the database.

pub mod ids;
pub mod record;

pub use ids::*;
pub use record::*;
