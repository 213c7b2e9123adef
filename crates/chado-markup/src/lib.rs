//! Conversions between the three renderings of a FlyBase symbol: the internal
//! SGML-like markup (`&agr;`, `<up>1</up>`), Unicode, and plain text.

pub mod greek;
pub mod sgml;
pub mod subsup;

use thiserror::Error;

pub use sgml::{sgml_to_plain_text, sgml_to_unicode, unicode_to_plain_text, unicode_to_sgml};
pub use subsup::{sgml_to_sub_sup, sub_sup_to_sgml};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkupError {
    #[error("Unknown entity &{0}; in symbol")]
    UnknownEntity(String),
    #[error("Could not tokenize symbol: {0}")]
    Tokenize(String),
}
