//! XML domain: element tree and canonicalization.
//!
//! Everything here is pure transformation; parsing failures surface at the
//! tree boundary and canonicalization is total over well-formed trees.

pub mod c14n;
pub mod tree;

pub use c14n::{canonicalize, C14nOptions};
pub use tree::{parse_document, NamespaceDecl, XmlAttribute, XmlElement, XmlNode};
