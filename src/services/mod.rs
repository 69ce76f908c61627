//! Service layer module root.
//! Contains the signature construction services and package archive IO.

pub mod encoding;
pub mod keyinfo_builder;
pub mod package;
pub mod reference_builder;
pub mod signature_builder;

pub use keyinfo_builder::KeyInfoBuilderService;
pub use package::PackageArchiveService;
pub use reference_builder::ReferenceBuilderService;
pub use signature_builder::SignatureBuilder;
