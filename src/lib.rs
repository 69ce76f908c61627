//! Tizen Signer Library
//!
//! A self-contained library for signing Tizen application packages (`.wgt`
//! widgets and `.tpk` native packages) without Tizen Studio. Produces the
//! author and distributor XML signatures of the widget-digsig profile:
//! SHA-512 references over every package file, exclusive canonicalization
//! of `<SignedInfo>`, and an RSA-SHA512 signature bound to the PKCS#12
//! certificate chain.

pub mod domain;
pub mod infra;
pub mod pipelines;
pub mod services;

use std::path::Path;

pub use domain::crypto::SigningKeySet;
pub use domain::types::{FileEntry, P12Password, SignatureRole};
pub use infra::config::{ConfigManager, SigningConfiguration};
pub use infra::error::{SigningError, SigningResult};
pub use pipelines::SignWorkflow;
pub use services::SignatureBuilder;

/// Main signing function - signs a package file using PKCS#12 bundles
pub fn sign_package<P: AsRef<Path>>(
    input_path: P,
    output_path: P,
    author_p12: P,
    author_password: &P12Password,
    distributor_p12: P,
    distributor_password: &P12Password,
) -> SigningResult<()> {
    log::info!("Starting package signing process");

    let author = SigningKeySet::from_pkcs12_file(&author_p12, author_password)?;
    log::info!("Loaded author key material");

    let distributor = SigningKeySet::from_pkcs12_file(&distributor_p12, distributor_password)?;
    log::info!("Loaded distributor key material");

    SignWorkflow::new().sign_package_file(
        input_path.as_ref(),
        output_path.as_ref(),
        &author,
        &distributor,
    )
}
