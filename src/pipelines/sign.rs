//! `SignWorkflow` orchestrates core signing steps.
//!
//! Unpacks the package, applies the author signature over every package
//! file, applies the distributor signature over every package file plus the
//! author signature, and repacks. Everything runs in memory; a failure at
//! any step leaves the input untouched.

use std::path::Path;

use crate::domain::crypto::SigningKeySet;
use crate::domain::types::SignatureRole;
use crate::infra::error::{SigningError, SigningResult};
use crate::services::{PackageArchiveService, SignatureBuilder};

pub struct SignWorkflow;

impl SignWorkflow {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Sign a package file on disk with both signatures.
    pub fn sign_package_file<P: AsRef<Path>>(
        &self,
        input: P,
        output: P,
        author: &SigningKeySet,
        distributor: &SigningKeySet,
    ) -> SigningResult<()> {
        let input_path = input.as_ref();
        let output_path = output.as_ref();

        let package = std::fs::read(input_path)
            .map_err(|e| SigningError::IoError(format!("Failed to read input package: {e}")))?;
        let signed = self.sign_package_bytes(&package, author, distributor)?;
        std::fs::write(output_path, signed)
            .map_err(|e| SigningError::IoError(format!("Failed to write output package: {e}")))?;

        log::info!("Successfully signed package: {}", output_path.display());
        Ok(())
    }

    /// Sign an in-memory package archive with both signatures.
    pub fn sign_package_bytes(
        &self,
        package: &[u8],
        author: &SigningKeySet,
        distributor: &SigningKeySet,
    ) -> SigningResult<Vec<u8>> {
        let archive = PackageArchiveService::new();

        // 1. Unpack, dropping stale signature entries so re-signing works
        let entries = archive.read_entries(package)?;
        log::info!("Package contains {} file(s) to sign", entries.len());

        // 2. Author signature over the package files
        let entries = SignatureBuilder::new(SignatureRole::Author, entries).sign(author)?;

        // 3. Distributor signature, additionally covering author-signature.xml
        let entries =
            SignatureBuilder::new(SignatureRole::Distributor, entries).sign(distributor)?;

        // 4. Repack in list order
        archive.write_package(&entries)
    }
}

impl Default for SignWorkflow {
    fn default() -> Self {
        Self::new()
    }
}
