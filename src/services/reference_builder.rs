//! `<Reference>` fragment construction.
//!
//! Each package file becomes one `<Reference URI="...">` carrying the
//! SHA-512 digest of its bytes; the fixed `#prop` reference closes the list.
//! Fragment order follows file order because the canonicalized `<SignedInfo>`
//! binds it.

use sha2::{Digest, Sha512};

use crate::domain::constants;
use crate::domain::types::{FileEntry, SignatureRole};
use crate::services::encoding;

pub struct ReferenceBuilderService {
    role: SignatureRole,
}

impl ReferenceBuilderService {
    #[must_use]
    pub fn new(role: SignatureRole) -> Self {
        Self { role }
    }

    /// Render all references for `files` in input order, then `#prop`.
    #[must_use]
    pub fn build(&self, files: &[FileEntry]) -> String {
        let mut fragments: Vec<String> = files
            .iter()
            .map(|entry| self.file_reference(entry))
            .collect();
        fragments.push(self.property_reference());
        fragments.join("\n")
    }

    fn file_reference(&self, entry: &FileEntry) -> String {
        let digest = Sha512::digest(&entry.data);
        format!(
            "<Reference URI=\"{uri}\">\n\
             <DigestMethod Algorithm=\"{algorithm}\"></DigestMethod>\n\
             <DigestValue>{digest}</DigestValue>\n\
             </Reference>",
            uri = entry.uri,
            algorithm = constants::SHA512_DIGEST_ALGORITHM,
            digest = encoding::base64_block(digest.as_slice()),
        )
    }

    /// The `#prop` reference. Its target is byte-identical for every package
    /// of a given role, so the digest is a constant rather than a computation.
    fn property_reference(&self) -> String {
        format!(
            "<Reference URI=\"#prop\">\n\
             <Transforms>\n\
             <Transform Algorithm=\"{transform}\"></Transform>\n\
             </Transforms>\n\
             <DigestMethod Algorithm=\"{algorithm}\"></DigestMethod>\n\
             <DigestValue>{digest}</DigestValue>\n\
             </Reference>",
            transform = constants::C14N11_ALGORITHM,
            algorithm = constants::SHA512_DIGEST_ALGORITHM,
            digest = encoding::wrap_at_columns(
                self.role.prop_digest(),
                constants::BASE64_LINE_WIDTH
            ),
        )
    }
}
