//! Signature document assembly.
//!
//! Builds the complete `<Signature>` XML document for one role: references,
//! key info, `<SignedInfo>`, exclusive canonicalization, RSA-SHA512 over the
//! canonical octets, and the final render. Each step depends on the complete
//! output of the previous one; the builder is consumed by `sign` so a
//! half-finished instance can never be reused.

use openssl::hash::MessageDigest;
use openssl::sign::Signer;

use crate::domain::constants;
use crate::domain::crypto::SigningKeySet;
use crate::domain::types::{FileEntry, SignatureRole};
use crate::domain::xml::{canonicalize, parse_document, C14nOptions};
use crate::infra::error::{SigningError, SigningResult};
use crate::services::encoding;
use crate::services::keyinfo_builder::KeyInfoBuilderService;
use crate::services::reference_builder::ReferenceBuilderService;

/// One signature operation over an ordered file list.
///
/// The buffers fill in a fixed order: references, key info, `SignedInfo`,
/// canonical form, signature value, document. The input list must not
/// contain this role's own signature file; it is prepended to the output
/// after signing.
pub struct SignatureBuilder {
    role: SignatureRole,
    files: Vec<FileEntry>,
    references_xml: String,
    keyinfo_xml: String,
    signedinfo_xml: String,
}

impl SignatureBuilder {
    #[must_use]
    pub fn new(role: SignatureRole, files: Vec<FileEntry>) -> Self {
        Self {
            role,
            files,
            references_xml: String::new(),
            keyinfo_xml: String::new(),
            signedinfo_xml: String::new(),
        }
    }

    /// Run the full signing sequence and return the file list with the
    /// signature file prepended.
    pub fn sign(mut self, keyset: &SigningKeySet) -> SigningResult<Vec<FileEntry>> {
        log::info!("Signing {} file(s) as {}", self.files.len(), self.role);

        self.build_references();
        self.build_keyinfo(keyset)?;
        self.assemble_signed_info();
        let canonical = self.canonicalize_signed_info()?;
        log::debug!("Canonical SignedInfo: {} bytes", canonical.len());
        let signature_value = compute_signature_value(keyset, canonical.as_bytes())?;
        let document = self.render_document(&signature_value);

        let file_name = self.role.signature_file_name();
        let mut files = self.files;
        files.insert(0, FileEntry::new(file_name, document.into_bytes()));
        Ok(files)
    }

    fn build_references(&mut self) {
        self.references_xml = ReferenceBuilderService::new(self.role).build(&self.files);
    }

    fn build_keyinfo(&mut self, keyset: &SigningKeySet) -> SigningResult<()> {
        self.keyinfo_xml = KeyInfoBuilderService::new().build(keyset)?;
        Ok(())
    }

    fn assemble_signed_info(&mut self) {
        self.signedinfo_xml = format!(
            "<SignedInfo>\n\
             <CanonicalizationMethod Algorithm=\"{c14n}\"></CanonicalizationMethod>\n\
             <SignatureMethod Algorithm=\"{method}\"></SignatureMethod>\n\
             {references}\n\
             </SignedInfo>",
            c14n = constants::EXC_C14N_ALGORITHM,
            method = constants::RSA_SHA512_ALGORITHM,
            references = self.references_xml,
        );
    }

    /// Parse the assembled `SignedInfo` under a throwaway `<Signature>` root
    /// and canonicalize it. The root carries the XML-DSig default namespace,
    /// so the canonical `SignedInfo` re-declares it as its own `xmlns`,
    /// matching what the device recomputes when it verifies.
    fn canonicalize_signed_info(&self) -> SigningResult<String> {
        let wrapper = format!(
            "<Signature xmlns=\"{}\">{}</Signature>",
            constants::XMLDSIG_NS,
            self.signedinfo_xml
        );
        let root = parse_document(&wrapper).map_err(|e| {
            SigningError::MalformedInternalXml(format!(
                "assembled signature wrapper failed to parse: {e}"
            ))
        })?;
        let signed_info = root.first_child_element().ok_or_else(|| {
            SigningError::MalformedInternalXml(
                "assembled signature wrapper has no SignedInfo element".to_string(),
            )
        })?;

        let mut options = C14nOptions::default();
        options.default_namespace_for_prefix.insert(
            "ds".to_string(),
            constants::XMLDSIG_NS_DS_FALLBACK.to_string(),
        );
        Ok(canonicalize(signed_info, &options))
    }

    // `<SignatureValue>` follows `</SignedInfo>` with no separator.
    fn render_document(&self, signature_value: &str) -> String {
        format!(
            "<Signature xmlns=\"{ns}\" Id=\"{id}\">\n\
             {signed_info}<SignatureValue>\n{signature_value}\n</SignatureValue>\n\
             {keyinfo}\n\
             {object}\n\
             </Signature>",
            ns = constants::XMLDSIG_NS,
            id = self.role.id(),
            signed_info = self.signedinfo_xml,
            signature_value = signature_value,
            keyinfo = self.keyinfo_xml,
            object = self.property_object(),
        )
    }

    /// The signed property block. Emitted as a single line: the `#prop`
    /// digest constants were computed over this exact byte sequence, so any
    /// whitespace between the inner elements would break verification.
    fn property_object(&self) -> String {
        let id = self.role.id();
        format!(
            "<Object Id=\"prop\">\
             <SignatureProperties xmlns:dsp=\"{dsp}\">\
             <SignatureProperty Id=\"profile\" Target=\"#{id}\">\
             <dsp:Profile URI=\"{profile}\"></dsp:Profile>\
             </SignatureProperty>\
             <SignatureProperty Id=\"role\" Target=\"#{id}\">\
             <dsp:Role URI=\"{role_base}{role}\"></dsp:Role>\
             </SignatureProperty>\
             <SignatureProperty Id=\"identifier\" Target=\"#{id}\">\
             <dsp:Identifier></dsp:Identifier>\
             </SignatureProperty>\
             </SignatureProperties>\
             </Object>",
            dsp = constants::DSIG_PROPERTIES_NS,
            profile = constants::WIDGETS_DIGSIG_PROFILE_URI,
            role_base = constants::WIDGETS_DIGSIG_ROLE_URI_BASE,
            role = self.role.role_suffix(),
        )
    }
}

/// RSA-SHA512 (PKCS#1 v1.5) over the canonical octets, Base64-wrapped.
fn compute_signature_value(keyset: &SigningKeySet, canonical: &[u8]) -> SigningResult<String> {
    let mut signer = Signer::new(MessageDigest::sha512(), keyset.private_key())
        .map_err(|e| SigningError::CryptoFailure(format!("Failed to initialize signer: {e}")))?;
    signer
        .update(canonical)
        .map_err(|e| SigningError::CryptoFailure(format!("Failed to hash SignedInfo: {e}")))?;
    let signature = signer
        .sign_to_vec()
        .map_err(|e| SigningError::CryptoFailure(format!("RSA-SHA512 signing failed: {e}")))?;
    Ok(encoding::base64_block(&signature))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_info_assembly_order() {
        let mut builder = SignatureBuilder::new(
            SignatureRole::Author,
            vec![FileEntry::new("index.html", b"<html></html>".to_vec())],
        );
        builder.build_references();
        builder.assemble_signed_info();

        let signed_info = &builder.signedinfo_xml;
        assert!(signed_info.starts_with("<SignedInfo>\n<CanonicalizationMethod"));
        assert!(signed_info.ends_with("</Reference>\n</SignedInfo>"));
        let c14n_at = signed_info.find(constants::EXC_C14N_ALGORITHM).unwrap();
        let method_at = signed_info.find(constants::RSA_SHA512_ALGORITHM).unwrap();
        let reference_at = signed_info.find("<Reference").unwrap();
        assert!(c14n_at < method_at);
        assert!(method_at < reference_at);
    }

    #[test]
    fn canonical_signed_info_declares_xmldsig_namespace() {
        let mut builder = SignatureBuilder::new(SignatureRole::Author, Vec::new());
        builder.build_references();
        builder.assemble_signed_info();

        let canonical = builder.canonicalize_signed_info().unwrap();
        assert!(canonical
            .starts_with("<SignedInfo xmlns=\"http://www.w3.org/2000/09/xmldsig#\">"));
        assert!(canonical.ends_with("</SignedInfo>"));
        // Canonical output keeps the assembled line structure.
        assert!(canonical.contains(">\n<SignatureMethod"));
    }

    #[test]
    fn property_object_is_single_line() {
        let builder = SignatureBuilder::new(SignatureRole::Distributor, Vec::new());
        let object = builder.property_object();
        assert!(!object.contains('\n'));
        assert!(object.starts_with("<Object Id=\"prop\">"));
        assert!(object.contains("Target=\"#DistributorSignature\""));
        assert!(object.contains("widgets-digsig#role-distributor"));
        assert!(object.contains("<dsp:Identifier></dsp:Identifier>"));
    }
}
