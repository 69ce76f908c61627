//! `<KeyInfo>` construction from the extracted certificate chain.

use openssl::x509::X509;

use crate::domain::constants::BASE64_LINE_WIDTH;
use crate::domain::crypto::SigningKeySet;
use crate::infra::error::{SigningError, SigningResult};
use crate::services::encoding;

pub struct KeyInfoBuilderService;

impl KeyInfoBuilderService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emit `<KeyInfo><X509Data>` with one `<X509Certificate>` per chain
    /// certificate, in bundle order. The verifier treats the first
    /// certificate as the signer, so order is load-bearing.
    pub fn build(&self, keyset: &SigningKeySet) -> SigningResult<String> {
        let mut certificates = String::new();
        for certificate in keyset.certificates() {
            certificates.push_str(&self.certificate_fragment(certificate)?);
            certificates.push('\n');
        }
        Ok(format!(
            "<KeyInfo>\n<X509Data>\n{certificates}</X509Data>\n</KeyInfo>"
        ))
    }

    fn certificate_fragment(&self, certificate: &X509) -> SigningResult<String> {
        let pem = certificate.to_pem()?;
        let body = pem_body(&pem)?;
        Ok(format!(
            "<X509Certificate>\n{}\n</X509Certificate>",
            encoding::wrap_at_columns(&body, BASE64_LINE_WIDTH)
        ))
    }
}

impl Default for KeyInfoBuilderService {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip the PEM armor and line breaks, leaving the raw Base64 body.
fn pem_body(pem: &[u8]) -> SigningResult<String> {
    let text = std::str::from_utf8(pem).map_err(|e| {
        SigningError::CryptoFailure(format!("PEM encoding is not valid UTF-8: {e}"))
    })?;
    let body: String = text
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .collect();
    if body.is_empty() {
        return Err(SigningError::CryptoFailure(
            "PEM encoding has no certificate body".to_string(),
        ));
    }
    Ok(body)
}
