use std::fmt;
use std::path::Path;

use openssl::pkcs12::Pkcs12;
use openssl::pkey::{PKey, Private};
use openssl::x509::X509;

use crate::domain::types::P12Password;
use crate::infra::error::{SigningError, SigningResult};

/// Certificate chain and private key extracted from a PKCS#12 bundle.
///
/// Certificate order follows bundle order, leaf first; the Tizen verifier
/// uses the first certificate as the signer and the remainder as chain.
/// Bundles with scrambled bag order are an input problem, not something
/// this type repairs.
pub struct SigningKeySet {
    certificates: Vec<X509>,
    private_key: PKey<Private>,
}

impl SigningKeySet {
    /// Decrypt a PKCS#12 bundle and unpack its safe bags.
    pub fn from_pkcs12_der(der: &[u8], password: &P12Password) -> SigningResult<Self> {
        let bundle = Pkcs12::from_der(der).map_err(|e| {
            SigningError::InvalidKeyMaterial(format!("Failed to parse PKCS#12 bundle: {e}"))
        })?;
        let parsed = bundle.parse2(password.as_str()).map_err(|e| {
            SigningError::InvalidKeyMaterial(format!("Failed to decrypt PKCS#12 bundle: {e}"))
        })?;

        let private_key = parsed.pkey.ok_or_else(|| {
            SigningError::InvalidKeyMaterial("PKCS#12 bundle contains no private key".to_string())
        })?;
        private_key.rsa().map_err(|_| {
            SigningError::InvalidKeyMaterial(
                "PKCS#12 private key is not an RSA key; only RSA-SHA512 signing is supported"
                    .to_string(),
            )
        })?;

        let mut certificates = Vec::new();
        if let Some(cert) = parsed.cert {
            certificates.push(cert);
        }
        if let Some(chain) = parsed.ca {
            for cert in chain {
                certificates.push(cert);
            }
        }
        if certificates.is_empty() {
            return Err(SigningError::InvalidKeyMaterial(
                "PKCS#12 bundle contains no certificate".to_string(),
            ));
        }

        log::debug!(
            "Unpacked PKCS#12 bundle: {} certificate(s) in chain",
            certificates.len()
        );
        Ok(Self {
            certificates,
            private_key,
        })
    }

    /// Load a PKCS#12 bundle from disk and decrypt it.
    pub fn from_pkcs12_file<P: AsRef<Path>>(
        path: P,
        password: &P12Password,
    ) -> SigningResult<Self> {
        let der = std::fs::read(path.as_ref()).map_err(|e| {
            SigningError::IoError(format!(
                "Failed to read PKCS#12 file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_pkcs12_der(&der, password)
    }

    /// Chain certificates in bundle order, leaf first.
    #[must_use]
    pub fn certificates(&self) -> &[X509] {
        &self.certificates
    }

    /// The RSA signing key.
    #[must_use]
    pub fn private_key(&self) -> &PKey<Private> {
        &self.private_key
    }
}

impl fmt::Debug for SigningKeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SigningKeySet(certificates={}, key=[REDACTED])",
            self.certificates.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openssl::asn1::Asn1Time;
    use openssl::bn::BigNum;
    use openssl::hash::MessageDigest;
    use openssl::rsa::Rsa;
    use openssl::x509::{X509Builder, X509NameBuilder};

    fn self_signed_identity() -> (PKey<Private>, X509) {
        let rsa = Rsa::generate(2048).unwrap();
        let pkey = PKey::from_rsa(rsa).unwrap();

        let mut name = X509NameBuilder::new().unwrap();
        name.append_entry_by_text("CN", "keyset-test").unwrap();
        let name = name.build();

        let serial = BigNum::from_u32(1)
            .and_then(|serial| serial.to_asn1_integer())
            .unwrap();

        let mut builder = X509Builder::new().unwrap();
        builder.set_version(2).unwrap();
        builder.set_serial_number(&serial).unwrap();
        builder.set_subject_name(&name).unwrap();
        builder.set_issuer_name(&name).unwrap();
        builder.set_pubkey(&pkey).unwrap();
        builder
            .set_not_before(&Asn1Time::days_from_now(0).unwrap())
            .unwrap();
        builder
            .set_not_after(&Asn1Time::days_from_now(365).unwrap())
            .unwrap();
        builder.sign(&pkey, MessageDigest::sha256()).unwrap();
        (pkey, builder.build())
    }

    #[test]
    fn unpacks_key_and_certificate() {
        let (pkey, cert) = self_signed_identity();
        let bundle = Pkcs12::builder()
            .name("test")
            .pkey(&pkey)
            .cert(&cert)
            .build2("hunter2")
            .unwrap();
        let der = bundle.to_der().unwrap();

        let keyset =
            SigningKeySet::from_pkcs12_der(&der, &P12Password::new("hunter2")).unwrap();
        assert_eq!(keyset.certificates().len(), 1);
        assert!(keyset.private_key().rsa().is_ok());
    }

    #[test]
    fn wrong_password_is_invalid_key_material() {
        let (pkey, cert) = self_signed_identity();
        let bundle = Pkcs12::builder()
            .name("test")
            .pkey(&pkey)
            .cert(&cert)
            .build2("correct")
            .unwrap();
        let der = bundle.to_der().unwrap();

        let err =
            SigningKeySet::from_pkcs12_der(&der, &P12Password::new("wrong")).unwrap_err();
        assert!(matches!(err, SigningError::InvalidKeyMaterial(_)));
    }

    #[test]
    fn garbage_input_is_invalid_key_material() {
        let err = SigningKeySet::from_pkcs12_der(&[0u8; 16], &P12Password::new(""))
            .unwrap_err();
        assert!(matches!(err, SigningError::InvalidKeyMaterial(_)));
    }
}
