//! Shared fixtures for integration tests.
//!
//! Key material is generated in-process so the suites run without any
//! certificate files or network access.

use openssl::asn1::Asn1Time;
use openssl::bn::BigNum;
use openssl::hash::MessageDigest;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::x509::{X509Builder, X509NameBuilder, X509};

use tizen_signer::{P12Password, SigningKeySet};

/// Generate a fresh 2048-bit RSA key and matching self-signed certificate.
pub fn self_signed_identity(common_name: &str) -> (PKey<Private>, X509) {
    let rsa = Rsa::generate(2048).expect("RSA keygen");
    let pkey = PKey::from_rsa(rsa).expect("PKey wrap");

    let mut name = X509NameBuilder::new().expect("name builder");
    name.append_entry_by_text("CN", common_name).expect("CN");
    let name = name.build();

    let serial = BigNum::from_u32(1)
        .and_then(|serial| serial.to_asn1_integer())
        .expect("serial number");

    let mut builder = X509Builder::new().expect("cert builder");
    builder.set_version(2).expect("version");
    builder.set_serial_number(&serial).expect("serial");
    builder.set_subject_name(&name).expect("subject");
    builder.set_issuer_name(&name).expect("issuer");
    builder.set_pubkey(&pkey).expect("pubkey");
    builder
        .set_not_before(&Asn1Time::days_from_now(0).expect("not before"))
        .expect("set not before");
    builder
        .set_not_after(&Asn1Time::days_from_now(365).expect("not after"))
        .expect("set not after");
    builder
        .sign(&pkey, MessageDigest::sha256())
        .expect("cert sign");
    (pkey, builder.build())
}

/// Serialize an identity into a PKCS#12 bundle.
pub fn pkcs12_der(pkey: &PKey<Private>, cert: &X509, password: &str) -> Vec<u8> {
    Pkcs12::builder()
        .name("test-identity")
        .pkey(pkey)
        .cert(cert)
        .build2(password)
        .expect("PKCS#12 build")
        .to_der()
        .expect("PKCS#12 DER")
}

/// A ready-to-use key set backed by a fresh self-signed identity.
pub fn test_keyset(common_name: &str) -> SigningKeySet {
    let (pkey, cert) = self_signed_identity(common_name);
    let der = pkcs12_der(&pkey, &cert, "test-password");
    SigningKeySet::from_pkcs12_der(&der, &P12Password::new("test-password"))
        .expect("key set from fresh bundle")
}
