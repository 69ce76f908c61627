//! Foundational cryptographic domain types.
//!
//! Wraps the key material side of signing: the certificate chain and RSA
//! private key unpacked from a decrypted PKCS#12 bundle.

mod keyset;

pub use keyset::SigningKeySet;
