//! Centralized constants for the widget-digsig signature profile.
//! Keep this intentionally small; only broadly reused literals should live here.

// === XML-DSig namespaces ===

/// XML-DSig namespace declared on the `<Signature>` root
pub const XMLDSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";

/// Fallback namespace for the `ds` prefix during `SignedInfo` canonicalization.
///
/// Carries `w3c` where the XML-DSig namespace has `w3`. Existing Tizen
/// verifiers were tuned against output produced with this exact value; it is
/// only consulted when a parser drops the namespace URI of a `ds:`-prefixed
/// element, which never happens for the documents this crate assembles.
pub const XMLDSIG_NS_DS_FALLBACK: &str = "http://www.w3c.org/2000/09/xmldsig#";

/// Namespace of the property elements inside the `<Object Id="prop">` block
pub const DSIG_PROPERTIES_NS: &str = "http://www.w3.org/2009/xmldsig-properties";

// === Algorithm URIs ===

/// Exclusive canonicalization 1.0 without comments (CanonicalizationMethod)
pub const EXC_C14N_ALGORITHM: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";

/// Canonical XML 1.1 (Transform on the `#prop` reference)
pub const C14N11_ALGORITHM: &str = "http://www.w3.org/2006/12/xml-c14n11";

/// RSA-SHA512 signature method
pub const RSA_SHA512_ALGORITHM: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha512";

/// SHA-512 digest method
pub const SHA512_DIGEST_ALGORITHM: &str = "http://www.w3.org/2001/04/xmlenc#sha512";

// === Widget-digsig profile ===

/// Profile URI carried by `<dsp:Profile>` in the property block
pub const WIDGETS_DIGSIG_PROFILE_URI: &str = "http://www.w3.org/ns/widgets-digsig#profile";

/// Role URI prefix; the role suffix (`author`/`distributor`) is appended
pub const WIDGETS_DIGSIG_ROLE_URI_BASE: &str = "http://www.w3.org/ns/widgets-digsig#role-";

// === Signature file names (fixed by the profile) ===

/// Output file name for the author signature
pub const AUTHOR_SIGNATURE_FILE: &str = "author-signature.xml";

/// Output file name for the distributor signature
pub const DISTRIBUTOR_SIGNATURE_FILE: &str = "signature1.xml";

// === Precomputed property-block digests ===
//
// The `<Object Id="prop">` block is byte-identical for every package of a
// given role, so its SHA-512 digest under C14N 1.1 is a constant.

/// `#prop` digest for the author role
pub const AUTHOR_PROP_DIGEST: &str =
    "aXbSAVgmAz0GsBUeZ1UmNDRrxkWhDUVGb45dZcNRq429wX3X+x6kaXT3NdNDTSNVTU+ypkysPMGvQY10fG1EWQ==";

/// `#prop` digest for the distributor role
pub const DISTRIBUTOR_PROP_DIGEST: &str =
    "/r5npk2VVA46QFJnejgONBEh4BWtjrtu9x/IFeLksjWyGmB/cMWKSJWQl7aU3YRQRZ3AesG8gF7qGyvKX9Snig==";

// === Encoding ===

/// Column width for Base64 bodies (digests, signature value, certificates)
pub const BASE64_LINE_WIDTH: usize = 76;
