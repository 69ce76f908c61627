//! Type-safe wrappers using new-type pattern
//!
//! This module provides the core value types flowing through the signing
//! pipeline: signature roles, package file entries, and the PKCS#12
//! password wrapper.

use std::fmt;
use std::str::FromStr;

use crate::domain::constants;
use crate::infra::error::SigningError;

/// The two signature roles of the widget-digsig profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureRole {
    Author,
    Distributor,
}

impl SignatureRole {
    /// Signature `Id` attribute value (also the `Target` of each property)
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            SignatureRole::Author => "AuthorSignature",
            SignatureRole::Distributor => "DistributorSignature",
        }
    }

    /// Role suffix used in the `<dsp:Role>` URI
    #[must_use]
    pub fn role_suffix(&self) -> &'static str {
        match self {
            SignatureRole::Author => "author",
            SignatureRole::Distributor => "distributor",
        }
    }

    /// Name of the signature file inside the package archive
    #[must_use]
    pub fn signature_file_name(&self) -> &'static str {
        match self {
            SignatureRole::Author => constants::AUTHOR_SIGNATURE_FILE,
            SignatureRole::Distributor => constants::DISTRIBUTOR_SIGNATURE_FILE,
        }
    }

    /// Precomputed digest of this role's `<Object Id="prop">` block
    #[must_use]
    pub fn prop_digest(&self) -> &'static str {
        match self {
            SignatureRole::Author => constants::AUTHOR_PROP_DIGEST,
            SignatureRole::Distributor => constants::DISTRIBUTOR_PROP_DIGEST,
        }
    }
}

impl fmt::Display for SignatureRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for SignatureRole {
    type Err = SigningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "author" | "AuthorSignature" => Ok(SignatureRole::Author),
            "distributor" | "DistributorSignature" => Ok(SignatureRole::Distributor),
            other => Err(SigningError::InvalidInput(format!(
                "Unknown signature role '{other}'. Expected 'author' or 'distributor'"
            ))),
        }
    }
}

/// One package member: a URL-encoded path relative to the package root plus
/// the raw octets that get digested.
///
/// Entry order is significant; it determines `<Reference>` order inside
/// `<SignedInfo>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub uri: String,
    pub data: Vec<u8>,
}

impl FileEntry {
    #[must_use]
    pub fn new(uri: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            uri: uri.into(),
            data,
        }
    }
}

/// Type-safe wrapper for PKCS#12 passwords
#[derive(Clone)]
pub struct P12Password(String);

impl P12Password {
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        P12Password(password.into())
    }

    /// Get the password as a string slice for the openssl API
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for P12Password {
    type Err = SigningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

// Don't implement a revealing Display/Debug to avoid accidental logging
impl fmt::Display for P12Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[PASSWORD REDACTED]")
    }
}

impl fmt::Debug for P12Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P12Password([REDACTED])")
    }
}
