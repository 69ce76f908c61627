//! Error types for Tizen package signing operations.
//! Error handling types and result definitions for the signing pipeline.

use thiserror::Error;

/// Result type for signing operations
pub type SigningResult<T> = Result<T, SigningError>;

/// Comprehensive error types for signing operations
#[derive(Error, Debug, miette::Diagnostic)]
pub enum SigningError {
    /// The PKCS#12 bundle lacks a private key or any certificate.
    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// The RSA-SHA512 primitive reported failure.
    #[error("Cryptographic failure: {0}")]
    CryptoFailure(String),

    /// The assembled throwaway signature wrapper failed to parse.
    /// An implementer bug, always fatal.
    #[error("Malformed internal XML: {0}")]
    MalformedInternalXml(String),

    #[error("Package archive error: {0}")]
    ArchiveError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl From<std::io::Error> for SigningError {
    fn from(error: std::io::Error) -> Self {
        SigningError::IoError(error.to_string())
    }
}

impl From<openssl::error::ErrorStack> for SigningError {
    fn from(error: openssl::error::ErrorStack) -> Self {
        SigningError::CryptoFailure(error.to_string())
    }
}

impl From<zip::result::ZipError> for SigningError {
    fn from(error: zip::result::ZipError) -> Self {
        SigningError::ArchiveError(error.to_string())
    }
}

impl From<xml::reader::Error> for SigningError {
    fn from(error: xml::reader::Error) -> Self {
        SigningError::MalformedInternalXml(error.to_string())
    }
}
