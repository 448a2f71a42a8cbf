use thiserror::Error;

/// Errors returned while preparing a document or key for signing.
///
/// The variants follow the stage that failed: missing input, text that isn't
/// well formed, well formed XML lacking what a signature template needs, and
/// key material that isn't usable PKCS#8.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing input: {0}")]
    Input(String),
    #[error("Failed to parse XML: {0}")]
    Xml(String),
    #[error("Failed to decode PEM: {0}")]
    Pem(String),
    #[error("{0}")]
    Structural(String),
    #[error("Failed to parse PKCS#8 private key: {0}")]
    KeyFormat(#[from] openssl::error::ErrorStack),
    #[error("Unsupported private key algorithm: {0}")]
    UnsupportedKey(String),
    #[error("Failed to update the XML tree: {0}")]
    Tree(String),
}

impl Error {
    /// The input was malformed, either as XML or as PEM.
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Xml(_) | Error::Pem(_))
    }

    /// The XML was well formed but lacked a required element.
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::Structural(_))
    }

    /// A PEM block was found but its contents aren't a usable private key.
    pub fn is_key_format(&self) -> bool {
        matches!(self, Error::KeyFormat(_) | Error::UnsupportedKey(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
