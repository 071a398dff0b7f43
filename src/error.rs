/// Error types for termsheet generation.
use thiserror::Error;

/// Result type for termsheet generation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for termsheet generation operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP container error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Part not found in the package
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// Not a usable Word package
    #[error("Invalid package: {0}")]
    InvalidPackage(String),

    /// Placeholder token set could not be compiled
    #[error("Token set error: {0}")]
    Tokens(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Zip(err.to_string())
    }
}
