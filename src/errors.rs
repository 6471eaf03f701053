//! Error types.

use core::fmt;

use cbc::cipher::InvalidLength;
use der::asn1::ObjectIdentifier;

/// Alias for [`core::result::Result`] with the `pkcs-pki-envelope` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error raised while generating an envelope.
///
/// Every step of envelope generation reports failure through one of these
/// variants, carrying the originating cause where there is one. Nothing is
/// retried and no partial envelope is ever produced.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// The recipient certificate, or the public key inside it, could not be parsed.
    CertificateParse(spki::Error),

    /// The recipient's subject public key is not an RSA key.
    UnsupportedKeyType {
        /// Algorithm OID found in the certificate's `SubjectPublicKeyInfo`.
        oid: ObjectIdentifier,
    },

    /// RSA key transport failed, e.g. the modulus is too small to carry the key.
    KeyWrap(rsa::Error),

    /// The random number generator failed while generating the
    /// content-encryption key or IV.
    KeyGeneration(rand_core::Error),

    /// Symmetric key setup or content encryption failed.
    ContentEncryption(InvalidLength),

    /// The requested content-encryption algorithm is not supported.
    UnsupportedCipher {
        /// Requested algorithm OID.
        oid: ObjectIdentifier,
    },

    /// Assembling or serializing the ASN.1 structure failed.
    Encoding(der::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CertificateParse(err) => write!(f, "certificate parse error: {}", err),
            Error::UnsupportedKeyType { oid } => {
                write!(f, "unsupported recipient key type: {}", oid)
            }
            Error::KeyWrap(err) => write!(f, "key wrap error: {}", err),
            Error::KeyGeneration(err) => write!(f, "key generation error: {}", err),
            Error::ContentEncryption(err) => write!(f, "content encryption error: {}", err),
            Error::UnsupportedCipher { oid } => {
                write!(f, "unsupported content encryption algorithm: {}", oid)
            }
            Error::Encoding(err) => write!(f, "encoding error: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::CertificateParse(err) => Some(err),
            Error::KeyWrap(err) => Some(err),
            Error::KeyGeneration(err) => Some(err),
            Error::ContentEncryption(err) => Some(err),
            Error::Encoding(err) => Some(err),
            Error::UnsupportedKeyType { .. } | Error::UnsupportedCipher { .. } => None,
        }
    }
}

impl From<rsa::Error> for Error {
    fn from(err: rsa::Error) -> Error {
        Error::KeyWrap(err)
    }
}

impl From<rand_core::Error> for Error {
    fn from(err: rand_core::Error) -> Error {
        Error::KeyGeneration(err)
    }
}

impl From<InvalidLength> for Error {
    fn from(err: InvalidLength) -> Error {
        Error::ContentEncryption(err)
    }
}
