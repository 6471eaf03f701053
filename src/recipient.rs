//! Recipient certificate access.
//!
//! An envelope is addressed to the holder of an X.509 certificate. The
//! recipient finds its private key by matching the certificate's issuer
//! name and serial number, so both are taken verbatim from the
//! `TBSCertificate` rather than rebuilt from a textual distinguished name.

use alloc::vec::Vec;

use cms::cert::IssuerAndSerialNumber;
use const_oid::ObjectIdentifier;
use der::{Decode, Encode};
use pkcs8::DecodePublicKey;
use rsa::RsaPublicKey;
use x509_cert::{name::Name, serial_number::SerialNumber, Certificate};

use crate::errors::{Error, Result};

/// `rsaEncryption` from [RFC 8017 Appendix C].
///
/// [RFC 8017 Appendix C]: https://www.rfc-editor.org/rfc/rfc8017#appendix-C
pub const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// X.509 certificate of the party an envelope is encrypted for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecipientCertificate {
    inner: Certificate,
}

impl RecipientCertificate {
    /// Parse a DER-encoded certificate.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let inner = Certificate::from_der(bytes).map_err(|e| Error::CertificateParse(e.into()))?;
        Ok(Self { inner })
    }

    /// Parse a PEM-encoded certificate.
    #[cfg(feature = "pem")]
    pub fn from_pem(pem: impl AsRef<[u8]>) -> Result<Self> {
        use der::DecodePem;

        let inner = Certificate::from_pem(pem).map_err(|e| Error::CertificateParse(e.into()))?;
        Ok(Self { inner })
    }

    /// Parsed certificate.
    pub fn certificate(&self) -> &Certificate {
        &self.inner
    }

    /// Issuer distinguished name.
    pub fn issuer(&self) -> &Name {
        &self.inner.tbs_certificate.issuer
    }

    /// Certificate serial number.
    pub fn serial_number(&self) -> &SerialNumber {
        &self.inner.tbs_certificate.serial_number
    }

    /// Algorithm OID of the subject public key.
    pub fn public_key_algorithm(&self) -> ObjectIdentifier {
        self.inner.tbs_certificate.subject_public_key_info.algorithm.oid
    }

    /// DER encoding of the `TBSCertificate`.
    pub fn tbs_der(&self) -> Result<Vec<u8>> {
        self.inner.tbs_certificate.to_der().map_err(Error::Encoding)
    }

    /// Recipient identifier: issuer and serial number exactly as they appear
    /// in the `TBSCertificate`.
    pub fn issuer_and_serial_number(&self) -> IssuerAndSerialNumber {
        IssuerAndSerialNumber {
            issuer: self.issuer().clone(),
            serial_number: self.serial_number().clone(),
        }
    }

    /// Subject public key as an RSA key.
    ///
    /// Fails with [`Error::UnsupportedKeyType`] for any other key algorithm.
    pub fn rsa_public_key(&self) -> Result<RsaPublicKey> {
        let spki = &self.inner.tbs_certificate.subject_public_key_info;
        if spki.algorithm.oid != RSA_ENCRYPTION {
            return Err(Error::UnsupportedKeyType {
                oid: spki.algorithm.oid,
            });
        }

        let der = spki.to_der().map_err(Error::Encoding)?;
        RsaPublicKey::from_public_key_der(&der).map_err(Error::CertificateParse)
    }
}

impl From<Certificate> for RecipientCertificate {
    fn from(inner: Certificate) -> Self {
        Self { inner }
    }
}

impl TryFrom<&[u8]> for RecipientCertificate {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_der(bytes)
    }
}
