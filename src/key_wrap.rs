//! RSA key transport as described in [RFC 5652 § 6.2.1] and [RFC 3370 § 4.2.1].
//!
//! [RFC 5652 § 6.2.1]: https://www.rfc-editor.org/rfc/rfc5652#section-6.2.1
//! [RFC 3370 § 4.2.1]: https://www.rfc-editor.org/rfc/rfc3370#section-4.2.1

use cms::content_info::CmsVersion;
use cms::enveloped_data::{KeyTransRecipientInfo, RecipientIdentifier};
use der::{asn1::OctetString, Any};
use log::trace;
use rand_core::CryptoRngCore;
use rsa::Pkcs1v15Encrypt;
use spki::AlgorithmIdentifierOwned;

use crate::errors::{Error, Result};
use crate::recipient::{RecipientCertificate, RSA_ENCRYPTION};
use crate::traits::KeyWrapper;

/// Wraps content-encryption keys with RSAES-PKCS1-v1_5 under the
/// recipient certificate's RSA public key.
///
/// The recipient is identified by issuer and serial number, and the key
/// encryption algorithm is `rsaEncryption` with `NULL` parameters.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RsaKeyWrapper;

impl RsaKeyWrapper {
    /// `AlgorithmIdentifier` recorded as `keyEncryptionAlgorithm`.
    pub fn key_encryption_algorithm() -> AlgorithmIdentifierOwned {
        AlgorithmIdentifierOwned {
            oid: RSA_ENCRYPTION,
            parameters: Some(Any::null()),
        }
    }
}

impl KeyWrapper for RsaKeyWrapper {
    fn wrap<R: CryptoRngCore + ?Sized>(
        &self,
        mut rng: &mut R,
        recipient: &RecipientCertificate,
        key: &[u8],
    ) -> Result<KeyTransRecipientInfo> {
        let public_key = recipient.rsa_public_key()?;
        // `encrypt` needs a sized RNG; `&mut R` is one even when `R` is not.
        let enc_key = public_key.encrypt(&mut rng, Pkcs1v15Encrypt, key)?;
        trace!("wrapped {}-byte key into {} bytes", key.len(), enc_key.len());

        Ok(KeyTransRecipientInfo {
            version: CmsVersion::V0,
            rid: RecipientIdentifier::IssuerAndSerialNumber(recipient.issuer_and_serial_number()),
            key_enc_alg: Self::key_encryption_algorithm(),
            enc_key: OctetString::new(enc_key).map_err(Error::Encoding)?,
        })
    }
}
