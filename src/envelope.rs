//! EnvelopedData generation as described in [RFC 5652 § 6].
//!
//! # Usage
//!
//! See [code example in the toplevel rustdoc](../index.html#usage).
//!
//! [RFC 5652 § 6]: https://www.rfc-editor.org/rfc/rfc5652#section-6

use alloc::vec::Vec;

use cms::content_info::{CmsVersion, ContentInfo};
use cms::enveloped_data::{
    EncryptedContentInfo, EnvelopedData, KeyTransRecipientInfo, RecipientInfo, RecipientInfos,
};
use const_oid::ObjectIdentifier;
use der::{asn1::OctetString, asn1::SetOfVec, Any, Decode, Encode};
use log::{debug, trace};
use rand_core::CryptoRngCore;

use crate::cipher::{ContentEncryptionAlgorithm, SymmetricKey};
use crate::errors::{Error, Result};
use crate::key_wrap::RsaKeyWrapper;
use crate::recipient::RecipientCertificate;
use crate::traits::KeyWrapper;

/// `id-data` from [RFC 5652 § 4].
///
/// [RFC 5652 § 4]: https://www.rfc-editor.org/rfc/rfc5652#section-4
pub const ID_DATA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.1");

/// `id-envelopedData` from [RFC 5652 § 6.1].
///
/// [RFC 5652 § 6.1]: https://www.rfc-editor.org/rfc/rfc5652#section-6.1
pub const ID_ENVELOPED_DATA: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.3");

/// Generates `ContentInfo`-wrapped `EnvelopedData` for a single recipient.
///
/// The builder only holds immutable configuration, so one instance can be
/// shared across threads; the payload and recipient are passed per call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EnvelopeBuilder<W = RsaKeyWrapper> {
    algorithm: ContentEncryptionAlgorithm,
    key_wrapper: W,
}

impl EnvelopeBuilder {
    /// Create a builder encrypting content with `algorithm` and wrapping keys
    /// with RSA PKCS#1 v1.5 key transport.
    pub fn new(algorithm: ContentEncryptionAlgorithm) -> Self {
        Self::with_key_wrapper(algorithm, RsaKeyWrapper)
    }
}

impl<W: KeyWrapper> EnvelopeBuilder<W> {
    /// Create a builder with a custom key wrapper.
    pub fn with_key_wrapper(algorithm: ContentEncryptionAlgorithm, key_wrapper: W) -> Self {
        Self {
            algorithm,
            key_wrapper,
        }
    }

    /// Content-encryption algorithm used by this builder.
    pub fn algorithm(&self) -> ContentEncryptionAlgorithm {
        self.algorithm
    }

    /// Encrypt `payload` for `recipient`.
    ///
    /// A fresh content-encryption key and IV are drawn from `rng` on every
    /// call. The key is used to encrypt the payload, wrapped for the
    /// recipient, then dropped (and zeroized) before returning.
    pub fn generate<'a, R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        payload: &'a [u8],
        recipient: &RecipientCertificate,
    ) -> Result<Envelope<'a>> {
        debug!(
            "generating {} envelope for {} bytes, recipient issuer={} serial={}",
            self.algorithm,
            payload.len(),
            recipient.issuer(),
            recipient.serial_number()
        );

        let key = SymmetricKey::generate(rng, self.algorithm)?;
        let encrypted_content = encrypt_content(&key, payload)?;
        trace!(
            "encrypted content: {} bytes",
            encrypted_content
                .encrypted_content
                .as_ref()
                .map_or(0, |c| c.as_bytes().len())
        );

        let recipient_info = self.key_wrapper.wrap(rng, recipient, key.as_bytes())?;
        drop(key);

        let content_info = assemble(recipient_info, encrypted_content)?;
        let encoded = content_info.to_der().map_err(Error::Encoding)?;
        debug!("generated envelope: {} bytes", encoded.len());

        Ok(Envelope {
            algorithm: self.algorithm,
            encoded,
            message_data: payload,
        })
    }
}

/// Encrypt `payload` for `recipient` with `algorithm` and RSA key transport.
pub fn generate<'a, R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    payload: &'a [u8],
    algorithm: ContentEncryptionAlgorithm,
    recipient: &RecipientCertificate,
) -> Result<Envelope<'a>> {
    EnvelopeBuilder::new(algorithm).generate(rng, payload, recipient)
}

fn encrypt_content(key: &SymmetricKey, payload: &[u8]) -> Result<EncryptedContentInfo> {
    let ciphertext = key.encrypt(payload)?;

    Ok(EncryptedContentInfo {
        content_type: ID_DATA,
        content_enc_alg: key.algorithm_identifier()?,
        encrypted_content: Some(OctetString::new(ciphertext).map_err(Error::Encoding)?),
    })
}

fn assemble(
    recipient_info: KeyTransRecipientInfo,
    encrypted_content: EncryptedContentInfo,
) -> Result<ContentInfo> {
    let mut recip_infos = SetOfVec::new();
    recip_infos
        .insert(RecipientInfo::Ktri(recipient_info))
        .map_err(Error::Encoding)?;

    let enveloped_data = EnvelopedData {
        version: CmsVersion::V0,
        originator_info: None,
        recip_infos: RecipientInfos(recip_infos),
        encrypted_content,
        unprotected_attrs: None,
    };

    Ok(ContentInfo {
        content_type: ID_ENVELOPED_DATA,
        content: Any::encode_from(&enveloped_data).map_err(Error::Encoding)?,
    })
}

/// DER-encoded `ContentInfo` carrying `EnvelopedData`, together with the
/// message data it was generated from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Envelope<'a> {
    algorithm: ContentEncryptionAlgorithm,
    encoded: Vec<u8>,
    message_data: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// Content type of the outer `ContentInfo`, always `id-envelopedData`.
    pub fn content_type(&self) -> ObjectIdentifier {
        ID_ENVELOPED_DATA
    }

    /// Content-encryption algorithm used for this envelope.
    pub fn algorithm(&self) -> ContentEncryptionAlgorithm {
        self.algorithm
    }

    /// DER encoding of the outer `ContentInfo`.
    pub fn to_der(&self) -> &[u8] {
        &self.encoded
    }

    /// Consume the envelope, returning its DER encoding.
    pub fn into_der(self) -> Vec<u8> {
        self.encoded
    }

    /// Plaintext the envelope was generated from.
    pub fn message_data(&self) -> &'a [u8] {
        self.message_data
    }

    /// Decode the `EnvelopedData` carried by this envelope.
    pub fn enveloped_data(&self) -> Result<EnvelopedData> {
        let content_info = ContentInfo::from_der(&self.encoded).map_err(Error::Encoding)?;
        content_info
            .content
            .decode_as::<EnvelopedData>()
            .map_err(Error::Encoding)
    }
}

impl AsRef<[u8]> for Envelope<'_> {
    fn as_ref(&self) -> &[u8] {
        &self.encoded
    }
}
