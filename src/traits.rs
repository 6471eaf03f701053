//! Key-layer trait definitions.

use cms::enveloped_data::KeyTransRecipientInfo;
use rand_core::CryptoRngCore;

use crate::errors::Result;
use crate::recipient::RecipientCertificate;

/// Protects a content-encryption key for a single recipient.
pub trait KeyWrapper {
    /// Encrypt `key` for `recipient`, returning the recipient's
    /// `KeyTransRecipientInfo`.
    fn wrap<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        recipient: &RecipientCertificate,
        key: &[u8],
    ) -> Result<KeyTransRecipientInfo>;
}
