//! Content encryption: symmetric key material and CBC-mode ciphers.
//!
//! The content layer of an envelope is encrypted with a fresh symmetric key
//! in CBC mode with PKCS#7 padding, as described in [RFC 5652 § 6.3]. The
//! IV travels as the `OCTET STRING` parameter of the content-encryption
//! [`AlgorithmIdentifierOwned`] ([RFC 3370 § 5.1], [RFC 3565 § 4.1]).
//!
//! [RFC 5652 § 6.3]: https://www.rfc-editor.org/rfc/rfc5652#section-6.3
//! [RFC 3370 § 5.1]: https://www.rfc-editor.org/rfc/rfc3370#section-5.1
//! [RFC 3565 § 4.1]: https://www.rfc-editor.org/rfc/rfc3565#section-4.1

use alloc::vec::Vec;
use core::fmt;

use cbc::cipher::{block_padding::Pkcs7, BlockCipher, BlockEncryptMut, KeyInit, KeyIvInit};
use const_oid::ObjectIdentifier;
use der::{Any, Tag};
use rand_core::CryptoRngCore;
use spki::AlgorithmIdentifierOwned;
use zeroize::Zeroizing;

use crate::errors::{Error, Result};

/// `desCBC` from [RFC 8018 Appendix B.2.1].
///
/// [RFC 8018 Appendix B.2.1]: https://www.rfc-editor.org/rfc/rfc8018#appendix-B.2.1
pub const DES_CBC: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.14.3.2.7");

/// `des-ede3-cbc` from [RFC 3370 § 5.1].
///
/// [RFC 3370 § 5.1]: https://www.rfc-editor.org/rfc/rfc3370#section-5.1
pub const DES_EDE3_CBC: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.3.7");

/// `id-aes128-CBC` from [RFC 3565 § 4.1].
///
/// [RFC 3565 § 4.1]: https://www.rfc-editor.org/rfc/rfc3565#section-4.1
pub const AES_128_CBC: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.1.2");

/// `id-aes192-CBC` from [RFC 3565 § 4.1].
///
/// [RFC 3565 § 4.1]: https://www.rfc-editor.org/rfc/rfc3565#section-4.1
pub const AES_192_CBC: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.1.22");

/// `id-aes256-CBC` from [RFC 3565 § 4.1].
///
/// [RFC 3565 § 4.1]: https://www.rfc-editor.org/rfc/rfc3565#section-4.1
pub const AES_256_CBC: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.1.42");

/// Symmetric algorithm used to encrypt the envelope content.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ContentEncryptionAlgorithm {
    /// Single DES in CBC mode (56-bit effective key). The SCEP default.
    DesCbc,
    /// Three-key triple DES in CBC mode.
    DesEde3Cbc,
    /// AES-128 in CBC mode.
    Aes128Cbc,
    /// AES-192 in CBC mode.
    Aes192Cbc,
    /// AES-256 in CBC mode.
    Aes256Cbc,
}

impl ContentEncryptionAlgorithm {
    /// Object identifier of this algorithm.
    pub fn oid(&self) -> ObjectIdentifier {
        match self {
            Self::DesCbc => DES_CBC,
            Self::DesEde3Cbc => DES_EDE3_CBC,
            Self::Aes128Cbc => AES_128_CBC,
            Self::Aes192Cbc => AES_192_CBC,
            Self::Aes256Cbc => AES_256_CBC,
        }
    }

    /// Key size in bytes, parity bits included.
    pub fn key_size(&self) -> usize {
        match self {
            Self::DesCbc => 8,
            Self::DesEde3Cbc => 24,
            Self::Aes128Cbc => 16,
            Self::Aes192Cbc => 24,
            Self::Aes256Cbc => 32,
        }
    }

    /// IV size in bytes, equal to the cipher's block size.
    pub fn iv_size(&self) -> usize {
        match self {
            Self::DesCbc | Self::DesEde3Cbc => 8,
            Self::Aes128Cbc | Self::Aes192Cbc | Self::Aes256Cbc => 16,
        }
    }

    fn is_des(&self) -> bool {
        matches!(self, Self::DesCbc | Self::DesEde3Cbc)
    }
}

impl fmt::Display for ContentEncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DesCbc => "DES-CBC",
            Self::DesEde3Cbc => "DES-EDE3-CBC",
            Self::Aes128Cbc => "AES-128-CBC",
            Self::Aes192Cbc => "AES-192-CBC",
            Self::Aes256Cbc => "AES-256-CBC",
        })
    }
}

impl TryFrom<ObjectIdentifier> for ContentEncryptionAlgorithm {
    type Error = Error;

    fn try_from(oid: ObjectIdentifier) -> Result<Self> {
        match oid {
            DES_CBC => Ok(Self::DesCbc),
            DES_EDE3_CBC => Ok(Self::DesEde3Cbc),
            AES_128_CBC => Ok(Self::Aes128Cbc),
            AES_192_CBC => Ok(Self::Aes192Cbc),
            AES_256_CBC => Ok(Self::Aes256Cbc),
            _ => Err(Error::UnsupportedCipher { oid }),
        }
    }
}

/// Selects the algorithm by OID only; any parameters are ignored since a
/// fresh IV is generated for every envelope.
impl TryFrom<&AlgorithmIdentifierOwned> for ContentEncryptionAlgorithm {
    type Error = Error;

    fn try_from(alg: &AlgorithmIdentifierOwned) -> Result<Self> {
        Self::try_from(alg.oid)
    }
}

/// Freshly generated symmetric key and IV for one envelope.
///
/// The key bytes are zeroized on drop and never leave the crate.
pub struct SymmetricKey {
    algorithm: ContentEncryptionAlgorithm,
    key: Zeroizing<Vec<u8>>,
    iv: Vec<u8>,
}

impl SymmetricKey {
    /// Generate a random key and IV sized for `algorithm`.
    ///
    /// Fails with [`Error::KeyGeneration`] if `rng` cannot produce bytes.
    pub fn generate<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        algorithm: ContentEncryptionAlgorithm,
    ) -> Result<Self> {
        let mut key = Zeroizing::new(vec![0u8; algorithm.key_size()]);
        rng.try_fill_bytes(&mut key)?;
        if algorithm.is_des() {
            set_odd_parity(&mut key);
        }

        let mut iv = vec![0u8; algorithm.iv_size()];
        rng.try_fill_bytes(&mut iv)?;

        Ok(Self { algorithm, key, iv })
    }

    /// Algorithm this key was generated for.
    pub fn algorithm(&self) -> ContentEncryptionAlgorithm {
        self.algorithm
    }

    /// Initialization vector used for encryption.
    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    /// `AlgorithmIdentifier` carrying the algorithm OID and the IV actually
    /// used by [`SymmetricKey::encrypt`].
    pub fn algorithm_identifier(&self) -> Result<AlgorithmIdentifierOwned> {
        let iv = Any::new(Tag::OctetString, self.iv.clone()).map_err(Error::Encoding)?;

        Ok(AlgorithmIdentifierOwned {
            oid: self.algorithm.oid(),
            parameters: Some(iv),
        })
    }

    /// Encrypt `msg` in CBC mode with PKCS#7 padding.
    ///
    /// The ciphertext is always a non-empty multiple of the block size.
    pub fn encrypt(&self, msg: &[u8]) -> Result<Vec<u8>> {
        match self.algorithm {
            ContentEncryptionAlgorithm::DesCbc => cbc_encrypt::<des::Des>(&self.key, &self.iv, msg),
            ContentEncryptionAlgorithm::DesEde3Cbc => {
                cbc_encrypt::<des::TdesEde3>(&self.key, &self.iv, msg)
            }
            ContentEncryptionAlgorithm::Aes128Cbc => {
                cbc_encrypt::<aes::Aes128>(&self.key, &self.iv, msg)
            }
            ContentEncryptionAlgorithm::Aes192Cbc => {
                cbc_encrypt::<aes::Aes192>(&self.key, &self.iv, msg)
            }
            ContentEncryptionAlgorithm::Aes256Cbc => {
                cbc_encrypt::<aes::Aes256>(&self.key, &self.iv, msg)
            }
        }
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

fn cbc_encrypt<C>(key: &[u8], iv: &[u8], msg: &[u8]) -> Result<Vec<u8>>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    let encryptor = cbc::Encryptor::<C>::new_from_slices(key, iv)?;
    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(msg))
}

/// Set the low bit of every byte so that each byte has an odd number of ones.
fn set_odd_parity(key: &mut [u8]) {
    for byte in key.iter_mut() {
        let high = *byte & 0xfe;
        *byte = high | ((high.count_ones() as u8 + 1) & 1);
    }
}
