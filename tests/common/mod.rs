//! Test certificates and an envelope opener.
//!
//! WARNING: do *NOT* copy and paste this code. Keys are generated from a
//! fixed seed and sized for test speed.

#![allow(dead_code)]

use std::str::FromStr;

use cbc::cipher::{block_padding::Pkcs7, BlockCipher, BlockDecryptMut, KeyInit, KeyIvInit};
use der::{
    asn1::{BitString, ObjectIdentifier},
    Any, Decode, Encode, Tag, Tagged,
};
use pkcs_pki_envelope::{
    cms::{
        content_info::ContentInfo,
        enveloped_data::{EnvelopedData, KeyTransRecipientInfo, RecipientInfo},
    },
    envelope::{ID_DATA, ID_ENVELOPED_DATA},
    ContentEncryptionAlgorithm, RecipientCertificate,
};
use pkcs8::EncodePublicKey;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use rsa::{
    pkcs1v15::SigningKey,
    signature::{SignatureEncoding, Signer},
    Pkcs1v15Encrypt, RsaPrivateKey,
};
use sha2::Sha256;
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::{
    certificate::{TbsCertificate, Version},
    name::Name,
    serial_number::SerialNumber,
    time::{Time, Validity},
    Certificate,
};

pub const SHA256_WITH_RSA_ENCRYPTION: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11");
pub const ID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
pub const SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");

/// Recipient key pair and a certificate for it issued by `CN=Test CA` with serial 42.
pub struct TestRecipient {
    pub private_key: RsaPrivateKey,
    pub certificate: Certificate,
}

impl TestRecipient {
    pub fn new(seed: u8) -> Self {
        let mut rng = ChaCha8Rng::from_seed([seed; 32]);
        let ca_key = RsaPrivateKey::new(&mut rng, 1024).expect("failed to generate CA key");
        let private_key = RsaPrivateKey::new(&mut rng, 1024).expect("failed to generate key");

        let spki_der = private_key.to_public_key().to_public_key_der().unwrap();
        let spki = SubjectPublicKeyInfoOwned::from_der(spki_der.as_bytes()).unwrap();
        let certificate = issue(&ca_key, "CN=Test CA", 42, "CN=Test Recipient", spki);

        Self {
            private_key,
            certificate,
        }
    }

    pub fn recipient(&self) -> RecipientCertificate {
        RecipientCertificate::from_der(&self.certificate.to_der().unwrap()).unwrap()
    }
}

/// Certificate for an EC P-256 subject key, issued by an RSA CA.
pub fn ec_certificate() -> Certificate {
    let mut rng = ChaCha8Rng::from_seed([7; 32]);
    let ca_key = RsaPrivateKey::new(&mut rng, 1024).expect("failed to generate CA key");

    let mut point = [0x42u8; 65];
    point[0] = 0x04;
    let spki = SubjectPublicKeyInfoOwned {
        algorithm: AlgorithmIdentifierOwned {
            oid: ID_EC_PUBLIC_KEY,
            parameters: Some(Any::new(Tag::ObjectIdentifier, SECP256R1.as_bytes()).unwrap()),
        },
        subject_public_key: BitString::from_bytes(&point).unwrap(),
    };

    issue(&ca_key, "CN=Test CA", 43, "CN=EC Recipient", spki)
}

pub fn issue(
    ca_key: &RsaPrivateKey,
    issuer: &str,
    serial: u32,
    subject: &str,
    spki: SubjectPublicKeyInfoOwned,
) -> Certificate {
    let signature_algorithm = AlgorithmIdentifierOwned {
        oid: SHA256_WITH_RSA_ENCRYPTION,
        parameters: Some(Any::null()),
    };

    let tbs_certificate = TbsCertificate {
        version: Version::V3,
        serial_number: SerialNumber::from(serial),
        signature: signature_algorithm.clone(),
        issuer: Name::from_str(issuer).unwrap(),
        validity: Validity {
            not_before: Time::INFINITY,
            not_after: Time::INFINITY,
        },
        subject: Name::from_str(subject).unwrap(),
        subject_public_key_info: spki,
        issuer_unique_id: None,
        subject_unique_id: None,
        extensions: None,
    };

    let signing_key = SigningKey::<Sha256>::new(ca_key.clone());
    let signature = signing_key.sign(&tbs_certificate.to_der().unwrap());

    Certificate {
        tbs_certificate,
        signature_algorithm,
        signature: BitString::from_bytes(&signature.to_bytes()).unwrap(),
    }
}

/// Decode an envelope down to its single key-transport recipient.
pub fn parse(envelope: &[u8]) -> (EnvelopedData, KeyTransRecipientInfo) {
    let content_info = ContentInfo::from_der(envelope).unwrap();
    assert_eq!(content_info.content_type, ID_ENVELOPED_DATA);

    let enveloped_data =
        EnvelopedData::from_der(&content_info.content.to_der().unwrap()).unwrap();
    assert_eq!(enveloped_data.recip_infos.0.len(), 1);

    let ktri = match enveloped_data.recip_infos.0.iter().next() {
        Some(RecipientInfo::Ktri(ktri)) => ktri.clone(),
        other => panic!("expected KeyTransRecipientInfo, got {:?}", other),
    };

    (enveloped_data, ktri)
}

/// Recover the payload using only the private key and what the envelope records.
pub fn open(envelope: &[u8], private_key: &RsaPrivateKey) -> Vec<u8> {
    let (enveloped_data, ktri) = parse(envelope);

    let key = private_key
        .decrypt(Pkcs1v15Encrypt, ktri.enc_key.as_bytes())
        .expect("failed to unwrap key");

    let eci = &enveloped_data.encrypted_content;
    assert_eq!(eci.content_type, ID_DATA);

    let algorithm = ContentEncryptionAlgorithm::try_from(&eci.content_enc_alg).unwrap();
    let iv = eci
        .content_enc_alg
        .parameters
        .as_ref()
        .expect("missing IV");
    assert_eq!(iv.tag(), Tag::OctetString);

    let ciphertext = eci
        .encrypted_content
        .as_ref()
        .expect("missing encrypted content")
        .as_bytes();

    match algorithm {
        ContentEncryptionAlgorithm::DesCbc => cbc_decrypt::<des::Des>(&key, iv.value(), ciphertext),
        ContentEncryptionAlgorithm::DesEde3Cbc => {
            cbc_decrypt::<des::TdesEde3>(&key, iv.value(), ciphertext)
        }
        ContentEncryptionAlgorithm::Aes128Cbc => {
            cbc_decrypt::<aes::Aes128>(&key, iv.value(), ciphertext)
        }
        ContentEncryptionAlgorithm::Aes192Cbc => {
            cbc_decrypt::<aes::Aes192>(&key, iv.value(), ciphertext)
        }
        ContentEncryptionAlgorithm::Aes256Cbc => {
            cbc_decrypt::<aes::Aes256>(&key, iv.value(), ciphertext)
        }
    }
}

fn cbc_decrypt<C>(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Vec<u8>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    cbc::Decryptor::<C>::new_from_slices(key, iv)
        .unwrap()
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .expect("bad padding")
}
